//! # Theme slice
//!
//! Holds the active theme, projects its design tokens onto CSS custom properties and answers
//! per-component style lookups.
//!
//! ```rust
//! use impulse_theme::{InlineStyle, MemoryThemeSource, StoreOptions, StyleTarget, ThemeStore};
//! use impulse_theme::domain::theme::ThemeContext;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = ThemeStore::new(MemoryThemeSource::with_presets(), StoreOptions::default());
//! store.load("synthwave").await.unwrap();
//!
//! let mut root = InlineStyle::new();
//! store.project(&mut root);
//! assert_eq!(root.property("--colors-primary"), Some("#D946EF"));
//!
//! let button = store.get_component_styles("button", Some(ThemeContext::Admin));
//! assert_eq!(button.get("border-radius").map(String::as_str), Some("0.5rem"));
//! # });
//! ```

mod color;
mod document;
mod error;
mod fallback;
mod presets;
mod projector;
mod source;
mod store;
mod styles;
mod tokens;
mod validation;

pub use color::{hex_to_rgb, rgb_channels};
pub use document::{ParseIssue, ParsedTheme, parse_theme, parse_theme_slice};
pub use error::{ThemeError, ThemeErrorExt};
pub use fallback::{emergency_theme, emergency_tokens};
pub use presets::{DEFAULT_PRESET, find_preset, presets};
pub use projector::{
    CssProjector, CssVariables, InlineStyle, ProjectionReport, ProjectorOptions, StyleTarget,
    THEME_ATTRIBUTE,
};
pub use source::{BoxFuture, FileThemeSource, MemoryThemeSource, ThemeSource};
pub use store::{
    LoadFailure, LoadOutcome, LoadStatus, StoreOptions, ThemeRevision, ThemeStore, ThemeStoreState,
};
pub use styles::{
    cached_css, cached_css_key, component_styles, composed_styles, find_component_token,
    theme_class, to_declarations,
};
pub use tokens::{FlatToken, flatten, is_css_value, merge_tokens, sanitize_segment};
pub use validation::{ThemeIssue, default_conflicts, pick_default, validate_theme};

pub use impulse_domain as domain;
