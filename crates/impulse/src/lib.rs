//! Facade crate for the Impulse theme and layout slices.
//! Re-exports domain/kernel primitives and wires the slices into a [`Platform`].
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), impulse::PlatformError> {
//! use impulse::kernel::security::PermissionSet;
//!
//! // No `themes/` or `layouts/` directory: presets and in-memory core layouts.
//! let platform = impulse::Platform::builder().build().await?;
//! assert_eq!(platform.themes().current().id, "impulsivity");
//!
//! let footer = platform.render("core-footer-site", &PermissionSet::new()).await.unwrap();
//! assert!(footer.to_html().contains("Parts Library"));
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;
mod platform;

pub use error::{PlatformError, PlatformErrorExt};
pub use logging::init_logging;
pub use platform::{Platform, PlatformBuilder};

pub use impulse_domain as domain;
pub use impulse_kernel as kernel;

/// Feature registry for runtime introspection.
pub mod features {
    pub use impulse_layout as layout;
    pub use impulse_theme as theme;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "theme",
        "layout",
        #[cfg(feature = "json")]
        "json",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}
