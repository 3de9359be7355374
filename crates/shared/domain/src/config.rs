use crate::layout::LayoutScope;
use crate::theme::ThemeContext;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the theme and layout slices.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub theme: ThemeConfig,
    pub layout: LayoutConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Token store and projector settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Directory holding `<theme id>.json` rows.
    pub source_dir: PathBuf,
    /// Theme to load at startup; the source's default theme when absent.
    pub default_theme: Option<String>,
    /// Context used for component style lookups when the caller gives none.
    pub context: ThemeContext,
    /// Upper bound of memoized component style entries.
    pub style_cache_capacity: u64,
    /// Emit `--<name>-rgb` companions for hex colors.
    pub rgb_channels: bool,
}

/// Registry and layout resolver settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Directory holding `<layout id>.json` rows.
    pub source_dir: PathBuf,
    /// Which component set the registry is bootstrapped with.
    pub scope: LayoutScope,
    /// Deeper subtrees are dropped with a warning.
    pub max_depth: usize,
    /// Render the fallback placeholder for unknown component types.
    pub placeholders: bool,
    /// Create the core `topnav`/`footer`/`usermenu` layouts when missing.
    pub seed_core_layouts: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: Option<String>,
    /// Console output on stderr instead of stdout.
    pub stderr: bool,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("themes"),
            default_theme: None,
            context: ThemeContext::Site,
            style_cache_capacity: 1_024,
            rgb_channels: true,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("layouts"),
            scope: LayoutScope::Site,
            max_depth: 32,
            placeholders: true,
            seed_core_layouts: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, stderr: false, directory: None, json: false }
    }
}
