use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Default config file stem, resolved against the working directory (`impulse.toml`, ...).
pub const DEFAULT_CONFIG_STEM: &str = "impulse";
/// Prefix of environment overrides (`IMPULSE__THEME__DEFAULT_THEME=midnight`).
pub const ENV_PREFIX: &str = "IMPULSE";

#[impulse_derive::impulse_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration layered from a file and environment overrides.
///
/// 1. **File**: `path` when given (must exist), otherwise `impulse.{toml,json,yaml}` in the
///    working directory if present.
/// 2. **Environment**: variables prefixed with `IMPULSE__`; nested keys use `__`
///    (`IMPULSE__LAYOUT__MAX_DEPTH=8` maps to `layout.max_depth`).
///
/// Fields absent from every layer fall back to the target type's serde defaults.
///
/// # Errors
/// Returns [`ConfigError::Config`] when an explicit file is missing, a source cannot be
/// parsed, or the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use impulse_kernel::config::load_config;
/// use impulse_kernel::domain::config::AppConfig;
///
/// let cfg: AppConfig = load_config(None::<&str>).unwrap_or_default();
/// assert!(cfg.layout.max_depth > 0);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match &path {
        Some(p) => File::from(p.as_ref()).required(true),
        None => File::with_name(DEFAULT_CONFIG_STEM).required(false),
    };

    let source = path
        .as_ref()
        .map_or_else(|| format!("{DEFAULT_CONFIG_STEM}.*"), |p| p.as_ref().display().to_string());
    info!(%source, prefix = ENV_PREFIX, "Loading configuration");

    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
