use crate::error::PlatformError;
use impulse_domain::config::LoggingConfig;
use impulse_logger::{LevelFilter, Logger};
use tracing::warn;

/// Installs the global subscriber described by `cfg`.
///
/// Keep the returned [`Logger`] alive for the whole program.
///
/// # Errors
/// [`PlatformError::Internal`] for an unknown level, [`PlatformError::Logger`] when the
/// subscriber cannot be installed.
pub fn init_logging(cfg: &LoggingConfig, name: &str) -> Result<Logger, PlatformError> {
    let level = cfg.level.parse::<LevelFilter>().map_err(|err| PlatformError::Internal {
        message: format!("invalid log level '{}': {err}", cfg.level).into(),
        context: None,
    })?;

    let mut builder = Logger::builder().name(name).level(level).stderr(cfg.stderr);
    if let Some(filter) = &cfg.filter {
        builder = builder.env_filter(filter);
    }

    let logger = match &cfg.directory {
        Some(directory) => {
            let file = builder.directory(directory);
            #[cfg(feature = "json")]
            let file = file.json(cfg.json);
            file.init()?
        },
        None => builder.init()?,
    };
    if let Some(reason) = ignored_json(cfg) {
        warn!(reason, "Ignoring logging.json");
    }
    Ok(logger)
}

/// Why `json = true` has no effect with this config and build, if it has none.
fn ignored_json(cfg: &LoggingConfig) -> Option<&'static str> {
    if !cfg.json {
        return None;
    }
    if cfg!(not(feature = "json")) {
        return Some("built without the `json` feature");
    }
    cfg.directory.is_none().then_some("JSON applies to file logs and no directory is set")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_without_its_prerequisites_is_reported() {
        let mut cfg = LoggingConfig { json: true, directory: None, ..LoggingConfig::default() };
        assert!(ignored_json(&cfg).is_some());

        cfg.directory = Some("logs".into());
        assert_eq!(ignored_json(&cfg).is_some(), !cfg!(feature = "json"));

        cfg.json = false;
        assert_eq!(ignored_json(&cfg), None);
    }
}
