use impulse_kernel::config::load_config;
use impulse_kernel::domain::config::AppConfig;
use impulse_kernel::domain::layout::LayoutScope;
use serial_test::serial;
use std::fs;

#[test]
#[serial]
fn file_values_override_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("impulse.toml");
    fs::write(
        &path,
        r#"
[theme]
default_theme = "synthwave"
rgb_channels = false

[layout]
scope = "admin"
max_depth = 12
"#,
    )?;

    let cfg: AppConfig = load_config(Some(&path))?;
    assert_eq!(cfg.theme.default_theme.as_deref(), Some("synthwave"));
    assert!(!cfg.theme.rgb_channels);
    assert_eq!(cfg.layout.scope, LayoutScope::Admin);
    assert_eq!(cfg.layout.max_depth, 12);
    assert_eq!(cfg.logging.level, "info");
    Ok(())
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    let result = load_config::<AppConfig>(Some("/definitely/not/here/impulse.toml"));
    assert!(result.is_err());
}
