use impulse::domain::config::AppConfig;
use impulse::domain::constants::FALLBACK_THEME_ID;
use impulse::domain::layout::LayoutScope;
use impulse::features::layout::{LayoutSource, MemoryLayoutSource};
use impulse::features::theme::{LoadStatus, MemoryThemeSource};
use impulse::kernel::security::PermissionSet;
use impulse::{Platform, features};
use std::fs;

fn config(root: &std::path::Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.theme.source_dir = root.join("themes");
    cfg.layout.source_dir = root.join("layouts");
    cfg
}

#[tokio::test]
async fn configured_theme_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.theme.default_theme = Some("terminal".to_owned());

    let platform = Platform::builder().config(cfg).build().await.unwrap();
    assert_eq!(platform.themes().current().id, "terminal");
    assert_eq!(platform.themes().status(), LoadStatus::Loaded);
    assert_eq!(platform.themes().css_variables().get("--colors-primary"), Some("#4ADE80"));
}

#[tokio::test]
async fn missing_theme_keeps_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.theme.default_theme = Some("vanished".to_owned());

    let platform = Platform::builder().config(cfg).theme_source(MemoryThemeSource::new()).build().await.unwrap();
    assert_eq!(platform.themes().current().id, FALLBACK_THEME_ID);
    assert_eq!(platform.themes().status(), LoadStatus::Failed);
    assert!(platform.themes().last_error().is_some());
}

#[tokio::test]
async fn seeds_core_layouts_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("layouts")).unwrap();

    let first = Platform::builder().config(config(dir.path())).build().await.unwrap();
    assert_eq!(first.seeded().created, ["topnav", "footer", "usermenu"]);
    assert!(dir.path().join("layouts/core-topnav-site.json").exists());

    let second = Platform::builder().config(config(dir.path())).build().await.unwrap();
    assert!(second.seeded().created.is_empty());
    assert_eq!(second.layouts().list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn locked_inactive_core_layout_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("layouts")).unwrap();
    let first = Platform::builder().config(config(dir.path())).build().await.unwrap();

    let mut footer = first.layouts().get("core-footer-site").await.unwrap();
    footer.is_active = false;
    footer.is_locked = true;
    first.layouts().save(footer).await.unwrap();

    let second = Platform::builder().config(config(dir.path())).build().await.unwrap();
    assert!(second.seeded().created.is_empty());
    let footer = second.layouts().get("core-footer-site").await.unwrap();
    assert!(!footer.is_active && footer.is_locked);
}

#[tokio::test]
async fn seeding_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.layout.seed_core_layouts = false;

    let platform = Platform::builder().config(cfg).layout_source(MemoryLayoutSource::new()).build().await.unwrap();
    assert!(platform.layouts().list().await.unwrap().is_empty());
    assert!(platform.render_active("footer", LayoutScope::Site, &PermissionSet::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn renders_active_layouts_for_the_configured_scope() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Platform::builder().config(config(dir.path())).build().await.unwrap();

    let topnav = platform
        .render_active("topnav", LayoutScope::Site, &PermissionSet::new())
        .await
        .unwrap()
        .unwrap();
    assert!(topnav.report.warnings.is_empty(), "{:?}", topnav.report.warnings);
    assert!(topnav.to_html().contains("data-island=\"SearchButton\""));
    assert!(platform.registry().contains("Logo"));
    assert!(!platform.registry().contains("AdminLayout"));
}

#[test]
fn enabled_features_are_listed() {
    assert!(features::is_enabled("theme"));
    assert!(features::is_enabled("layout"));
    assert!(!features::is_enabled("licensing"));
}
