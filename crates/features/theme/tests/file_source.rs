use impulse_theme::{FileThemeSource, LoadOutcome, StoreOptions, ThemeError, ThemeSource, ThemeStore};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, file: &str, body: &serde_json::Value) {
    fs::write(dir.path().join(file), serde_json::to_vec_pretty(body).unwrap()).unwrap();
}

fn seeded() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "neon.json", &json!({
        "id": "neon",
        "name": "Neon",
        "is_default": true,
        "design_tokens": { "colors": { "primary": "#00F0FF" } }
    }));
    write(&dir, "paper.json", &json!({
        "id": "paper",
        "name": "Paper",
        "status": "unknown-status",
        "design_tokens": { "colors": { "primary": "#FFFFFF" } }
    }));
    fs::write(dir.path().join("broken.json"), b"{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
    dir
}

#[tokio::test]
async fn fetches_rows_by_id() {
    let dir = seeded();
    let source = FileThemeSource::new(dir.path());

    let paper = source.fetch("paper").await.unwrap();
    assert_eq!(paper.name, "Paper");

    assert!(matches!(source.fetch("absent").await, Err(ThemeError::NotFound { .. })));
    assert!(matches!(source.fetch("../etc/passwd").await, Err(ThemeError::Malformed { .. })));
    assert!(matches!(source.fetch("broken").await, Err(ThemeError::Json { .. })));
}

#[tokio::test]
async fn lists_readable_rows_and_finds_default() {
    let dir = seeded();
    let source = FileThemeSource::new(dir.path());

    let ids: Vec<_> = source.list().await.unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, ["neon", "paper"]);
    assert_eq!(source.fetch_default().await.unwrap().id, "neon");
}

#[tokio::test]
async fn several_defaults_resolve_deterministically() {
    let dir = seeded();
    write(&dir, "aurora.json", &json!({ "id": "aurora", "name": "Aurora", "is_default": true }));
    let source = FileThemeSource::new(dir.path());

    assert_eq!(source.fetch_default().await.unwrap().id, "aurora");
}

#[tokio::test]
async fn missing_directory_has_no_themes() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileThemeSource::new(dir.path().join("nope"));

    assert!(source.list().await.unwrap().is_empty());
    assert!(matches!(source.fetch_default().await, Err(ThemeError::NotFound { .. })));
}

#[tokio::test]
async fn store_loads_default_from_disk() {
    let dir = seeded();
    let store = ThemeStore::new(FileThemeSource::new(dir.path()), StoreOptions::default());

    let outcome = store.load_default().await.unwrap();
    assert!(matches!(outcome, LoadOutcome::Applied(ref rev) if rev.theme_id == "neon"));
    assert_eq!(store.css_variables().get("--colors-primary-rgb"), Some("0, 240, 255"));
}
