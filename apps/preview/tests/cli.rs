use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, body: &serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(body).unwrap()).unwrap();
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("themes/neon.json"), &json!({
        "id": "neon",
        "name": "Neon",
        "status": "published",
        "is_default": true,
        "design_tokens": { "colors": { "primary": "#00F0FF" } },
        "component_tokens": [
            { "component_name": "button", "context": "admin", "styles": { "border-radius": "4px", "color": "red" } },
            { "component_name": "button", "styles": { "border-radius": "9px" } }
        ],
        "cached_styles": { "button-admin": ".btn{border-radius:4px}" }
    }));
    write(&dir.path().join("layouts/home.json"), &json!({
        "id": "home",
        "name": "Home",
        "type": "page",
        "scope": "site",
        "is_active": true,
        "layout_json": { "components": [
            { "id": "intro", "type": "p", "props": { "children": "Welcome" } },
            { "id": "secret", "type": "p", "permissions": ["admin:edit"], "props": { "children": "Hidden" } },
            { "id": "gadget", "type": "Gadget" }
        ] }
    }));
    dir
}

fn impulse(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_impulse"));
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .arg("--themes")
        .arg(dir.path().join("themes"))
        .arg("--layouts")
        .arg(dir.path().join("layouts"))
        .arg("--no-seed");
    cmd
}

#[test]
fn without_arguments_prints_help() {
    Command::new(env!("CARGO_BIN_EXE_impulse")).assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn css_of_the_default_theme() {
    let dir = workspace();
    impulse(&dir)
        .arg("css")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(":root {"))
        .stdout(predicate::str::contains("  --colors-primary: #00F0FF;"))
        .stdout(predicate::str::contains("  --colors-primary-rgb: 0, 240, 255;"))
        .stdout(predicate::str::contains("--spacing-"));
}

#[test]
fn css_with_overrides_and_selector() {
    let dir = workspace();
    impulse(&dir)
        .args(["css", "--theme", "neon", "--selector", "[data-theme=\"neon\"]", "--set", "colors.primary=#FF0000"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[data-theme=\"neon\"] {"))
        .stdout(predicate::str::contains("--colors-primary: #FF0000;"));
}

#[test]
fn css_of_a_missing_theme_fails() {
    let dir = workspace();
    impulse(&dir)
        .args(["css", "--theme", "absent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot load theme 'absent'"));
}

#[test]
fn styles_prefer_the_context_token() {
    let dir = workspace();
    impulse(&dir)
        .args(["styles", "button", "--context", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".theme-neon-button-admin { border-radius: 4px; color: red }"))
        .stdout(predicate::str::contains(".btn{border-radius:4px}"));

    impulse(&dir)
        .args(["styles", "button", "--context", "shared"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".theme-neon-button { border-radius: 9px }"));
}

#[test]
fn render_filters_by_permission() {
    let dir = workspace();
    impulse(&dir)
        .args(["render", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("data-layout-id=\"home\""))
        .stdout(predicate::str::contains("<p>Welcome</p>"))
        .stdout(predicate::str::contains("Hidden").not())
        .stdout(predicate::str::contains("Component Not Found: Gadget"));

    impulse(&dir)
        .args(["render", "home", "--grant", "admin:edit", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>Hidden</p>"))
        .stdout(predicate::str::contains("Gadget").not());
}

#[test]
fn render_as_document_embeds_the_theme() {
    let dir = workspace();
    impulse(&dir)
        .args(["render", "home", "--document"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<html data-theme=\"neon\">"))
        .stdout(predicate::str::contains("--colors-primary: #00F0FF;"));
}

#[test]
fn validate_reports_problems() {
    let dir = workspace();
    impulse(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("layout home: node 'gadget' uses unregistered component 'Gadget'"));

    fs::remove_file(dir.path().join("layouts/home.json")).unwrap();
    impulse(&dir).arg("validate").assert().success().stdout("1 documents valid\n");
}

#[test]
fn seeding_writes_core_layouts_when_allowed() {
    let dir = workspace();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_impulse"));
    cmd.current_dir(dir.path())
        .args(["render", "core-footer-site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parts Library"));
    assert!(dir.path().join("layouts/core-footer-site.json").exists());
}
