use fxhash::FxHashMap;
use impulse_theme::domain::constants::FALLBACK_THEME_ID;
use impulse_theme::domain::theme::{ComponentToken, DesignTokens, StyleMap, Theme, ThemeContext};
use impulse_theme::{
    BoxFuture, InlineStyle, LoadOutcome, LoadStatus, MemoryThemeSource, StoreOptions, StyleTarget,
    ThemeError, ThemeSource, ThemeStore,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::oneshot;

fn theme(id: &str, primary: &str) -> Theme {
    Theme {
        id: id.to_owned(),
        name: id.to_uppercase(),
        design_tokens: serde_json::from_value(json!({ "colors": { "primary": primary } })).unwrap(),
        component_tokens: vec![
            ComponentToken {
                id: format!("{id}-button-admin"),
                component_name: "button".to_owned(),
                context: Some(ThemeContext::Admin),
                styles: StyleMap::from([("color".to_owned(), format!("{id}-admin"))]),
                ..ComponentToken::default()
            },
            ComponentToken {
                id: format!("{id}-button"),
                component_name: "button".to_owned(),
                styles: StyleMap::from([("color".to_owned(), format!("{id}-any"))]),
                ..ComponentToken::default()
            },
        ],
        ..Theme::default()
    }
}

fn store_with(themes: impl IntoIterator<Item = Theme>) -> ThemeStore {
    ThemeStore::new(themes.into_iter().collect::<MemoryThemeSource>(), StoreOptions::default())
}

/// Holds each fetch until its gate is opened.
#[derive(Debug, Default)]
struct GatedSource {
    inner: MemoryThemeSource,
    gates: Mutex<FxHashMap<String, oneshot::Receiver<()>>>,
}

impl GatedSource {
    fn gate(&self, theme_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(theme_id.to_owned(), rx);
        tx
    }
}

impl ThemeSource for GatedSource {
    fn fetch<'a>(&'a self, theme_id: &'a str) -> BoxFuture<'a, Result<Theme, ThemeError>> {
        let gate = self.gates.lock().remove(theme_id);
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.inner.fetch(theme_id).await
        })
    }

    fn fetch_default(&self) -> BoxFuture<'_, Result<Theme, ThemeError>> {
        self.inner.fetch_default()
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Theme>, ThemeError>> {
        self.inner.list()
    }
}

#[tokio::test]
async fn starts_on_the_emergency_theme() {
    let store = store_with([]);
    assert_eq!(store.status(), LoadStatus::Idle);
    assert!(store.is_fallback());
    assert_eq!(store.current().id, FALLBACK_THEME_ID);

    let mut root = InlineStyle::new();
    store.project(&mut root);
    assert_eq!(root.property("--colors-primary"), Some("#00F0FF"));
}

#[tokio::test]
async fn load_applies_and_broadcasts() {
    let store = store_with([theme("neon", "#FF00FF")]);
    let mut revisions = store.subscribe();

    let outcome = store.load("neon").await.unwrap();
    let LoadOutcome::Applied(applied) = outcome else { panic!("expected applied, got {outcome:?}") };
    assert_eq!(applied.theme_id, "neon");
    assert_eq!(applied.revision, 1);
    assert!(!applied.is_fallback);

    assert!(revisions.has_changed().unwrap());
    assert_eq!(revisions.borrow_and_update().theme_id, "neon");
    assert_eq!(store.status(), LoadStatus::Loaded);
    assert_eq!(store.css_variables().get("--colors-primary"), Some("#FF00FF"));
}

#[tokio::test]
async fn failed_load_keeps_previous_theme() {
    let store = store_with([theme("neon", "#FF00FF")]);
    store.load("neon").await.unwrap();

    let err = store.load("missing").await.unwrap_err();
    assert!(matches!(err, ThemeError::NotFound { .. }));
    assert_eq!(store.status(), LoadStatus::Failed);
    assert_eq!(store.current().id, "neon");

    let failure = store.last_error().unwrap();
    assert_eq!(failure.theme_id.as_deref(), Some("missing"));
    assert!(failure.message.contains("missing"));

    store.load("neon").await.unwrap();
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn failure_before_any_load_keeps_fallback() {
    let store = store_with([]);
    assert!(store.load_default().await.is_err());
    assert!(store.is_fallback());
    assert_eq!(store.last_error().unwrap().theme_id, None);
}

#[tokio::test]
async fn latest_request_wins_when_older_finishes_last() {
    let source = GatedSource::default();
    source.inner.insert(theme("a", "#AAAAAA"));
    source.inner.insert(theme("b", "#BBBBBB"));
    let open_a = source.gate("a");
    let open_b = source.gate("b");
    let store = ThemeStore::new(source, StoreOptions::default());

    let release = async {
        tokio::task::yield_now().await;
        open_b.send(()).unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        open_a.send(()).unwrap();
    };
    let (first, second, ()) = tokio::join!(store.load("a"), store.load("b"), release);

    assert!(matches!(first.unwrap(), LoadOutcome::Superseded { ticket: 1, latest: 2 }));
    assert!(matches!(second.unwrap(), LoadOutcome::Applied(_)));
    assert_eq!(store.current().id, "b");
}

#[tokio::test]
async fn latest_request_wins_when_older_finishes_first() {
    let source = GatedSource::default();
    source.inner.insert(theme("a", "#AAAAAA"));
    source.inner.insert(theme("b", "#BBBBBB"));
    let open_a = source.gate("a");
    let open_b = source.gate("b");
    let store = ThemeStore::new(source, StoreOptions::default());

    let release = async {
        tokio::task::yield_now().await;
        open_a.send(()).unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        open_b.send(()).unwrap();
    };
    let (first, second, ()) = tokio::join!(store.load("a"), store.load("b"), release);

    assert!(matches!(first.unwrap(), LoadOutcome::Superseded { .. }));
    assert!(matches!(second.unwrap(), LoadOutcome::Applied(_)));
    assert_eq!(store.current().id, "b");
    assert_eq!(store.revision().revision, 1);
}

#[tokio::test]
async fn stale_failure_is_discarded() {
    let source = GatedSource::default();
    source.inner.insert(theme("b", "#BBBBBB"));
    let open_missing = source.gate("missing");
    let store = ThemeStore::new(source, StoreOptions::default());

    let release = async {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        open_missing.send(()).unwrap();
    };
    let (stale, latest, ()) = tokio::join!(store.load("missing"), store.load("b"), release);

    assert!(matches!(stale.unwrap(), LoadOutcome::Superseded { .. }));
    assert!(latest.is_ok());
    assert_eq!(store.status(), LoadStatus::Loaded);
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn component_styles_follow_the_active_theme() {
    let store = store_with([theme("a", "#AAAAAA"), theme("b", "#BBBBBB")]);
    store.load("a").await.unwrap();

    let admin = store.get_component_styles("button", Some(ThemeContext::Admin));
    assert_eq!(admin.get("color").map(String::as_str), Some("a-admin"));
    let site = store.get_component_styles("button", Some(ThemeContext::Site));
    assert_eq!(site.get("color").map(String::as_str), Some("a-any"));
    assert!(store.get_component_styles("card", None).is_empty());

    store.load("b").await.unwrap();
    let admin = store.get_component_styles("button", Some(ThemeContext::Admin));
    assert_eq!(admin.get("color").map(String::as_str), Some("b-admin"));
    assert_eq!(store.theme_class("button", Some(ThemeContext::Admin)), "theme-b-button-admin");
}

#[tokio::test]
async fn preview_overrides_until_next_load() {
    let store = store_with([theme("a", "#AAAAAA")]);
    store.load("a").await.unwrap();

    let overrides: DesignTokens =
        serde_json::from_value(json!({ "colors": { "primary": "#123456" } })).unwrap();
    let preview = store.preview_tokens(&overrides);
    assert!(preview.is_preview);
    assert_eq!(preview.revision, 2);
    assert_eq!(store.css_variables().get("--colors-primary"), Some("#123456"));
    assert_eq!(store.css_variables().get("--colors-primary-rgb"), Some("18, 52, 86"));

    store.load("a").await.unwrap();
    assert!(!store.revision().is_preview);
    assert_eq!(store.css_variables().get("--colors-primary"), Some("#AAAAAA"));
}

#[tokio::test]
async fn projection_after_switch_only_touches_changes() {
    let store = store_with([theme("a", "#AAAAAA"), theme("b", "#BBBBBB")]);
    let mut root = InlineStyle::new();

    store.load("a").await.unwrap();
    store.project(&mut root);
    assert!(store.project(&mut root).is_noop());

    store.load("b").await.unwrap();
    let report = store.project(&mut root);
    // `--colors-primary` and its `-rgb` companion
    assert_eq!(report.written, 2);
    assert_eq!(report.removed, 0);
    assert_eq!(root.attribute("data-theme"), Some("b"));
}
