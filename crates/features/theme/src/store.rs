use crate::error::ThemeError;
use crate::fallback::emergency_theme;
use crate::projector::{CssProjector, CssVariables, ProjectionReport, ProjectorOptions, StyleTarget};
use crate::source::ThemeSource;
use crate::styles;
use crate::tokens::merge_tokens;
use impulse_domain::config::ThemeConfig;
use impulse_domain::theme::{DesignTokens, StyleMap, Theme, ThemeContext};
use moka::sync::Cache;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Lifecycle of the most recent load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing was requested yet; the emergency theme is active.
    Idle,
    Loading,
    Loaded,
    /// The latest request failed; the previous theme (or the emergency one) stays active.
    Failed,
}

/// Identifies one applied state of the store. Broadcast to subscribers on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRevision {
    pub theme_id: String,
    pub version: u32,
    /// Increases by one for every applied change.
    pub revision: u64,
    pub is_fallback: bool,
    pub is_preview: bool,
}

/// Result of a load that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(ThemeRevision),
    /// A newer request was issued while this one was in flight; its result was discarded.
    Superseded { ticket: u64, latest: u64 },
}

/// Why the latest load failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// `None` when the default theme was requested.
    pub theme_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    pub default_context: ThemeContext,
    pub style_cache_capacity: u64,
    pub projector: ProjectorOptions,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::from(&ThemeConfig::default())
    }
}

impl From<&ThemeConfig> for StoreOptions {
    fn from(cfg: &ThemeConfig) -> Self {
        Self {
            default_context: cfg.context,
            style_cache_capacity: cfg.style_cache_capacity,
            projector: ProjectorOptions { rgb_channels: cfg.rgb_channels },
        }
    }
}

#[derive(Debug)]
struct Snapshot {
    theme: Arc<Theme>,
    status: LoadStatus,
    failure: Option<LoadFailure>,
    revision: u64,
    is_fallback: bool,
    is_preview: bool,
}

impl Snapshot {
    fn describe(&self) -> ThemeRevision {
        ThemeRevision {
            theme_id: self.theme.id.clone(),
            version: self.theme.version,
            revision: self.revision,
            is_fallback: self.is_fallback,
            is_preview: self.is_preview,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StyleKey {
    revision: u64,
    name: String,
    context: Option<ThemeContext>,
}

/// Holds the active theme and serves component styles from it.
///
/// Starts on the emergency theme. Loads are asynchronous; when several overlap, only the
/// most recently issued one is applied, whichever finishes last.
#[impulse_derive::shared_handle]
pub struct ThemeStore {
    source: Arc<dyn ThemeSource>,
    snapshot: RwLock<Snapshot>,
    tickets: AtomicU64,
    styles: Cache<StyleKey, Arc<StyleMap>>,
    projector: Mutex<CssProjector>,
    revisions: watch::Sender<ThemeRevision>,
    default_context: ThemeContext,
}

impl ThemeStore {
    pub fn new(source: impl ThemeSource + 'static, options: StoreOptions) -> Self {
        Self::with_source(Arc::new(source), options)
    }

    #[must_use]
    pub fn with_source(source: Arc<dyn ThemeSource>, options: StoreOptions) -> Self {
        let snapshot = Snapshot {
            theme: Arc::new(emergency_theme()),
            status: LoadStatus::Idle,
            failure: None,
            revision: 0,
            is_fallback: true,
            is_preview: false,
        };
        let (revisions, _) = watch::channel(snapshot.describe());

        Self::from_state(ThemeStoreState {
            source,
            snapshot: RwLock::new(snapshot),
            tickets: AtomicU64::new(0),
            styles: Cache::builder().max_capacity(options.style_cache_capacity).build(),
            projector: Mutex::new(CssProjector::new(options.projector)),
            revisions,
            default_context: options.default_context,
        })
    }

    #[must_use]
    pub fn source(&self) -> &Arc<dyn ThemeSource> {
        &self.source
    }

    /// The active theme.
    #[must_use]
    pub fn current(&self) -> Arc<Theme> {
        self.snapshot.read().theme.clone()
    }

    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.snapshot.read().status
    }

    #[must_use]
    pub fn last_error(&self) -> Option<LoadFailure> {
        self.snapshot.read().failure.clone()
    }

    #[must_use]
    pub fn revision(&self) -> ThemeRevision {
        self.snapshot.read().describe()
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.snapshot.read().is_fallback
    }

    /// Receives a [`ThemeRevision`] every time the active theme changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ThemeRevision> {
        self.revisions.subscribe()
    }

    /// Fetches `theme_id` from the source and makes it active.
    ///
    /// # Errors
    /// The source's error when this is still the latest request. The previously active theme
    /// is retained, the status becomes [`LoadStatus::Failed`] and [`Self::last_error`] is set.
    /// A superseded request never fails: it resolves to [`LoadOutcome::Superseded`].
    #[instrument(skip(self))]
    pub async fn load(&self, theme_id: &str) -> Result<LoadOutcome, ThemeError> {
        let ticket = self.issue_ticket();
        let fetched = self.source.fetch(theme_id).await;
        self.settle(ticket, Some(theme_id), fetched)
    }

    /// Fetches the source's default theme and makes it active. See [`Self::load`].
    ///
    /// # Errors
    /// As [`Self::load`].
    #[instrument(skip(self))]
    pub async fn load_default(&self) -> Result<LoadOutcome, ThemeError> {
        let ticket = self.issue_ticket();
        let fetched = self.source.fetch_default().await;
        self.settle(ticket, None, fetched)
    }

    fn issue_ticket(&self) -> u64 {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshot.write().status = LoadStatus::Loading;
        debug!(ticket, "Issued theme load");
        ticket
    }

    fn settle(
        &self,
        ticket: u64,
        requested: Option<&str>,
        fetched: Result<Theme, ThemeError>,
    ) -> Result<LoadOutcome, ThemeError> {
        let mut snapshot = self.snapshot.write();

        let latest = self.tickets.load(Ordering::SeqCst);
        if ticket != latest {
            debug!(ticket, latest, ok = fetched.is_ok(), "Discarding superseded theme load");
            return Ok(LoadOutcome::Superseded { ticket, latest });
        }

        match fetched {
            Ok(theme) => {
                info!(theme = %theme.id, version = theme.version, "Theme applied");
                snapshot.theme = Arc::new(theme);
                snapshot.status = LoadStatus::Loaded;
                snapshot.failure = None;
                snapshot.is_fallback = false;
                snapshot.is_preview = false;
                let applied = self.advance(&mut snapshot);
                Ok(LoadOutcome::Applied(applied))
            },
            Err(err) => {
                warn!(
                    requested = requested.unwrap_or("<default>"),
                    retained = %snapshot.theme.id,
                    %err,
                    "Theme load failed"
                );
                snapshot.status = LoadStatus::Failed;
                snapshot.failure = Some(LoadFailure {
                    theme_id: requested.map(str::to_owned),
                    message: err.to_string(),
                });
                Err(err)
            },
        }
    }

    fn advance(&self, snapshot: &mut Snapshot) -> ThemeRevision {
        snapshot.revision += 1;
        self.styles.invalidate_all();
        let revision = snapshot.describe();
        self.revisions.send_replace(revision.clone());
        revision
    }

    /// Deep-merges `overrides` over the active theme's tokens without persisting anything.
    ///
    /// The merged theme stays active until the next applied load.
    #[instrument(skip_all)]
    pub fn preview_tokens(&self, overrides: &DesignTokens) -> ThemeRevision {
        let mut snapshot = self.snapshot.write();
        let mut theme = Theme::clone(&snapshot.theme);
        merge_tokens(&mut theme.design_tokens, overrides);
        theme.cache_key = Some(format!("{}@{}+preview{}", theme.id, theme.version, snapshot.revision + 1));
        snapshot.theme = Arc::new(theme);
        snapshot.is_preview = true;
        self.advance(&mut snapshot)
    }

    /// Styles of the most specific component token for `name` in `context`, else of the
    /// context-free token, else empty. Memoized until the active theme changes.
    #[must_use]
    pub fn get_component_styles(&self, name: &str, context: Option<ThemeContext>) -> Arc<StyleMap> {
        let (theme, revision) = {
            let snapshot = self.snapshot.read();
            (snapshot.theme.clone(), snapshot.revision)
        };
        let key = StyleKey { revision, name: name.to_owned(), context };
        self.styles.get_with(key, || Arc::new(styles::component_styles(&theme, name, context)))
    }

    /// [`Self::get_component_styles`] in the store's default context.
    #[must_use]
    pub fn component_styles(&self, name: &str) -> Arc<StyleMap> {
        self.get_component_styles(name, Some(self.default_context))
    }

    /// Component styles with the active theme's composition rules applied.
    #[must_use]
    pub fn composed_styles(&self, name: &str, context: Option<ThemeContext>) -> StyleMap {
        styles::composed_styles(&self.current(), name, context)
    }

    /// Precomputed CSS the active theme ships for a component.
    #[must_use]
    pub fn cached_css(&self, name: &str, context: Option<ThemeContext>) -> Option<String> {
        styles::cached_css(&self.current(), name, context).map(str::to_owned)
    }

    /// Class name of a component under the active theme.
    #[must_use]
    pub fn theme_class(&self, name: &str, context: Option<ThemeContext>) -> String {
        styles::theme_class(&self.current().id, name, context)
    }

    /// CSS variables of the active theme.
    #[must_use]
    pub fn css_variables(&self) -> CssVariables {
        self.projector.lock().derive(&self.current())
    }

    /// Writes the active theme's CSS variables onto `target`.
    pub fn project<T>(&self, target: &mut T) -> ProjectionReport
    where
        T: StyleTarget + ?Sized,
    {
        let theme = self.current();
        self.projector.lock().project(&theme, target)
    }
}
