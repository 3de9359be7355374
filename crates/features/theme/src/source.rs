//! Where themes come from.

use crate::document::parse_theme_slice;
use crate::error::{ThemeError, ThemeErrorExt};
use crate::presets::presets;
use crate::validation::pick_default;
use fxhash::FxHashMap;
use impulse_domain::theme::Theme;
use parking_lot::RwLock;
use std::fmt;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tracing::{debug, warn};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Async theme backend (database, file tree, remote API).
///
/// Methods return boxed futures so stores can hold any source behind `Arc<dyn ThemeSource>`.
pub trait ThemeSource: Send + Sync + fmt::Debug {
    /// The theme with `theme_id`.
    fn fetch<'a>(&'a self, theme_id: &'a str) -> BoxFuture<'a, Result<Theme, ThemeError>>;

    /// The theme flagged as default.
    fn fetch_default(&self) -> BoxFuture<'_, Result<Theme, ThemeError>>;

    /// Every available theme, ordered by id.
    fn list(&self) -> BoxFuture<'_, Result<Vec<Theme>, ThemeError>>;
}

fn not_found(theme_id: &str) -> ThemeError {
    ThemeError::NotFound { message: format!("no theme with id '{theme_id}'").into(), context: None }
}

fn no_default() -> ThemeError {
    ThemeError::NotFound { message: "no theme is flagged as default".into(), context: None }
}

/// Themes kept in memory, keyed by id.
#[derive(Default)]
pub struct MemoryThemeSource {
    themes: RwLock<FxHashMap<String, Theme>>,
}

impl MemoryThemeSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source preloaded with the built-in presets.
    #[must_use]
    pub fn with_presets() -> Self {
        presets().into_iter().collect()
    }

    /// Inserts or replaces a theme; returns the previous one with the same id.
    pub fn insert(&self, theme: Theme) -> Option<Theme> {
        self.themes.write().insert(theme.id.clone(), theme)
    }

    pub fn remove(&self, theme_id: &str) -> Option<Theme> {
        self.themes.write().remove(theme_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.themes.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.read().is_empty()
    }

    fn sorted(&self) -> Vec<Theme> {
        let mut themes: Vec<_> = self.themes.read().values().cloned().collect();
        themes.sort_by(|a, b| a.id.cmp(&b.id));
        themes
    }
}

impl FromIterator<Theme> for MemoryThemeSource {
    fn from_iter<I: IntoIterator<Item = Theme>>(iter: I) -> Self {
        Self { themes: RwLock::new(iter.into_iter().map(|t| (t.id.clone(), t)).collect()) }
    }
}

impl fmt::Debug for MemoryThemeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.themes.read().keys().cloned().collect();
        ids.sort();
        f.debug_struct("MemoryThemeSource").field("themes", &ids).finish()
    }
}

impl ThemeSource for MemoryThemeSource {
    fn fetch<'a>(&'a self, theme_id: &'a str) -> BoxFuture<'a, Result<Theme, ThemeError>> {
        let found = self.themes.read().get(theme_id).cloned();
        Box::pin(async move { found.ok_or_else(|| not_found(theme_id)) })
    }

    fn fetch_default(&self) -> BoxFuture<'_, Result<Theme, ThemeError>> {
        let themes = self.sorted();
        Box::pin(async move { pick_default(&themes).cloned().ok_or_else(no_default) })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Theme>, ThemeError>> {
        let themes = self.sorted();
        Box::pin(async move { Ok(themes) })
    }
}

/// A directory of `<theme id>.json` rows, decoded leniently.
#[derive(Debug, Clone)]
pub struct FileThemeSource {
    root: PathBuf,
}

impl FileThemeSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, theme_id: &str) -> Result<PathBuf, ThemeError> {
        let valid = !theme_id.is_empty()
            && theme_id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if !valid {
            return Err(ThemeError::Malformed {
                message: format!("invalid theme id '{theme_id}'").into(),
                context: None,
            });
        }
        Ok(self.root.join(format!("{theme_id}.json")))
    }

    async fn read(path: &Path) -> Result<Theme, ThemeError> {
        let bytes = tokio::fs::read(path).await?;
        let parsed = parse_theme_slice(&bytes).context(path.display().to_string())?;
        Ok(parsed.theme)
    }

    async fn read_all(&self) -> Result<Vec<Theme>, ThemeError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(root = %self.root.display(), "Theme directory does not exist");
                return Ok(Vec::new());
            },
            Err(err) => return Err(err).context("Failed to list theme directory"),
        };

        let mut themes = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path).await {
                Ok(theme) => themes.push(theme),
                Err(err) => warn!(path = %path.display(), %err, "Skipping unreadable theme"),
            }
        }
        themes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(themes)
    }
}

impl ThemeSource for FileThemeSource {
    fn fetch<'a>(&'a self, theme_id: &'a str) -> BoxFuture<'a, Result<Theme, ThemeError>> {
        Box::pin(async move {
            let path = self.path_for(theme_id)?;
            debug!(path = %path.display(), "Reading theme");
            match Self::read(&path).await {
                Err(ThemeError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                    Err(not_found(theme_id))
                },
                other => other,
            }
        })
    }

    fn fetch_default(&self) -> BoxFuture<'_, Result<Theme, ThemeError>> {
        Box::pin(async move {
            let themes = self.read_all().await?;
            pick_default(&themes).cloned().ok_or_else(no_default)
        })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Theme>, ThemeError>> {
        Box::pin(self.read_all())
    }
}
