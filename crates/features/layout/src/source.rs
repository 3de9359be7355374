//! Where layouts come from.

use crate::document::parse_layout_slice;
use crate::error::{LayoutError, LayoutErrorExt};
use fxhash::FxHashMap;
use impulse_domain::layout::{Layout, LayoutScope};
use parking_lot::RwLock;
use std::fmt;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Async layout backend.
pub trait LayoutSource: Send + Sync + fmt::Debug {
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Layout, LayoutError>>;

    /// The active layout of `layout_type` in `scope`; the highest version wins.
    fn get_by_type_and_scope<'a>(
        &'a self,
        layout_type: &'a str,
        scope: LayoutScope,
    ) -> BoxFuture<'a, Result<Option<Layout>, LayoutError>>;

    /// Every layout, ordered by id.
    fn list(&self) -> BoxFuture<'_, Result<Vec<Layout>, LayoutError>>;

    /// Inserts or replaces a layout. Locked layouts cannot be replaced.
    fn save(&self, layout: Layout) -> BoxFuture<'_, Result<(), LayoutError>>;
}

/// The active layout of `layout_type` in `scope` among `layouts`.
#[must_use]
pub fn pick_active<'a>(
    layouts: impl IntoIterator<Item = &'a Layout>,
    layout_type: &str,
    scope: LayoutScope,
) -> Option<&'a Layout> {
    layouts
        .into_iter()
        .filter(|l| l.is_active && l.scope == scope && l.layout_type == layout_type)
        .max_by(|a, b| a.version.cmp(&b.version).then_with(|| b.id.cmp(&a.id)))
}

fn not_found(id: &str) -> LayoutError {
    LayoutError::NotFound { message: format!("no layout with id '{id}'").into(), context: None }
}

fn locked(id: &str) -> LayoutError {
    LayoutError::Locked { message: format!("layout '{id}' is locked").into(), context: None }
}

#[derive(Default)]
pub struct MemoryLayoutSource {
    layouts: RwLock<FxHashMap<String, Layout>>,
}

impl MemoryLayoutSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.read().is_empty()
    }
}

impl FromIterator<Layout> for MemoryLayoutSource {
    fn from_iter<I: IntoIterator<Item = Layout>>(iter: I) -> Self {
        Self { layouts: RwLock::new(iter.into_iter().map(|l| (l.id.clone(), l)).collect()) }
    }
}

impl fmt::Debug for MemoryLayoutSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.layouts.read().keys().cloned().collect();
        ids.sort();
        f.debug_struct("MemoryLayoutSource").field("layouts", &ids).finish()
    }
}

impl LayoutSource for MemoryLayoutSource {
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Layout, LayoutError>> {
        let found = self.layouts.read().get(id).cloned();
        Box::pin(async move { found.ok_or_else(|| not_found(id)) })
    }

    fn get_by_type_and_scope<'a>(
        &'a self,
        layout_type: &'a str,
        scope: LayoutScope,
    ) -> BoxFuture<'a, Result<Option<Layout>, LayoutError>> {
        let found = pick_active(self.layouts.read().values(), layout_type, scope).cloned();
        Box::pin(async move { Ok(found) })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Layout>, LayoutError>> {
        let mut layouts: Vec<_> = self.layouts.read().values().cloned().collect();
        layouts.sort_by(|a, b| a.id.cmp(&b.id));
        Box::pin(async move { Ok(layouts) })
    }

    fn save(&self, layout: Layout) -> BoxFuture<'_, Result<(), LayoutError>> {
        let result = {
            let mut layouts = self.layouts.write();
            if layouts.get(&layout.id).is_some_and(|existing| existing.is_locked) {
                Err(locked(&layout.id))
            } else {
                layouts.insert(layout.id.clone(), layout);
                Ok(())
            }
        };
        Box::pin(async move { result })
    }
}

/// A directory of `<layout id>.json` rows, decoded leniently.
///
/// Saves go through a temporary sibling file that is synced and renamed over the row, so a
/// row is never left half written.
#[derive(Debug, Clone)]
pub struct FileLayoutSource {
    root: PathBuf,
    tmp_counter: Arc<AtomicU64>,
}

impl FileLayoutSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), tmp_counter: Arc::new(AtomicU64::new(0)) }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, LayoutError> {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if !valid {
            return Err(LayoutError::Malformed { message: format!("invalid layout id '{id}'").into(), context: None });
        }
        Ok(self.root.join(format!("{id}.json")))
    }

    async fn read(path: &Path) -> Result<Layout, LayoutError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(parse_layout_slice(&bytes).context(path.display().to_string())?.layout)
    }

    async fn read_all(&self) -> Result<Vec<Layout>, LayoutError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err).context("Failed to list layout directory"),
        };
        let mut layouts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path).await {
                Ok(layout) => layouts.push(layout),
                Err(err) => warn!(path = %path.display(), %err, "Skipping unreadable layout"),
            }
        }
        layouts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(layouts)
    }

    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), LayoutError> {
        let counter = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("layout");
        let temp = path.with_file_name(format!("{file_name}.tmp.{counter}"));

        {
            let mut file = tokio::fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(bytes).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = tokio::fs::rename(&temp, path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(LayoutError::Io {
                source: err,
                context: Some(format!("Atomic swap failed: {} -> {}", temp.display(), path.display()).into()),
            });
        }
        Ok(())
    }
}

impl LayoutSource for FileLayoutSource {
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Layout, LayoutError>> {
        Box::pin(async move {
            let path = self.path_for(id)?;
            match Self::read(&path).await {
                Err(LayoutError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Err(not_found(id)),
                other => other,
            }
        })
    }

    fn get_by_type_and_scope<'a>(
        &'a self,
        layout_type: &'a str,
        scope: LayoutScope,
    ) -> BoxFuture<'a, Result<Option<Layout>, LayoutError>> {
        Box::pin(async move {
            let layouts = self.read_all().await?;
            Ok(pick_active(&layouts, layout_type, scope).cloned())
        })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Layout>, LayoutError>> {
        Box::pin(self.read_all())
    }

    fn save(&self, layout: Layout) -> BoxFuture<'_, Result<(), LayoutError>> {
        Box::pin(async move {
            let path = self.path_for(&layout.id)?;
            // Only a missing row is free; an unreadable one may still be locked.
            match Self::read(&path).await {
                Ok(existing) if existing.is_locked => return Err(locked(&layout.id)),
                Ok(_) => {},
                Err(LayoutError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {},
                Err(err) => {
                    return Err(err).context(format!("Refusing to replace unreadable layout '{}'", layout.id));
                },
            }
            tokio::fs::create_dir_all(&self.root).await.context("Failed to create layout directory")?;
            let bytes = serde_json::to_vec_pretty(&layout)?;
            self.write_atomic(&path, &bytes).await?;
            debug!(layout = %layout.id, path = %path.display(), "Layout saved");
            Ok(())
        })
    }
}
