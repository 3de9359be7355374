use crate::error::{PlatformError, PlatformErrorExt};
use impulse_domain::config::{AppConfig, LayoutConfig, ThemeConfig};
use impulse_domain::layout::{Layout, LayoutScope};
use impulse_kernel::security::PermissionCheck;
use impulse_layout::{
    ComponentRegistry, FileLayoutSource, LayoutError, LayoutResolver, LayoutSource, MemoryLayoutSource,
    RenderTree, SeedReport, components, seed_core_layouts,
};
use impulse_theme::{FileThemeSource, MemoryThemeSource, StoreOptions, ThemeSource, ThemeStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A fluent builder for the [`Platform`].
///
/// Sources not set explicitly come from the config: a directory source when the configured
/// directory exists, the built-in presets (themes) or an empty in-memory store (layouts)
/// otherwise.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct PlatformBuilder {
    cfg: AppConfig,
    themes: Option<Arc<dyn ThemeSource>>,
    layouts: Option<Arc<dyn LayoutSource>>,
}

impl PlatformBuilder {
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn theme_source(mut self, source: impl ThemeSource + 'static) -> Self {
        self.themes = Some(Arc::new(source));
        self
    }

    pub fn layout_source(mut self, source: impl LayoutSource + 'static) -> Self {
        self.layouts = Some(Arc::new(source));
        self
    }

    fn default_theme_source(cfg: &ThemeConfig) -> Arc<dyn ThemeSource> {
        if cfg.source_dir.is_dir() {
            info!(dir = %cfg.source_dir.display(), "Reading themes from directory");
            Arc::new(FileThemeSource::new(&cfg.source_dir))
        } else {
            info!(dir = %cfg.source_dir.display(), "Theme directory absent, serving built-in presets");
            Arc::new(MemoryThemeSource::with_presets())
        }
    }

    fn default_layout_source(cfg: &LayoutConfig) -> Arc<dyn LayoutSource> {
        if cfg.source_dir.is_dir() {
            info!(dir = %cfg.source_dir.display(), "Reading layouts from directory");
            Arc::new(FileLayoutSource::new(&cfg.source_dir))
        } else {
            info!(dir = %cfg.source_dir.display(), "Layout directory absent, keeping layouts in memory");
            Arc::new(MemoryLayoutSource::new())
        }
    }

    /// Consumes the builder and wires the slices.
    ///
    /// # Process
    /// 1. Creates the theme store and loads the configured (or default) theme
    /// 2. Bootstraps the component registry for the configured scope
    /// 3. Seeds the core layouts when enabled
    ///
    /// A theme that cannot be loaded is not an error: the store keeps the emergency fallback
    /// and records the failure.
    ///
    /// # Errors
    /// [`PlatformError::Layout`] when seeding fails.
    #[instrument(skip_all)]
    pub async fn build(self) -> Result<Platform, PlatformError> {
        let cfg = self.cfg;

        // 1. Themes
        let theme_source = self.themes.unwrap_or_else(|| Self::default_theme_source(&cfg.theme));
        let themes = ThemeStore::with_source(theme_source, StoreOptions::from(&cfg.theme));
        let loaded = match &cfg.theme.default_theme {
            Some(theme_id) => themes.load(theme_id).await,
            None => themes.load_default().await,
        };
        if let Err(err) = loaded {
            warn!(%err, "Initial theme unavailable, continuing with the fallback theme");
        }

        // 2. Components
        let registry = ComponentRegistry::new();
        let registered = components::bootstrap(&registry, cfg.layout.scope);
        let resolver = LayoutResolver::from_config(registry.clone(), &cfg.layout);

        // 3. Layouts
        let layouts = self.layouts.unwrap_or_else(|| Self::default_layout_source(&cfg.layout));
        let seeded = if cfg.layout.seed_core_layouts {
            seed_core_layouts(layouts.as_ref()).await.context("Failed to seed core layouts")?
        } else {
            SeedReport::default()
        };

        info!(
            theme = %themes.current().id,
            fallback = themes.is_fallback(),
            components = registered,
            seeded = seeded.created.len(),
            "Platform ready"
        );
        Ok(Platform { cfg, themes, registry, resolver, layouts, seeded })
    }
}

/// The theme store, component registry and layout resolver of one process.
#[derive(Debug, Clone)]
pub struct Platform {
    cfg: AppConfig,
    themes: ThemeStore,
    registry: ComponentRegistry,
    resolver: LayoutResolver,
    layouts: Arc<dyn LayoutSource>,
    seeded: SeedReport,
}

impl Platform {
    pub fn builder() -> PlatformBuilder {
        PlatformBuilder::default()
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn themes(&self) -> &ThemeStore {
        &self.themes
    }

    #[must_use]
    pub const fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn resolver(&self) -> &LayoutResolver {
        &self.resolver
    }

    #[must_use]
    pub fn layouts(&self) -> &dyn LayoutSource {
        self.layouts.as_ref()
    }

    /// What seeding did during [`PlatformBuilder::build`].
    #[must_use]
    pub const fn seeded(&self) -> &SeedReport {
        &self.seeded
    }

    /// Fetches and resolves the layout `layout_id`.
    ///
    /// # Errors
    /// Source errors only; resolution itself never fails.
    pub async fn render<P>(&self, layout_id: &str, permissions: &P) -> Result<RenderTree, LayoutError>
    where
        P: PermissionCheck + ?Sized,
    {
        let layout = self.layouts.get(layout_id).await?;
        Ok(self.resolver.resolve(&layout, permissions))
    }

    /// Resolves the active layout of `layout_type` in `scope`, if there is one.
    ///
    /// # Errors
    /// Source errors only.
    pub async fn render_active<P>(
        &self,
        layout_type: &str,
        scope: LayoutScope,
        permissions: &P,
    ) -> Result<Option<RenderTree>, LayoutError>
    where
        P: PermissionCheck + ?Sized,
    {
        let layout: Option<Layout> = self.layouts.get_by_type_and_scope(layout_type, scope).await?;
        Ok(layout.map(|layout| self.resolver.resolve(&layout, permissions)))
    }
}
