use crate::props::{ComponentProps, PropsKind};
use fxhash::FxHashMap;
use impulse_domain::layout::RawProps;
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Inputs handed to a factory when a resolved node is rendered.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub node_id: &'a str,
    /// The type the layout asked for; differs from the factory for placeholders.
    pub kind: &'a str,
    pub props: &'a ComponentProps,
    /// Markup of the already rendered children.
    pub children: &'a str,
}

/// Something that renders a component.
pub trait ComponentFactory: Send + Sync + fmt::Debug {
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// A closure-backed factory; `name` is what `Debug` shows.
pub struct FnComponent<F> {
    name: &'static str,
    render: F,
}

impl<F> FnComponent<F>
where
    F: Fn(&RenderContext<'_>) -> String + Send + Sync,
{
    pub const fn new(name: &'static str, render: F) -> Self {
        Self { name, render }
    }
}

impl<F> fmt::Debug for FnComponent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnComponent").field(&self.name).finish()
    }
}

impl<F> ComponentFactory for FnComponent<F>
where
    F: Fn(&RenderContext<'_>) -> String + Send + Sync,
{
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        (self.render)(ctx)
    }
}

/// Descriptive data shown by component pickers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComponentMetadata {
    pub display_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Everything the registry knows about one component identifier.
#[derive(Debug, Clone)]
pub struct ComponentRegistration {
    pub factory: Arc<dyn ComponentFactory>,
    pub props: PropsKind,
    pub default_props: RawProps,
    /// Every listed permission must be granted, in addition to the node's own.
    pub permissions: Vec<String>,
    pub metadata: ComponentMetadata,
}

impl ComponentRegistration {
    pub fn new(factory: impl ComponentFactory + 'static) -> Self {
        Self::from_factory(Arc::new(factory))
    }

    #[must_use]
    pub fn from_factory(factory: Arc<dyn ComponentFactory>) -> Self {
        Self {
            factory,
            props: PropsKind::default(),
            default_props: RawProps::new(),
            permissions: Vec::new(),
            metadata: ComponentMetadata::default(),
        }
    }

    #[must_use]
    pub const fn with_props(mut self, kind: PropsKind) -> Self {
        self.props = kind;
        self
    }

    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_props.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn requires(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.metadata.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }
}

/// Maps component identifiers to their registrations.
///
/// An explicitly constructed handle: clones share the same entries. Bootstrapping registers
/// everything once per process; resolution only reads.
#[impulse_derive::shared_handle]
#[derive(Default)]
pub struct ComponentRegistry {
    entries: RwLock<FxHashMap<String, ComponentRegistration>>,
    fallback: RwLock<Option<Arc<dyn ComponentFactory>>>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::from_state(ComponentRegistryState::default())
    }
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `id`; returns the replaced registration.
    pub fn register(
        &self,
        id: impl Into<String>,
        registration: ComponentRegistration,
    ) -> Option<ComponentRegistration> {
        let id = id.into();
        let previous = self.entries.write().insert(id.clone(), registration);
        if previous.is_some() {
            debug!(component = %id, "Replaced component registration");
        }
        previous
    }

    /// Registers every entry under a single write lock; later duplicates win.
    pub fn register_bulk<I, K>(&self, registrations: I) -> usize
    where
        I: IntoIterator<Item = (K, ComponentRegistration)>,
        K: Into<String>,
    {
        let mut entries = self.entries.write();
        let mut count = 0;
        for (id, registration) in registrations {
            entries.insert(id.into(), registration);
            count += 1;
        }
        debug!(count, total = entries.len(), "Registered components");
        count
    }

    /// The factory for `id`, else the fallback factory, else `None`.
    #[must_use]
    pub fn get_component(&self, id: &str) -> Option<Arc<dyn ComponentFactory>> {
        self.entries
            .read()
            .get(id)
            .map(|r| r.factory.clone())
            .or_else(|| self.fallback.read().clone())
    }

    #[must_use]
    pub fn get_registration(&self, id: &str) -> Option<ComponentRegistration> {
        self.entries.read().get(id).cloned()
    }

    pub fn set_fallback_component(&self, factory: impl ComponentFactory + 'static) {
        *self.fallback.write() = Some(Arc::new(factory));
    }

    #[must_use]
    pub fn fallback(&self) -> Option<Arc<dyn ComponentFactory>> {
        self.fallback.read().clone()
    }

    /// Removes every registration and the fallback.
    pub fn clear(&self) {
        self.entries.write().clear();
        *self.fallback.write() = None;
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.entries.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(label: &'static str) -> impl ComponentFactory {
        FnComponent::new(label, move |_: &RenderContext<'_>| label.to_owned())
    }

    fn render(factory: &Arc<dyn ComponentFactory>) -> String {
        let props = ComponentProps::Opaque(RawProps::new());
        factory.render(&RenderContext { node_id: "n", kind: "k", props: &props, children: "" })
    }

    #[test]
    fn registered_then_fallback_then_none() {
        let registry = ComponentRegistry::new();
        assert!(registry.get_component("Card").is_none());

        registry.register("Card", ComponentRegistration::new(named("A")));
        assert!(registry.get_component("Widget").is_none());

        registry.set_fallback_component(named("B"));
        assert_eq!(render(&registry.get_component("Card").unwrap()), "A");
        assert_eq!(render(&registry.get_component("Widget").unwrap()), "B");
    }

    #[test]
    fn last_write_wins() {
        let registry = ComponentRegistry::new();
        registry.register("Card", ComponentRegistration::new(named("A")));
        let replaced = registry.register("Card", ComponentRegistration::new(named("C")));
        assert!(replaced.is_some());
        assert_eq!(render(&registry.get_component("Card").unwrap()), "C");

        registry.register_bulk([
            ("Card", ComponentRegistration::new(named("D"))),
            ("Card", ComponentRegistration::new(named("E"))),
        ]);
        assert_eq!(render(&registry.get_component("Card").unwrap()), "E");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clones_share_entries_and_clear_empties_all() {
        let registry = ComponentRegistry::new();
        let alias = registry.clone();
        alias.register("b", ComponentRegistration::new(named("b")));
        alias.register("a", ComponentRegistration::new(named("a")).requires("admin:view"));
        registry.set_fallback_component(named("fallback"));

        assert!(registry.same_as(&alias));
        assert_eq!(registry.ids(), ["a", "b"]);
        assert_eq!(registry.get_registration("a").unwrap().permissions, ["admin:view"]);

        registry.clear();
        assert!(alias.is_empty());
        assert!(alias.get_component("a").is_none());
    }
}
