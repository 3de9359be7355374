//! Layout documents to render trees.

use crate::components::UnregisteredComponent;
use crate::html::Element;
use crate::props::{ComponentProps, merge_props};
use crate::registry::{ComponentFactory, ComponentRegistry, RenderContext};
use bitflags::bitflags;
use fxhash::FxHashSet;
use impulse_domain::config::LayoutConfig;
use impulse_domain::layout::{Layout, LayoutNode};
use impulse_kernel::security::PermissionCheck;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 32;

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResolveFlags: u8 {
        /// Keep permission-denied nodes (marked) and always show placeholders.
        const EDIT_MODE = 1;
        /// Drop unknown components instead of rendering the fallback.
        const NO_PLACEHOLDERS = 1 << 1;
    }
}

/// Something the resolver skipped, substituted or noticed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    UnknownComponent { node_id: String, kind: String },
    PermissionDenied { node_id: String, permission: String },
    InvalidProps { node_id: String, kind: String, reason: String },
    DepthExceeded { node_id: String, depth: usize },
    DuplicateId { node_id: String },
}

impl ResolveWarning {
    #[must_use]
    pub fn node_id(&self) -> &str {
        match self {
            Self::UnknownComponent { node_id, .. }
            | Self::PermissionDenied { node_id, .. }
            | Self::InvalidProps { node_id, .. }
            | Self::DepthExceeded { node_id, .. }
            | Self::DuplicateId { node_id } => node_id,
        }
    }
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownComponent { node_id, kind } => write!(f, "{node_id}: unknown component '{kind}'"),
            Self::PermissionDenied { node_id, permission } => write!(f, "{node_id}: requires '{permission}'"),
            Self::InvalidProps { node_id, kind, reason } => write!(f, "{node_id}: invalid {kind} props ({reason})"),
            Self::DepthExceeded { node_id, depth } => write!(f, "{node_id}: nested {depth} levels deep"),
            Self::DuplicateId { node_id } => write!(f, "{node_id}: id used more than once"),
        }
    }
}

/// Summary of one resolution.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    pub warnings: Vec<ResolveWarning>,
    pub resolved: usize,
    pub placeholders: usize,
    pub skipped: usize,
}

impl ResolveReport {
    fn warn(&mut self, warning: ResolveWarning) {
        match &warning {
            ResolveWarning::PermissionDenied { .. } => debug!(%warning, "Layout node filtered"),
            _ => warn!(%warning, "Layout node degraded"),
        }
        self.warnings.push(warning);
    }
}

/// How a resolved node deviates from what the layout asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeMarker {
    /// Edit mode only: the viewer lacks `missing`, the node is shown for arrangement.
    PermissionDenied { missing: String },
    Placeholder,
}

/// One node of a render tree.
#[derive(Debug, Clone)]
pub struct RenderNode {
    pub id: String,
    pub kind: String,
    pub props: ComponentProps,
    pub factory: Arc<dyn ComponentFactory>,
    pub children: Vec<RenderNode>,
    pub marker: Option<NodeMarker>,
}

impl RenderNode {
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    fn to_html(&self, edit_mode: bool) -> String {
        let children: String = self.children.iter().map(|child| child.to_html(edit_mode)).collect();
        let inner = self.factory.render(&RenderContext {
            node_id: &self.id,
            kind: &self.kind,
            props: &self.props,
            children: &children,
        });

        let mut wrapper = Element::new("div")
            .class("layout-node")
            .attr("data-component-id", &self.id)
            .attr("data-component-type", &self.kind);
        if edit_mode {
            wrapper = wrapper
                .class("layout-node--edit")
                .html(&Element::new("span").class("layout-node__type").text(&self.kind).finish());
            if let Some(NodeMarker::PermissionDenied { missing }) = &self.marker {
                wrapper = wrapper.html(
                    &Element::new("span")
                        .class("layout-node__denied")
                        .attr("title", missing)
                        .text("Missing permissions")
                        .finish(),
                );
            }
        }
        wrapper.html(&inner).finish()
    }
}

/// A resolved layout.
#[derive(Debug, Clone)]
pub struct RenderTree {
    pub layout_id: String,
    pub nodes: Vec<RenderNode>,
    pub report: ResolveReport,
    pub flags: ResolveFlags,
}

impl RenderTree {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(RenderNode::node_count).sum()
    }

    /// Depth-first ids of every resolved node.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        fn walk<'a>(nodes: &'a [RenderNode], out: &mut Vec<&'a str>) {
            for node in nodes {
                out.push(&node.id);
                walk(&node.children, out);
            }
        }
        let mut out = Vec::with_capacity(self.node_count());
        walk(&self.nodes, &mut out);
        out
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        fn walk<'a>(nodes: &'a [RenderNode], id: &str) -> Option<&'a RenderNode> {
            nodes.iter().find_map(|n| if n.id == id { Some(n) } else { walk(&n.children, id) })
        }
        walk(&self.nodes, id)
    }

    /// `<div class="layout-root" data-layout-id="...">` with every node rendered inside.
    #[must_use]
    pub fn to_html(&self) -> String {
        let edit_mode = self.flags.contains(ResolveFlags::EDIT_MODE);
        let body: String = self.nodes.iter().map(|node| node.to_html(edit_mode)).collect();
        Element::new("div").class("layout-root").attr("data-layout-id", &self.layout_id).html(&body).finish()
    }
}

/// Resolves layouts against a registry.
#[derive(Debug, Clone)]
pub struct LayoutResolver {
    registry: ComponentRegistry,
    flags: ResolveFlags,
    max_depth: usize,
}

impl LayoutResolver {
    #[must_use]
    pub fn new(registry: ComponentRegistry) -> Self {
        Self { registry, flags: ResolveFlags::empty(), max_depth: DEFAULT_MAX_DEPTH }
    }

    #[must_use]
    pub fn from_config(registry: ComponentRegistry, cfg: &LayoutConfig) -> Self {
        let flags = if cfg.placeholders { ResolveFlags::empty() } else { ResolveFlags::NO_PLACEHOLDERS };
        Self::new(registry).with_flags(flags).with_max_depth(cfg.max_depth)
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: ResolveFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Nodes nested deeper than `max_depth` (roots are depth 1) are dropped with their subtree.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn flags(&self) -> ResolveFlags {
        self.flags
    }

    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Resolves every root of `layout`.
    ///
    /// Never fails: problems degrade single nodes and are listed in the tree's report.
    #[instrument(skip_all, fields(layout = %layout.id, flags = ?self.flags))]
    pub fn resolve<P>(&self, layout: &Layout, permissions: &P) -> RenderTree
    where
        P: PermissionCheck + ?Sized,
    {
        let (nodes, report) = self.resolve_nodes(layout.components(), permissions);
        debug!(
            resolved = report.resolved,
            placeholders = report.placeholders,
            skipped = report.skipped,
            warnings = report.warnings.len(),
            "Layout resolved"
        );
        RenderTree { layout_id: layout.id.clone(), nodes, report, flags: self.flags }
    }

    /// Resolves a forest of nodes that is not wrapped in a [`Layout`].
    pub fn resolve_nodes<P>(&self, roots: &[LayoutNode], permissions: &P) -> (Vec<RenderNode>, ResolveReport)
    where
        P: PermissionCheck + ?Sized,
    {
        let mut pass = Pass {
            resolver: self,
            permissions,
            seen: FxHashSet::default(),
            report: ResolveReport::default(),
            fallback: self.placeholder_factory(),
        };
        let nodes = pass.forest(roots, 1);
        (nodes, pass.report)
    }

    fn placeholder_factory(&self) -> Option<Arc<dyn ComponentFactory>> {
        if self.flags.contains(ResolveFlags::EDIT_MODE) {
            return Some(self.registry.fallback().unwrap_or_else(|| Arc::new(UnregisteredComponent)));
        }
        if self.flags.contains(ResolveFlags::NO_PLACEHOLDERS) {
            return None;
        }
        self.registry.fallback()
    }
}

struct Pass<'r, P: ?Sized> {
    resolver: &'r LayoutResolver,
    permissions: &'r P,
    seen: FxHashSet<String>,
    report: ResolveReport,
    fallback: Option<Arc<dyn ComponentFactory>>,
}

impl<P> Pass<'_, P>
where
    P: PermissionCheck + ?Sized,
{
    fn forest(&mut self, nodes: &[LayoutNode], depth: usize) -> Vec<RenderNode> {
        nodes.iter().filter_map(|node| self.node(node, depth)).collect()
    }

    fn node(&mut self, node: &LayoutNode, depth: usize) -> Option<RenderNode> {
        if depth > self.resolver.max_depth {
            self.report.warn(ResolveWarning::DepthExceeded { node_id: node.id.clone(), depth });
            self.report.skipped += node.node_count();
            return None;
        }
        if !self.seen.insert(node.id.clone()) {
            self.report.warn(ResolveWarning::DuplicateId { node_id: node.id.clone() });
        }

        let registration = self.resolver.registry.get_registration(&node.kind);
        let edit_mode = self.resolver.flags.contains(ResolveFlags::EDIT_MODE);

        let required = node.permissions.iter().chain(registration.iter().flat_map(|r| r.permissions.iter()));
        let mut marker = None;
        if let Some(missing) = required.into_iter().find(|p| !self.permissions.allows(p)) {
            self.report.warn(ResolveWarning::PermissionDenied {
                node_id: node.id.clone(),
                permission: missing.clone(),
            });
            if !edit_mode {
                self.report.skipped += node.node_count();
                return None;
            }
            marker = Some(NodeMarker::PermissionDenied { missing: missing.clone() });
        }

        let (factory, props) = match registration {
            Some(registration) => {
                let merged = merge_props(&registration.default_props, &node.props);
                let props = match ComponentProps::decode(registration.props, merged.clone()) {
                    Ok(props) => props,
                    Err(err) => {
                        self.report.warn(ResolveWarning::InvalidProps {
                            node_id: node.id.clone(),
                            kind: node.kind.clone(),
                            reason: err.0,
                        });
                        ComponentProps::Opaque(merged)
                    },
                };
                (registration.factory, props)
            },
            None => {
                self.report.warn(ResolveWarning::UnknownComponent {
                    node_id: node.id.clone(),
                    kind: node.kind.clone(),
                });
                let Some(fallback) = self.fallback.clone() else {
                    self.report.skipped += node.node_count();
                    return None;
                };
                self.report.placeholders += 1;
                marker = marker.or(Some(NodeMarker::Placeholder));
                let props = ComponentProps::Placeholder { requested: node.kind.clone(), props: node.props.clone() };
                (fallback, props)
            },
        };

        let children = self.forest(&node.children, depth + 1);
        self.report.resolved += 1;
        Some(RenderNode { id: node.id.clone(), kind: node.kind.clone(), props, factory, children, marker })
    }
}
