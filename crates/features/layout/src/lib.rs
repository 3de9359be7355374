//! # Layout slice
//!
//! Maps component identifiers to factories and turns persisted layout documents into render
//! trees, filtered by the viewer's permissions.
//!
//! ```rust
//! use impulse_layout::{ComponentRegistry, LayoutResolver, components};
//! use impulse_layout::domain::layout::{Layout, LayoutBody, LayoutNode, LayoutScope};
//! use impulse_kernel::security::PermissionSet;
//!
//! let registry = ComponentRegistry::new();
//! components::bootstrap(&registry, LayoutScope::Admin);
//!
//! let layout = Layout {
//!     id: "dashboard".into(),
//!     body: LayoutBody {
//!         components: vec![
//!             LayoutNode::new("stats", "StatsCards"),
//!             LayoutNode::new("title", "heading").with_prop("text", "Dashboard"),
//!         ],
//!         version: 1,
//!     },
//!     ..Layout::default()
//! };
//!
//! // `StatsCards` requires `admin:view`, which the viewer lacks.
//! let tree = LayoutResolver::new(registry).resolve(&layout, &PermissionSet::new());
//! assert_eq!(tree.ids(), ["title"]);
//! assert!(tree.to_html().contains("<h1 class=\"text-2xl font-bold\">Dashboard</h1>"));
//! ```

pub mod components;
mod document;
mod error;
mod html;
mod props;
mod registry;
mod resolver;
mod seed;
mod source;
mod validation;

pub use document::{LayoutParseIssue, ParsedLayout, UNTYPED_LAYOUT, parse_layout, parse_layout_slice};
pub use error::{LayoutError, LayoutErrorExt};
pub use html::{ALLOWED_URL_SCHEMES, Element, escape, safe_url};
pub use props::{
    BadgeProps, ButtonProps, ComponentProps, ContainerProps, GridProps, HeadingProps, IconProps,
    ImageProps, InvalidProps, LinkProps, PropsKind, TextProps, merge_props,
};
pub use registry::{
    ComponentFactory, ComponentMetadata, ComponentRegistration, ComponentRegistry,
    ComponentRegistryState, FnComponent, RenderContext,
};
pub use resolver::{
    DEFAULT_MAX_DEPTH, LayoutResolver, NodeMarker, RenderNode, RenderTree, ResolveFlags,
    ResolveReport, ResolveWarning,
};
pub use seed::{CORE_LAYOUT_TYPES, SeedReport, core_layouts, seed_core_layouts};
pub use source::{BoxFuture, FileLayoutSource, LayoutSource, MemoryLayoutSource, pick_active};
pub use validation::{LayoutIssue, validate_layout};

pub use impulse_domain as domain;
