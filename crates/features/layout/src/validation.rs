//! Structural checks for layouts, run before saving or importing.

use crate::registry::ComponentRegistry;
use fxhash::FxHashSet;
use impulse_domain::layout::{Layout, LayoutNode};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutIssue {
    EmptyName,
    NoComponents,
    EmptyNodeId { path: String },
    EmptyType { node_id: String },
    DuplicateNodeId { node_id: String },
    UnknownComponent { node_id: String, kind: String },
    TooDeep { node_id: String, depth: usize, max: usize },
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => f.write_str("layout name is empty"),
            Self::NoComponents => f.write_str("layout has no components"),
            Self::EmptyNodeId { path } => write!(f, "node at {path} has an empty id"),
            Self::EmptyType { node_id } => write!(f, "node '{node_id}' has an empty type"),
            Self::DuplicateNodeId { node_id } => write!(f, "node id '{node_id}' is used more than once"),
            Self::UnknownComponent { node_id, kind } => {
                write!(f, "node '{node_id}' uses unregistered component '{kind}'")
            },
            Self::TooDeep { node_id, depth, max } => {
                write!(f, "node '{node_id}' is nested {depth} levels deep (max {max})")
            },
        }
    }
}

/// Every structural issue of `layout`. Component types are checked only when a registry is given.
#[must_use]
pub fn validate_layout(
    layout: &Layout,
    registry: Option<&ComponentRegistry>,
    max_depth: usize,
) -> Vec<LayoutIssue> {
    let mut check = Check { registry, max_depth, seen: FxHashSet::default(), issues: Vec::new() };
    if layout.name.trim().is_empty() {
        check.issues.push(LayoutIssue::EmptyName);
    }
    if layout.components().is_empty() {
        check.issues.push(LayoutIssue::NoComponents);
    }
    for (index, node) in layout.components().iter().enumerate() {
        check.node(node, &index.to_string(), 1);
    }
    check.issues
}

struct Check<'a> {
    registry: Option<&'a ComponentRegistry>,
    max_depth: usize,
    seen: FxHashSet<&'a str>,
    issues: Vec<LayoutIssue>,
}

impl<'a> Check<'a> {
    fn node(&mut self, node: &'a LayoutNode, path: &str, depth: usize) {
        if node.id.trim().is_empty() {
            self.issues.push(LayoutIssue::EmptyNodeId { path: path.to_owned() });
        } else if !self.seen.insert(node.id.as_str()) {
            self.issues.push(LayoutIssue::DuplicateNodeId { node_id: node.id.clone() });
        }

        if node.kind.trim().is_empty() {
            self.issues.push(LayoutIssue::EmptyType { node_id: node.id.clone() });
        } else if self.registry.is_some_and(|r| !r.contains(&node.kind)) {
            self.issues.push(LayoutIssue::UnknownComponent { node_id: node.id.clone(), kind: node.kind.clone() });
        }

        if depth > self.max_depth {
            self.issues.push(LayoutIssue::TooDeep { node_id: node.id.clone(), depth, max: self.max_depth });
            return;
        }
        for (index, child) in node.children.iter().enumerate() {
            self.node(child, &format!("{path}.{index}"), depth + 1);
        }
    }
}
