//! Layout rows as stored in the `layouts` table.

use crate::constants::{ADMIN, FEATURE, SITE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Untyped props bag exactly as persisted.
pub type RawProps = Map<String, Value>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutScope {
    #[default]
    Site,
    Admin,
    Feature,
}

impl LayoutScope {
    pub const ALL: [Self; 3] = [Self::Site, Self::Admin, Self::Feature];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Site => SITE,
            Self::Admin => ADMIN,
            Self::Feature => FEATURE,
        }
    }
}

impl fmt::Display for LayoutScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown layout scope '{s}'"))
    }
}

/// One component reference inside a layout tree.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: RawProps,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutNode>,
    /// Every listed permission must be granted for the node to render.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self { id: id.into(), kind: kind.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn requires(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

/// The `layout_json` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBody {
    #[serde(default)]
    pub components: Vec<LayoutNode>,
    #[serde(default = "first_version")]
    pub version: u32,
}

impl Default for LayoutBody {
    fn default() -> Self {
        Self { components: Vec::new(), version: first_version() }
    }
}

/// A complete layout row.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub layout_type: String,
    #[serde(default)]
    pub scope: LayoutScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "layout_json", default)]
    pub body: LayoutBody,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn first_version() -> u32 {
    1
}

impl Layout {
    #[must_use]
    pub fn components(&self) -> &[LayoutNode] {
        &self.body.components
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.body.components.iter().map(LayoutNode::node_count).sum()
    }
}
