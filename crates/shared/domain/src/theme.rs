//! Theme rows as stored in the `themes` table.

use crate::constants::{ADMIN, SHARED, SITE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flat component style mapping (`"background" -> "var(--colors-primary)"`).
pub type StyleMap = BTreeMap<String, String>;

/// One design-token category; values are strings, numbers or nested categories.
pub type TokenMap = Map<String, Value>;

/// `context -> component name -> style overrides`.
pub type CompositionRules = BTreeMap<String, BTreeMap<String, StyleMap>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Rendering context a component token applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeContext {
    Site,
    Admin,
    Shared,
}

impl ThemeContext {
    pub const ALL: [Self; 3] = [Self::Site, Self::Admin, Self::Shared];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Site => SITE,
            Self::Admin => ADMIN,
            Self::Shared => SHARED,
        }
    }
}

impl fmt::Display for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`ThemeContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContext(pub String);

impl fmt::Display for UnknownContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme context '{}'", self.0)
    }
}

impl std::error::Error for UnknownContext {}

impl FromStr for ThemeContext {
    type Err = UnknownContext;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownContext(s.to_owned()))
    }
}

/// Theme-level style primitives grouped by category.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignTokens {
    #[serde(default)]
    pub colors: TokenMap,
    #[serde(default)]
    pub spacing: TokenMap,
    #[serde(default)]
    pub typography: TokenMap,
    #[serde(default)]
    pub effects: TokenMap,
    #[serde(default, alias = "animations")]
    pub animation: TokenMap,
    /// Any further top-level category (`admin`, `radius`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, TokenMap>,
}

impl DesignTokens {
    /// Names of the categories that always exist, in projection order.
    pub const CORE_CATEGORIES: [&'static str; 5] =
        ["colors", "spacing", "typography", "effects", "animation"];

    /// Every category, core ones first, then extras in key order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &TokenMap)> {
        [
            ("colors", &self.colors),
            ("spacing", &self.spacing),
            ("typography", &self.typography),
            ("effects", &self.effects),
            ("animation", &self.animation),
        ]
        .into_iter()
        .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v)))
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&TokenMap> {
        self.categories().find_map(|(k, v)| (k == name).then_some(v))
    }

    /// Mutable access to a category, creating extra categories on demand.
    pub fn category_mut(&mut self, name: &str) -> &mut TokenMap {
        match name {
            "colors" => &mut self.colors,
            "spacing" => &mut self.spacing,
            "typography" => &mut self.typography,
            "effects" => &mut self.effects,
            "animation" | "animations" => &mut self.animation,
            other => self.extra.entry(other.to_owned()).or_default(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories().all(|(_, map)| map.is_empty())
    }
}

/// A per-component style override, optionally scoped to one context.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentToken {
    pub id: String,
    pub component_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ThemeContext>,
    #[serde(default)]
    pub styles: StyleMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
}

/// A complete theme row.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ThemeStatus,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_theme_id: Option<String>,
    #[serde(default)]
    pub design_tokens: DesignTokens,
    #[serde(default)]
    pub component_tokens: Vec<ComponentToken>,
    #[serde(default)]
    pub composition_rules: CompositionRules,
    #[serde(default)]
    pub cached_styles: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

const fn first_version() -> u32 {
    1
}

impl Theme {
    /// Key used to invalidate derived CSS: the explicit `cache_key`, else `id@version`.
    #[must_use]
    pub fn effective_cache_key(&self) -> String {
        self.cache_key.clone().unwrap_or_else(|| format!("{}@{}", self.id, self.version))
    }
}
