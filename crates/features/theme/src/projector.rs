//! Projection of design tokens onto CSS custom properties.

use crate::color::rgb_channels;
use crate::fallback::emergency_tokens;
use crate::tokens::flatten;
use impulse_domain::theme::{DesignTokens, Theme};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use tracing::{debug, instrument};

/// Attribute carrying the projected theme id on the root element.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Something CSS custom properties can be written to, typically the document root.
pub trait StyleTarget {
    fn property(&self, name: &str) -> Option<&str>;
    fn set_property(&mut self, name: &str, value: &str);
    fn remove_property(&mut self, name: &str);
    fn set_attribute(&mut self, _name: &str, _value: &str) {}
}

/// Derived `--name -> value` set, ordered by name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CssVariables(BTreeMap<String, String>);

impl CssVariables {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// A stylesheet rule: `selector { --a: b; ... }`, one declaration per line.
    #[must_use]
    pub fn to_css_block(&self, selector: &str) -> String {
        let mut css = format!("{selector} {{\n");
        for (name, value) in self.iter() {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }
}

/// Projection switches.
#[derive(Debug, Clone, Copy)]
pub struct ProjectorOptions {
    /// Add `--<name>-rgb: r, g, b` for every hex color token.
    pub rgb_channels: bool,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self { rgb_channels: true }
    }
}

/// What a projection changed on its target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionReport {
    pub written: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl ProjectionReport {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.written == 0 && self.removed == 0
    }
}

/// Derives CSS variables from themes and applies them to a [`StyleTarget`].
///
/// The emergency palette is always merged underneath, so every well-known variable is set
/// even when the theme is sparse or malformed. The projector remembers which variables it
/// owns: a later projection removes the ones the new theme no longer defines and leaves
/// foreign properties alone.
#[derive(Debug)]
pub struct CssProjector {
    options: ProjectorOptions,
    base: DesignTokens,
    owned: BTreeSet<String>,
}

impl Default for CssProjector {
    fn default() -> Self {
        Self::new(ProjectorOptions::default())
    }
}

impl CssProjector {
    #[must_use]
    pub fn new(options: ProjectorOptions) -> Self {
        Self { options, base: emergency_tokens(), owned: BTreeSet::new() }
    }

    /// The variables `theme` projects to, without touching any target.
    #[must_use]
    pub fn derive(&self, theme: &Theme) -> CssVariables {
        // Flattened separately so a malformed theme leaf never shadows a fallback value.
        let mut leaves = BTreeMap::new();
        for token in flatten(&self.base).into_iter().chain(flatten(&theme.design_tokens)) {
            leaves.insert(token.path, (token.category, token.value));
        }

        let mut vars = BTreeMap::new();
        for (path, (category, value)) in leaves {
            if self.options.rgb_channels && category == "colors" {
                if let Some(rgb) = rgb_channels(&value) {
                    vars.insert(format!("--{path}-rgb"), rgb);
                }
            }
            vars.insert(format!("--{path}"), value);
        }
        CssVariables(vars)
    }

    /// Writes the variables of `theme` onto `target`.
    ///
    /// Idempotent: properties already holding the derived value are not rewritten.
    #[instrument(skip_all, fields(theme = %theme.id))]
    pub fn project<T>(&mut self, theme: &Theme, target: &mut T) -> ProjectionReport
    where
        T: StyleTarget + ?Sized,
    {
        let vars = self.derive(theme);
        let mut report = ProjectionReport::default();

        for stale in self.owned.iter().filter(|name| vars.get(name).is_none()) {
            target.remove_property(stale);
            report.removed += 1;
        }

        for (name, value) in vars.iter() {
            if target.property(name) == Some(value) {
                report.unchanged += 1;
            } else {
                target.set_property(name, value);
                report.written += 1;
            }
        }

        target.set_attribute(THEME_ATTRIBUTE, &theme.id);
        self.owned = vars.0.into_keys().collect();

        debug!(written = report.written, removed = report.removed, unchanged = report.unchanged, "Projected theme");
        report
    }
}

/// In-memory [`StyleTarget`], used for server-side rendering and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InlineStyle {
    properties: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
}

impl InlineStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// `style="..."` attribute value.
    #[must_use]
    pub fn to_style_attribute(&self) -> String {
        self.properties.iter().map(|(k, v)| format!("{k}: {v}")).collect::<Vec<_>>().join("; ")
    }
}

impl StyleTarget for InlineStyle {
    fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_owned(), value.to_owned());
    }

    fn remove_property(&mut self, name: &str) {
        self.properties.remove(name);
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_owned(), value.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn theme(id: &str, tokens: serde_json::Value) -> Theme {
        Theme { id: id.to_owned(), design_tokens: serde_json::from_value(tokens).unwrap(), ..Theme::default() }
    }

    #[test]
    fn theme_tokens_override_fallback() {
        let vars = CssProjector::default().derive(&theme("t", json!({ "colors": { "primary": "#FF0000" } })));
        assert_eq!(vars.get("--colors-primary"), Some("#FF0000"));
        assert_eq!(vars.get("--colors-primary-rgb"), Some("255, 0, 0"));
        assert_eq!(vars.get("--colors-background-main"), Some("#12121A"));
        assert_eq!(vars.get("--typography-weights-bold"), Some("700"));
    }

    #[test]
    fn empty_theme_projects_the_full_fallback() {
        let projector = CssProjector::default();
        let empty = projector.derive(&Theme::default());
        assert!(empty.get("--colors-primary").is_some());
        assert_eq!(empty, projector.derive(&crate::fallback::emergency_theme()));
    }

    #[test]
    fn malformed_value_keeps_fallback() {
        let vars = CssProjector::default().derive(&theme("t", json!({ "colors": { "secondary": "" } })));
        assert_eq!(vars.get("--colors-secondary"), Some("#FF2D6E"));
    }

    #[test]
    fn injected_value_keeps_fallback_and_css_stays_closed() {
        let injected = "red;}</style><script>alert(1)</script><style>:root{";
        let vars = CssProjector::default().derive(&theme("t", json!({ "colors": { "primary": injected } })));
        assert_eq!(vars.get("--colors-primary"), Some("#00F0FF"));

        let css = vars.to_css_block(":root");
        assert!(!css.contains("<script>"), "{css}");
        assert_eq!(css.matches('{').count(), 1);
        assert_eq!(css.matches('}').count(), 1);
    }

    #[test]
    fn rgb_companions_can_be_disabled() {
        let projector = CssProjector::new(ProjectorOptions { rgb_channels: false });
        let vars = projector.derive(&Theme::default());
        assert!(vars.iter().all(|(name, _)| !name.ends_with("-rgb")));
    }

    #[test]
    fn projection_is_idempotent() {
        let mut projector = CssProjector::default();
        let mut root = InlineStyle::new();
        let neon = theme("neon", json!({ "colors": { "primary": "#00F0FF" } }));

        let first = projector.project(&neon, &mut root);
        assert!(first.written > 0);
        let snapshot = root.clone();

        let second = projector.project(&neon, &mut root);
        assert!(second.is_noop());
        assert_eq!(second.unchanged, first.written);
        assert_eq!(root, snapshot);
        assert_eq!(root.attribute(THEME_ATTRIBUTE), Some("neon"));
    }

    #[test]
    fn stale_variables_are_removed_and_foreign_ones_kept() {
        let mut projector = CssProjector::default();
        let mut root = InlineStyle::new();
        root.set_property("--app-gutter", "12px");

        projector.project(&theme("a", json!({ "brand": { "logo": "url(a.svg)" } })), &mut root);
        assert_eq!(root.property("--brand-logo"), Some("url(a.svg)"));

        let report = projector.project(&theme("b", json!({ "colors": { "primary": "#000" } })), &mut root);
        assert_eq!(report.removed, 1);
        assert_eq!(root.property("--brand-logo"), None);
        assert_eq!(root.property("--app-gutter"), Some("12px"));
        assert_eq!(root.property("--colors-primary"), Some("#000"));
    }

    #[test]
    fn css_block_lists_every_variable() {
        let vars = CssProjector::default().derive(&Theme::default());
        let css = vars.to_css_block(":root");
        assert!(css.starts_with(":root {\n"));
        assert!(css.contains("  --colors-primary: #00F0FF;\n"));
        assert_eq!(css.lines().count(), vars.len() + 2);
    }
}
