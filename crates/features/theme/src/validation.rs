//! Structural checks run before a theme is published or imported.

use fxhash::FxHashSet;
use impulse_domain::theme::{Theme, ThemeContext};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeIssue {
    EmptyName,
    NoDesignTokens,
    EmptyComponentName { index: usize },
    DuplicateComponentToken { component: String, context: Option<ThemeContext> },
    UnknownRuleContext { context: String },
    SelfParent,
}

impl fmt::Display for ThemeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => f.write_str("theme name is empty"),
            Self::NoDesignTokens => f.write_str("theme defines no design tokens"),
            Self::EmptyComponentName { index } => write!(f, "component token #{index} has an empty name"),
            Self::DuplicateComponentToken { component, context: Some(ctx) } => {
                write!(f, "component '{component}' has several '{ctx}' tokens; the first one is used")
            },
            Self::DuplicateComponentToken { component, context: None } => {
                write!(f, "component '{component}' has several context-free tokens; the first one is used")
            },
            Self::UnknownRuleContext { context } => {
                write!(f, "composition rules target unknown context '{context}'")
            },
            Self::SelfParent => f.write_str("theme names itself as parent"),
        }
    }
}

/// Every structural issue of `theme`; empty means valid.
#[must_use]
pub fn validate_theme(theme: &Theme) -> Vec<ThemeIssue> {
    let mut issues = Vec::new();

    if theme.name.trim().is_empty() {
        issues.push(ThemeIssue::EmptyName);
    }
    if theme.design_tokens.is_empty() {
        issues.push(ThemeIssue::NoDesignTokens);
    }
    if theme.parent_theme_id.as_deref() == Some(theme.id.as_str()) {
        issues.push(ThemeIssue::SelfParent);
    }

    let mut seen = FxHashSet::default();
    for (index, token) in theme.component_tokens.iter().enumerate() {
        if token.component_name.trim().is_empty() {
            issues.push(ThemeIssue::EmptyComponentName { index });
        } else if !seen.insert((token.component_name.as_str(), token.context)) {
            issues.push(ThemeIssue::DuplicateComponentToken {
                component: token.component_name.clone(),
                context: token.context,
            });
        }
    }

    for context in theme.composition_rules.keys() {
        if context.parse::<ThemeContext>().is_err() {
            issues.push(ThemeIssue::UnknownRuleContext { context: context.clone() });
        }
    }

    issues
}

/// Ids of all themes flagged as default, when there is more than one.
#[must_use]
pub fn default_conflicts(themes: &[Theme]) -> Vec<&str> {
    let mut defaults: Vec<_> = themes.iter().filter(|t| t.is_default).map(|t| t.id.as_str()).collect();
    if defaults.len() < 2 {
        return Vec::new();
    }
    defaults.sort_unstable();
    defaults
}

/// The default theme among `themes`.
///
/// At most one theme should be the default. When several are, the conflict is logged and
/// the one with the smallest id wins so the choice is stable across calls.
#[must_use]
pub fn pick_default(themes: &[Theme]) -> Option<&Theme> {
    let conflicts = default_conflicts(themes);
    if !conflicts.is_empty() {
        warn!(themes = ?conflicts, "Several themes are flagged as default");
    }
    themes.iter().filter(|t| t.is_default).min_by(|a, b| a.id.cmp(&b.id))
}
