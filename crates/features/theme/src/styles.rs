//! Component style lookups over a single theme.

use crate::tokens::is_css_value;
use impulse_domain::theme::{ComponentToken, StyleMap, Theme, ThemeContext};
use tracing::warn;

/// Most specific component token: `name` + `context` first, then `name` without a context.
///
/// Among several tokens with the same name and context, the first one wins.
#[must_use]
pub fn find_component_token<'t>(
    theme: &'t Theme,
    name: &str,
    context: Option<ThemeContext>,
) -> Option<&'t ComponentToken> {
    let named = || theme.component_tokens.iter().filter(move |t| t.component_name == name);
    context
        .and_then(|ctx| named().find(|t| t.context == Some(ctx)))
        .or_else(|| named().find(|t| t.context.is_none()))
}

/// Styles of the most specific token; empty when the component has no token.
#[must_use]
pub fn component_styles(theme: &Theme, name: &str, context: Option<ThemeContext>) -> StyleMap {
    find_component_token(theme, name, context).map(|t| t.styles.clone()).unwrap_or_default()
}

/// Component styles with the theme's composition rule for `context` merged on top.
#[must_use]
pub fn composed_styles(theme: &Theme, name: &str, context: Option<ThemeContext>) -> StyleMap {
    let mut styles = component_styles(theme, name, context);
    if let Some(rule) = context
        .and_then(|ctx| theme.composition_rules.get(ctx.as_str()))
        .and_then(|components| components.get(name))
    {
        styles.extend(rule.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    styles
}

/// Key of a precomputed CSS string in `cached_styles`: `button-admin`, or `button` without context.
#[must_use]
pub fn cached_css_key(name: &str, context: Option<ThemeContext>) -> String {
    context.map_or_else(|| name.to_owned(), |ctx| format!("{name}-{ctx}"))
}

/// Precomputed CSS for a component, if the theme ships one.
#[must_use]
pub fn cached_css<'t>(theme: &'t Theme, name: &str, context: Option<ThemeContext>) -> Option<&'t str> {
    theme.cached_styles.get(&cached_css_key(name, context)).map(String::as_str)
}

/// Stable class name for a themed component: `theme-<id>-<name>[-<context>]`.
///
/// The shared context is implied and never part of the class.
#[must_use]
pub fn theme_class(theme_id: &str, name: &str, context: Option<ThemeContext>) -> String {
    match context {
        Some(ctx) if ctx != ThemeContext::Shared => format!("theme-{theme_id}-{name}-{ctx}"),
        _ => format!("theme-{theme_id}-{name}"),
    }
}

/// Renders a style map as an inline declaration list: `color: red; padding: 4px`.
///
/// Entries whose property is not an identifier or whose value fails [`is_css_value`] are skipped.
#[must_use]
pub fn to_declarations(styles: &StyleMap) -> String {
    styles
        .iter()
        .filter(|(k, v)| {
            let usable = !k.is_empty()
                && k.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && is_css_value(v);
            if !usable {
                warn!(property = %k, "Skipping unusable style declaration");
            }
            usable
        })
        .map(|(k, v)| format!("{k}: {}", v.trim()))
        .collect::<Vec<_>>()
        .join("; ")
}
