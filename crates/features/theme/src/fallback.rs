//! Emergency palette that is always projected underneath the active theme.

use impulse_domain::constants::FALLBACK_THEME_ID;
use impulse_domain::theme::{ComponentToken, DesignTokens, Theme, ThemeStatus, TokenMap};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Tokens guaranteed to render: every CSS variable a component may reference has a value here.
#[must_use]
pub fn emergency_tokens() -> DesignTokens {
    DesignTokens {
        colors: object(json!({
            "primary": "#00F0FF",
            "secondary": "#FF2D6E",
            "accent": "#8B5CF6",
            "background": {
                "main": "#12121A",
                "card": "rgba(28, 32, 42, 0.7)",
                "overlay": "rgba(0, 0, 0, 0.7)",
                "alt": "#1A1E24"
            },
            "text": {
                "primary": "#F6F6F7",
                "secondary": "rgba(255, 255, 255, 0.7)",
                "accent": "#00F0FF",
                "muted": "rgba(255, 255, 255, 0.5)"
            },
            "borders": {
                "normal": "rgba(0, 240, 255, 0.2)",
                "hover": "rgba(0, 240, 255, 0.3)",
                "active": "rgba(0, 240, 255, 0.4)",
                "focus": "rgba(0, 240, 255, 0.5)"
            },
            "status": {
                "success": "#10B981",
                "warning": "#F59E0B",
                "error": "#EF4444",
                "info": "#3B82F6"
            }
        })),
        spacing: object(json!({
            "xs": "0.25rem",
            "sm": "0.5rem",
            "md": "1rem",
            "lg": "1.5rem",
            "xl": "2rem"
        })),
        typography: object(json!({
            "fonts": {
                "body": "system-ui, sans-serif",
                "heading": "system-ui, sans-serif",
                "monospace": "Consolas, monospace"
            },
            "sizes": {
                "xs": "0.75rem",
                "sm": "0.875rem",
                "base": "1rem",
                "lg": "1.125rem",
                "xl": "1.25rem",
                "2xl": "1.5rem",
                "3xl": "1.875rem"
            },
            "weights": { "light": 300, "normal": 400, "medium": 500, "bold": 700 },
            "lineHeights": { "tight": "1.25", "normal": "1.5", "loose": "1.75" }
        })),
        effects: object(json!({
            "glow": {
                "primary": "0 0 15px rgba(0, 240, 255, 0.7)",
                "secondary": "0 0 15px rgba(255, 45, 110, 0.7)",
                "hover": "0 0 20px rgba(0, 240, 255, 0.9)"
            },
            "gradients": {
                "primary": "linear-gradient(90deg, #00F0FF, #00B8D4)",
                "secondary": "linear-gradient(90deg, #FF2D6E, #FF5252)",
                "accent": "linear-gradient(90deg, #8B5CF6, #7C3AED)"
            },
            "shadows": {
                "small": "0 1px 3px rgba(0, 0, 0, 0.12), 0 1px 2px rgba(0, 0, 0, 0.24)",
                "medium": "0 4px 6px rgba(0, 0, 0, 0.15), 0 1px 3px rgba(0, 0, 0, 0.3)",
                "large": "0 10px 25px rgba(0, 0, 0, 0.2), 0 6px 10px rgba(0, 0, 0, 0.22)",
                "inner": "inset 0 2px 4px 0 rgba(0, 0, 0, 0.15)"
            }
        })),
        animation: object(json!({
            "duration": { "fast": "150ms", "normal": "300ms", "slow": "500ms" },
            "curves": {
                "bounce": "cubic-bezier(0.175, 0.885, 0.32, 1.275)",
                "ease": "cubic-bezier(0.4, 0, 0.2, 1)",
                "spring": "cubic-bezier(0.43, 0.13, 0.23, 0.96)",
                "linear": "linear"
            }
        })),
        extra: BTreeMap::from([(
            "radius".to_owned(),
            object(json!({ "sm": "0.25rem", "md": "0.5rem", "lg": "0.75rem", "full": "9999px" })),
        )]),
    }
}

/// The theme held by a store before anything loads, or when nothing could be loaded.
#[must_use]
pub fn emergency_theme() -> Theme {
    Theme {
        id: FALLBACK_THEME_ID.to_owned(),
        name: "Emergency Fallback".to_owned(),
        description: Some("Built-in palette used when no theme could be loaded".to_owned()),
        status: ThemeStatus::Published,
        design_tokens: emergency_tokens(),
        component_tokens: emergency_components(),
        ..Theme::default()
    }
}

fn emergency_components() -> Vec<ComponentToken> {
    let token = |name: &str, styles: &[(&str, &str)]| ComponentToken {
        id: format!("{FALLBACK_THEME_ID}-{name}"),
        component_name: name.to_owned(),
        styles: styles.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
        theme_id: Some(FALLBACK_THEME_ID.to_owned()),
        ..ComponentToken::default()
    };
    vec![
        token("panel", &[
            ("border-radius", "0.75rem"),
            ("padding", "1.5rem"),
            ("background", "var(--colors-background-card)"),
        ]),
        token("button", &[("border-radius", "0.5rem"), ("padding", "0.5rem 1rem"), ("transition", "all 0.2s ease")]),
        token("tooltip", &[("border-radius", "0.25rem"), ("padding", "0.5rem"), ("background", "rgba(0, 0, 0, 0.8)")]),
        token("input", &[
            ("border-radius", "0.375rem"),
            ("padding", "0.5rem 0.75rem"),
            ("background", "rgba(0, 0, 0, 0.15)"),
        ]),
    ]
}

pub(crate) fn object(value: Value) -> TokenMap {
    match value {
        Value::Object(map) => map,
        _ => TokenMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_theme_is_complete() {
        let theme = emergency_theme();
        assert_eq!(theme.id, FALLBACK_THEME_ID);
        for category in DesignTokens::CORE_CATEGORIES {
            assert!(theme.design_tokens.category(category).is_some_and(|m| !m.is_empty()), "{category}");
        }
        assert!(theme.component_tokens.iter().any(|t| t.component_name == "button"));
    }
}
