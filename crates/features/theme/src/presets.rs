//! Built-in themes, each an overlay on the emergency palette.

use crate::fallback::{emergency_theme, object};
use crate::tokens::merge_tokens;
use impulse_domain::theme::{DesignTokens, Theme, ThemeStatus};
use serde_json::json;

/// Id of the preset flagged as the default theme.
pub const DEFAULT_PRESET: &str = "impulsivity";

/// Every built-in theme; exactly one of them is the default.
#[must_use]
pub fn presets() -> Vec<Theme> {
    vec![
        preset(DEFAULT_PRESET, "Impulsivity", "Default cyberpunk theme with neon blues", DesignTokens::default()),
        preset(
            "midnight",
            "Midnight",
            "Dark blue with subtle accents",
            colors(json!({
                "primary": "#3B82F6",
                "secondary": "#A855F7",
                "background": {
                    "main": "#0F172A",
                    "card": "rgba(30, 41, 59, 0.7)",
                    "overlay": "rgba(30, 41, 59, 0.85)"
                }
            })),
        ),
        preset(
            "synthwave",
            "Synthwave",
            "80s inspired purple and pink",
            colors(json!({
                "primary": "#D946EF",
                "secondary": "#8B5CF6",
                "background": {
                    "main": "#18122B",
                    "card": "rgba(45, 30, 75, 0.7)",
                    "overlay": "rgba(45, 30, 75, 0.85)"
                }
            })),
        ),
        preset(
            "terminal",
            "Terminal",
            "Hacker-inspired green on black",
            colors(json!({
                "primary": "#4ADE80",
                "secondary": "#F97316",
                "background": {
                    "main": "#0C0C0C",
                    "card": "rgba(20, 20, 20, 0.7)",
                    "overlay": "rgba(20, 20, 20, 0.85)"
                },
                "text": { "accent": "#4ADE80" }
            })),
        ),
        preset("neon-noir", "Neon Noir", "Dark with red accents", neon_noir()),
    ]
}

/// A single built-in theme by id.
#[must_use]
pub fn find_preset(id: &str) -> Option<Theme> {
    presets().into_iter().find(|theme| theme.id == id)
}

fn preset(id: &str, name: &str, description: &str, overlay: DesignTokens) -> Theme {
    let mut theme = emergency_theme();
    merge_tokens(&mut theme.design_tokens, &overlay);
    for token in &mut theme.component_tokens {
        token.id = format!("{id}-{}", token.component_name);
        token.theme_id = Some(id.to_owned());
    }
    Theme {
        id: id.to_owned(),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        status: ThemeStatus::Published,
        is_default: id == DEFAULT_PRESET,
        ..theme
    }
}

fn colors(value: serde_json::Value) -> DesignTokens {
    DesignTokens { colors: object(value), ..DesignTokens::default() }
}

fn neon_noir() -> DesignTokens {
    DesignTokens {
        effects: object(json!({
            "glow": {
                "primary": "0 0 15px rgba(239, 68, 68, 0.7)",
                "secondary": "0 0 15px rgba(59, 130, 246, 0.7)",
                "hover": "0 0 20px rgba(239, 68, 68, 0.9)"
            }
        })),
        ..colors(json!({
            "primary": "#EF4444",
            "secondary": "#3B82F6",
            "background": { "main": "#09090B", "card": "rgba(24, 24, 27, 0.7)", "overlay": "rgba(24, 24, 27, 0.85)" },
            "text": { "accent": "#EF4444" },
            "borders": {
                "normal": "rgba(239, 68, 68, 0.2)",
                "hover": "rgba(239, 68, 68, 0.4)",
                "active": "rgba(239, 68, 68, 0.6)"
            }
        }))
    }
}
