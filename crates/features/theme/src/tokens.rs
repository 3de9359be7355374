//! Token tree helpers: deep merge and flattening into CSS custom property names.

use impulse_domain::theme::{DesignTokens, TokenMap};
use serde_json::Value;
use tracing::warn;

/// One leaf of the token tree, keyed by its dash-joined path (`colors-background-main`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatToken {
    pub path: String,
    pub category: String,
    pub value: String,
}

/// Deep-merges `overlay` into `base`; objects merge per key, any other value replaces.
pub fn merge_tokens(base: &mut DesignTokens, overlay: &DesignTokens) {
    for (category, map) in overlay.categories() {
        merge_map(base.category_mut(category), map);
    }
}

/// Deep-merges two token maps in place.
pub fn merge_map(base: &mut TokenMap, overlay: &TokenMap) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => merge_map(existing, incoming),
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Flattens every category into leaves, core categories first.
///
/// Strings are kept verbatim, numbers are stringified, nested objects extend the path. Empty
/// strings, strings rejected by [`is_css_value`], `null`, booleans and arrays are treated as absent.
#[must_use]
pub fn flatten(tokens: &DesignTokens) -> Vec<FlatToken> {
    let mut out = Vec::new();
    for (category, map) in tokens.categories() {
        let prefix = sanitize_segment(category);
        if prefix.is_empty() {
            continue;
        }
        flatten_into(category, &prefix, map, &mut out);
    }
    out
}

fn flatten_into(category: &str, prefix: &str, map: &TokenMap, out: &mut Vec<FlatToken>) {
    for (key, value) in map {
        let segment = sanitize_segment(key);
        if segment.is_empty() {
            warn!(category, key, "Skipping token with an unusable name");
            continue;
        }
        let path = format!("{prefix}-{segment}");
        match value {
            Value::String(s) if !s.trim().is_empty() => {
                if !is_css_value(s) {
                    warn!(token = %path, "Skipping token value that would break out of its declaration");
                    continue;
                }
                out.push(FlatToken { path, category: category.to_owned(), value: s.trim().to_owned() });
            }
            Value::Number(n) => {
                out.push(FlatToken { path, category: category.to_owned(), value: n.to_string() });
            }
            Value::Object(nested) => flatten_into(category, &path, nested, out),
            other => warn!(token = %path, kind = kind_of(other), "Skipping malformed token value"),
        }
    }
}

/// Whether `value` fits on the right of a declaration without ending it, opening a block or
/// closing the surrounding `<style>` element.
#[must_use]
pub fn is_css_value(value: &str) -> bool {
    !value.chars().any(|c| matches!(c, ';' | '{' | '}' | '<' | '>') || c.is_control())
}

/// Maps a token key onto the CSS identifier alphabet (`[A-Za-z0-9_-]`).
///
/// Any other character becomes `-`; leading and trailing dashes are trimmed.
#[must_use]
pub fn sanitize_segment(key: &str) -> String {
    let mapped: String = key
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
        .collect();
    mapped.trim_matches('-').to_owned()
}

pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tokens(value: Value) -> DesignTokens {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn nested_paths_are_dash_joined() {
        let flat = flatten(&tokens(json!({
            "colors": { "primary": "#00F0FF", "background": { "main": "#12121A" } },
            "typography": { "weights": { "bold": 700 } }
        })));
        let pairs: Vec<_> = flat.iter().map(|t| (t.path.as_str(), t.value.as_str())).collect();
        assert_eq!(
            pairs,
            [
                ("colors-background-main", "#12121A"),
                ("colors-primary", "#00F0FF"),
                ("typography-weights-bold", "700"),
            ]
        );
    }

    #[test]
    fn malformed_values_are_absent() {
        let flat = flatten(&tokens(json!({
            "colors": { "primary": null, "secondary": "", "accent": true, "list": ["a"] }
        })));
        assert!(flat.is_empty());
    }

    #[test]
    fn values_that_escape_their_declaration_are_absent() {
        let flat = flatten(&tokens(json!({
            "colors": {
                "primary": "red;}</style><script>alert(1)</script><style>:root{",
                "secondary": "red; color: blue",
                "accent": "rgba(0, 240, 255, 0.5)"
            },
            "typography": { "body": "'Inter', sans-serif", "mono": "a\u{0}b" }
        })));
        let paths: Vec<_> = flat.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, ["colors-accent", "typography-body"]);
    }

    #[test]
    fn keys_are_sanitized() {
        assert_eq!(sanitize_segment("2xl"), "2xl");
        assert_eq!(sanitize_segment(" line height "), "line-height");
        assert_eq!(sanitize_segment("a.b/c"), "a-b-c");
        assert_eq!(sanitize_segment("{}"), "");
    }

    #[test]
    fn merge_is_deep() {
        let mut base = tokens(json!({ "colors": { "background": { "main": "#000", "alt": "#111" } } }));
        let overlay = tokens(json!({ "colors": { "background": { "main": "#fff" } }, "radius": { "sm": "2px" } }));
        merge_tokens(&mut base, &overlay);
        assert_eq!(base.colors["background"], json!({ "main": "#fff", "alt": "#111" }));
        assert_eq!(base.extra["radius"]["sm"], json!("2px"));
    }
}
