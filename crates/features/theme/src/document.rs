//! Lenient decoding of theme rows.
//!
//! Rows come from storage written by several editors over time, so a malformed field is
//! replaced by its default and reported instead of failing the whole theme. Only `id` is
//! mandatory.

use crate::error::{ThemeError, ThemeErrorExt};
use crate::tokens::kind_of;
use chrono::{DateTime, Utc};
use impulse_domain::theme::{
    ComponentToken, CompositionRules, DesignTokens, StyleMap, Theme, ThemeContext, ThemeStatus,
    TokenMap,
};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

/// A field that was substituted while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// A decoded theme together with everything that had to be substituted.
#[derive(Debug, Clone)]
pub struct ParsedTheme {
    pub theme: Theme,
    pub issues: Vec<ParseIssue>,
}

/// Decodes a JSON theme row. Each substitution is logged at `warn` and kept in the result.
///
/// # Errors
/// - [`ThemeError::Json`] if `bytes` is not JSON.
/// - [`ThemeError::Malformed`] if the row is not an object or has no usable `id`.
pub fn parse_theme_slice(bytes: &[u8]) -> Result<ParsedTheme, ThemeError> {
    let value: Value = serde_json::from_slice(bytes).context("Theme row is not valid JSON")?;
    parse_theme(&value)
}

/// Decodes an already parsed JSON theme row. See [`parse_theme_slice`].
///
/// # Errors
/// [`ThemeError::Malformed`] if the row is not an object or has no usable `id`.
pub fn parse_theme(value: &Value) -> Result<ParsedTheme, ThemeError> {
    let Value::Object(row) = value else {
        return Err(ThemeError::Malformed {
            message: format!("expected an object, found {}", kind_of(value)).into(),
            context: None,
        });
    };

    let id = match row.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_owned(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(ThemeError::Malformed { message: "missing theme id".into(), context: None });
        },
    };

    let mut p = Parser { theme_id: &id, issues: Vec::new() };

    let name = p.string(row, "name").unwrap_or_else(|| {
        p.issue("name", "missing; using the id");
        id.clone()
    });

    let theme = Theme {
        name,
        description: p.string(row, "description"),
        status: p.status(row),
        is_default: p.flag(row, "is_default"),
        version: p.version(row),
        cache_key: p.string(row, "cache_key"),
        parent_theme_id: p.string(row, "parent_theme_id"),
        design_tokens: p.design_tokens(row.get("design_tokens")),
        component_tokens: p.component_tokens(row.get("component_tokens")),
        composition_rules: p.composition_rules(row.get("composition_rules")),
        cached_styles: p.styles("cached_styles", row.get("cached_styles")),
        created_by: p.string(row, "created_by"),
        created_at: p.timestamp(row, "created_at"),
        updated_at: p.timestamp(row, "updated_at"),
        published_at: p.timestamp(row, "published_at"),
        id: id.clone(),
    };

    Ok(ParsedTheme { theme, issues: p.issues })
}

struct Parser<'a> {
    theme_id: &'a str,
    issues: Vec<ParseIssue>,
}

impl Parser<'_> {
    fn issue(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        let issue = ParseIssue { field: field.into(), reason: reason.into() };
        warn!(theme = self.theme_id, field = %issue.field, reason = %issue.reason, "Substituted malformed theme field");
        self.issues.push(issue);
    }

    fn string(&mut self, row: &Map<String, Value>, key: &str) -> Option<String> {
        match row.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.issue(key, format!("expected a string, found {}", kind_of(other)));
                None
            },
        }
    }

    fn flag(&mut self, row: &Map<String, Value>, key: &str) -> bool {
        match row.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.issue(key, format!("expected a bool, found {}", kind_of(other)));
                false
            },
        }
    }

    fn status(&mut self, row: &Map<String, Value>) -> ThemeStatus {
        match row.get("status") {
            None | Some(Value::Null) => ThemeStatus::default(),
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|_| {
                self.issue("status", format!("unknown status {value}; using draft"));
                ThemeStatus::default()
            }),
        }
    }

    fn version(&mut self, row: &Map<String, Value>) -> u32 {
        match row.get("version") {
            None | Some(Value::Null) => 1,
            Some(value) => {
                match value.as_u64().and_then(|v| u32::try_from(v).ok()).filter(|v| *v > 0) {
                    Some(v) => v,
                    None => {
                        self.issue("version", format!("expected a positive integer, found {value}"));
                        1
                    },
                }
            },
        }
    }

    fn timestamp(&mut self, row: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.string(row, key)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(err) => {
                self.issue(key, format!("invalid timestamp '{raw}': {err}"));
                None
            },
        }
    }

    /// Storage sometimes hands JSON columns over as encoded strings.
    fn object<'v>(&mut self, field: &str, value: Option<&'v Value>) -> Option<Cow<'v, Map<String, Value>>> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(Cow::Borrowed(map)),
            Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
                Ok(Value::Object(map)) => Some(Cow::Owned(map)),
                _ => {
                    self.issue(field, "string does not encode an object");
                    None
                },
            },
            Some(other) => {
                self.issue(field, format!("expected an object, found {}", kind_of(other)));
                None
            },
        }
    }

    fn design_tokens(&mut self, value: Option<&Value>) -> DesignTokens {
        let mut tokens = DesignTokens::default();
        let Some(categories) = self.object("design_tokens", value) else {
            return tokens;
        };
        for (category, entries) in categories.iter() {
            let field = format!("design_tokens.{category}");
            match entries {
                Value::Object(map) => {
                    let cleaned = self.token_map(&field, map);
                    tokens.category_mut(category).extend(cleaned);
                },
                Value::Null => {},
                other => self.issue(field, format!("expected an object, found {}", kind_of(other))),
            }
        }
        tokens
    }

    fn token_map(&mut self, field: &str, map: &Map<String, Value>) -> TokenMap {
        let mut cleaned = TokenMap::new();
        for (key, value) in map {
            let path = format!("{field}.{key}");
            match value {
                Value::String(_) | Value::Number(_) => {
                    cleaned.insert(key.clone(), value.clone());
                },
                Value::Object(nested) => {
                    let nested = self.token_map(&path, nested);
                    cleaned.insert(key.clone(), Value::Object(nested));
                },
                Value::Null => {},
                other => self.issue(path, format!("unsupported token value ({})", kind_of(other))),
            }
        }
        cleaned
    }

    fn styles(&mut self, field: &str, value: Option<&Value>) -> StyleMap {
        let Some(map) = self.object(field, value) else {
            return StyleMap::new();
        };
        let mut styles = StyleMap::new();
        for (key, value) in map.iter() {
            match value {
                Value::String(s) => {
                    styles.insert(key.clone(), s.clone());
                },
                Value::Number(n) => {
                    styles.insert(key.clone(), n.to_string());
                },
                Value::Null => {},
                other => self.issue(format!("{field}.{key}"), format!("unsupported style value ({})", kind_of(other))),
            }
        }
        styles
    }

    fn component_tokens(&mut self, value: Option<&Value>) -> Vec<ComponentToken> {
        let entries = match value {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                self.issue("component_tokens", format!("expected an array, found {}", kind_of(other)));
                return Vec::new();
            },
        };

        let mut tokens = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let field = format!("component_tokens[{index}]");
            let Value::Object(row) = entry else {
                self.issue(field, format!("expected an object, found {}", kind_of(entry)));
                continue;
            };
            let Some(component_name) =
                self.string(row, "component_name").filter(|n| !n.trim().is_empty())
            else {
                self.issue(field, "missing component_name; dropped");
                continue;
            };
            let context = match self.string(row, "context") {
                None => None,
                Some(raw) => match raw.parse::<ThemeContext>() {
                    Ok(context) => Some(context),
                    Err(err) => {
                        self.issue(format!("{field}.context"), format!("{err}; dropped"));
                        continue;
                    },
                },
            };
            let id = self.string(row, "id").unwrap_or_else(|| format!("{}-{component_name}-{index}", self.theme_id));
            tokens.push(ComponentToken {
                id,
                styles: self.styles(&format!("{field}.styles"), row.get("styles")),
                description: self.string(row, "description"),
                theme_id: self.string(row, "theme_id"),
                component_name,
                context,
            });
        }
        tokens
    }

    fn composition_rules(&mut self, value: Option<&Value>) -> CompositionRules {
        let mut rules = CompositionRules::new();
        let Some(contexts) = self.object("composition_rules", value) else {
            return rules;
        };
        for (context, components) in contexts.iter() {
            let field = format!("composition_rules.{context}");
            let Value::Object(components) = components else {
                self.issue(field, format!("expected an object, found {}", kind_of(components)));
                continue;
            };
            let entry = rules.entry(context.clone()).or_default();
            for (component, styles) in components {
                let styles = self.styles(&format!("{field}.{component}"), Some(styles));
                entry.insert(component.clone(), styles);
            }
        }
        rules
    }
}
