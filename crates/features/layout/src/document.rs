//! Lenient decoding of layout rows.
//!
//! Only the layout `id` is mandatory. Nodes without a `type` are dropped, nodes without an
//! `id` get one derived from their position, nodes whose `permissions` cannot be read are
//! dropped with their children, and everything else falls back to defaults.
//! Every substitution is logged and returned.

use crate::error::{LayoutError, LayoutErrorExt};
use impulse_domain::layout::{Layout, LayoutBody, LayoutNode, LayoutScope, RawProps};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

/// Layout type used when a row has none.
pub const UNTYPED_LAYOUT: &str = "custom";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutParseIssue {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for LayoutParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

#[derive(Debug, Clone)]
pub struct ParsedLayout {
    pub layout: Layout,
    pub issues: Vec<LayoutParseIssue>,
}

/// Decodes a JSON layout row.
///
/// # Errors
/// - [`LayoutError::Json`] if `bytes` is not JSON.
/// - [`LayoutError::Malformed`] if the row is not an object or has no `id`.
pub fn parse_layout_slice(bytes: &[u8]) -> Result<ParsedLayout, LayoutError> {
    let value: Value = serde_json::from_slice(bytes).context("Layout row is not valid JSON")?;
    parse_layout(&value)
}

/// Decodes an already parsed JSON layout row. See [`parse_layout_slice`].
///
/// # Errors
/// [`LayoutError::Malformed`] if the row is not an object or has no `id`.
pub fn parse_layout(value: &Value) -> Result<ParsedLayout, LayoutError> {
    let Value::Object(row) = value else {
        return Err(LayoutError::Malformed { message: "expected an object".into(), context: None });
    };
    let Some(id) = row.get("id").and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(LayoutError::Malformed { message: "missing layout id".into(), context: None });
    };

    let mut p = Parser { layout_id: id, issues: Vec::new() };

    let layout_type = p.string(row, "type").unwrap_or_else(|| {
        p.issue("type", format!("missing; using '{UNTYPED_LAYOUT}'"));
        UNTYPED_LAYOUT.to_owned()
    });
    let name = p.string(row, "name").unwrap_or_else(|| id.to_owned());
    let scope = match p.string(row, "scope") {
        None => LayoutScope::default(),
        Some(raw) => raw.parse().unwrap_or_else(|err: String| {
            p.issue("scope", format!("{err}; using site"));
            LayoutScope::default()
        }),
    };

    let layout = Layout {
        id: id.to_owned(),
        name,
        layout_type,
        scope,
        description: p.string(row, "description"),
        body: p.body(row.get("layout_json")),
        version: p.version(row),
        is_active: p.flag(row, "is_active"),
        is_locked: p.flag(row, "is_locked"),
        created_by: p.string(row, "created_by"),
        created_at: p.timestamp(row, "created_at"),
        updated_at: p.timestamp(row, "updated_at"),
    };
    Ok(ParsedLayout { layout, issues: p.issues })
}

struct Parser<'a> {
    layout_id: &'a str,
    issues: Vec<LayoutParseIssue>,
}

impl Parser<'_> {
    fn issue(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        let issue = LayoutParseIssue { path: path.into(), reason: reason.into() };
        warn!(
            layout = self.layout_id,
            path = %issue.path,
            reason = %issue.reason,
            "Substituted malformed layout field"
        );
        self.issues.push(issue);
    }

    fn string(&mut self, row: &Map<String, Value>, key: &str) -> Option<String> {
        match row.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => {
                self.issue(key, format!("expected a string, found {other}"));
                None
            },
        }
    }

    fn flag(&mut self, row: &Map<String, Value>, key: &str) -> bool {
        match row.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.issue(key, format!("expected a bool, found {other}"));
                false
            },
        }
    }

    fn version(&mut self, row: &Map<String, Value>) -> u32 {
        match row.get("version") {
            None | Some(Value::Null) => 1,
            Some(value) => value.as_u64().and_then(|v| u32::try_from(v).ok()).filter(|v| *v > 0).unwrap_or_else(|| {
                self.issue("version", format!("expected a positive integer, found {value}"));
                1
            }),
        }
    }

    fn timestamp(&mut self, row: &Map<String, Value>, key: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        let raw = self.string(row, key)?;
        match chrono::DateTime::parse_from_rfc3339(&raw) {
            Ok(at) => Some(at.with_timezone(&chrono::Utc)),
            Err(err) => {
                self.issue(key, format!("invalid timestamp '{raw}': {err}"));
                None
            },
        }
    }

    fn body(&mut self, value: Option<&Value>) -> LayoutBody {
        let decoded;
        let body = match value {
            None | Some(Value::Null) => return LayoutBody::default(),
            Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
                Ok(v) => {
                    decoded = v;
                    &decoded
                },
                Err(err) => {
                    self.issue("layout_json", format!("undecodable string: {err}"));
                    return LayoutBody::default();
                },
            },
            Some(v) => v,
        };

        // Older rows store the component list directly.
        let (components, version) = match body {
            Value::Array(list) => (Some(list), None),
            Value::Object(obj) => match obj.get("components") {
                None | Some(Value::Null) => (None, obj.get("version")),
                Some(Value::Array(list)) => (Some(list), obj.get("version")),
                Some(other) => {
                    self.issue("layout_json.components", format!("expected an array, found {other}"));
                    (None, obj.get("version"))
                },
            },
            other => {
                self.issue("layout_json", format!("expected an object, found {other}"));
                (None, None)
            },
        };

        LayoutBody {
            components: components.map(|list| self.nodes(list, "")).unwrap_or_default(),
            version: version.and_then(Value::as_u64).and_then(|v| u32::try_from(v).ok()).unwrap_or(1),
        }
    }

    fn nodes(&mut self, list: &[Value], parent: &str) -> Vec<LayoutNode> {
        list.iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let path = if parent.is_empty() { index.to_string() } else { format!("{parent}.{index}") };
                self.node(value, &path)
            })
            .collect()
    }

    fn node(&mut self, value: &Value, path: &str) -> Option<LayoutNode> {
        let Value::Object(obj) = value else {
            self.issue(path, "node is not an object; dropped");
            return None;
        };
        let Some(kind) = obj.get("type").and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty()) else {
            self.issue(path, "node has no type; dropped");
            return None;
        };

        let id = match obj.get("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                let generated = format!("{}:{path}", self.layout_id);
                self.issue(path, format!("node has no id; using '{generated}'"));
                generated
            },
        };

        let props = match obj.get("props") {
            None | Some(Value::Null) => RawProps::new(),
            Some(Value::Object(props)) => props.clone(),
            Some(other) => {
                self.issue(format!("{path}.props"), format!("expected an object, found {other}"));
                RawProps::new()
            },
        };

        // An unreadable permission list cannot be enforced, so the whole subtree goes.
        let permissions = match obj.get("permissions") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(single)) => vec![single.clone()],
            Some(Value::Array(list)) => {
                let parsed = list.iter().map(|p| p.as_str().map(str::to_owned)).collect::<Option<Vec<_>>>();
                let Some(list) = parsed else {
                    self.issue(format!("{path}.permissions"), "non-string permission; node dropped");
                    return None;
                };
                list
            },
            Some(other) => {
                self.issue(format!("{path}.permissions"), format!("expected an array, found {other}; node dropped"));
                return None;
            },
        };

        let children = match obj.get("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(list)) => self.nodes(list, path),
            Some(other) => {
                self.issue(format!("{path}.children"), format!("expected an array, found {other}"));
                Vec::new()
            },
        };

        Some(LayoutNode { id, kind: kind.to_owned(), props, children, permissions })
    }
}
