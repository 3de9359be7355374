//! Typed component props.
//!
//! Nodes carry untyped JSON props. Each registration declares a [`PropsKind`]; after the node
//! props are merged over the registration defaults they are decoded into the matching
//! [`ComponentProps`] variant. Components without a schema keep their props as
//! [`ComponentProps::Opaque`].

use impulse_domain::layout::RawProps;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which props schema a component expects.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropsKind {
    Heading,
    Text,
    Link,
    Image,
    Grid,
    Container,
    Button,
    Badge,
    Icon,
    #[default]
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadingProps {
    pub level: u8,
    #[serde(alias = "children")]
    pub text: Option<String>,
    pub class_name: Option<String>,
}

impl Default for HeadingProps {
    fn default() -> Self {
        Self { level: 1, text: None, class_name: None }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    #[serde(alias = "children")]
    pub text: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkProps {
    pub href: String,
    #[serde(alias = "children")]
    pub text: Option<String>,
    pub class_name: Option<String>,
    #[serde(rename = "aria-label", alias = "ariaLabel")]
    pub aria_label: Option<String>,
    /// Opens in a new tab with `rel="noopener noreferrer"`.
    pub external: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProps {
    pub src: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridProps {
    pub cols: u8,
    pub class_name: Option<String>,
}

impl Default for GridProps {
    fn default() -> Self {
        Self { cols: 3, class_name: None }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerProps {
    pub title: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonProps {
    #[serde(alias = "children", alias = "text")]
    pub label: Option<String>,
    pub variant: String,
    pub size: String,
    pub href: Option<String>,
    pub class_name: Option<String>,
}

impl Default for ButtonProps {
    fn default() -> Self {
        Self {
            label: None,
            variant: "default".to_owned(),
            size: "default".to_owned(),
            href: None,
            class_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BadgeProps {
    #[serde(alias = "children", alias = "label")]
    pub text: Option<String>,
    pub variant: String,
    pub class_name: Option<String>,
}

impl Default for BadgeProps {
    fn default() -> Self {
        Self { text: None, variant: "default".to_owned(), class_name: None }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IconProps {
    pub size: Option<u32>,
    pub class_name: Option<String>,
    pub title: Option<String>,
}

/// Props of a resolved node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentProps {
    Heading(HeadingProps),
    Text(TextProps),
    Link(LinkProps),
    Image(ImageProps),
    Grid(GridProps),
    Container(ContainerProps),
    Button(ButtonProps),
    Badge(BadgeProps),
    Icon(IconProps),
    /// Stand-in for a component type nobody registered.
    Placeholder { requested: String, props: RawProps },
    Opaque(RawProps),
}

/// Why a props bag could not be decoded into its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidProps(pub String);

impl ComponentProps {
    /// Decodes `raw` into the schema of `kind` and checks value ranges.
    ///
    /// # Errors
    /// [`InvalidProps`] describing the first offending field.
    pub fn decode(kind: PropsKind, raw: RawProps) -> Result<Self, InvalidProps> {
        let value = Value::Object(raw);
        let props = match kind {
            PropsKind::Heading => Self::Heading(typed(value)?),
            PropsKind::Text => Self::Text(typed(value)?),
            PropsKind::Link => Self::Link(typed(value)?),
            PropsKind::Image => Self::Image(typed(value)?),
            PropsKind::Grid => Self::Grid(typed(value)?),
            PropsKind::Container => Self::Container(typed(value)?),
            PropsKind::Button => Self::Button(typed(value)?),
            PropsKind::Badge => Self::Badge(typed(value)?),
            PropsKind::Icon => Self::Icon(typed(value)?),
            PropsKind::Opaque => match value {
                Value::Object(raw) => Self::Opaque(raw),
                _ => Self::Opaque(RawProps::new()),
            },
        };
        props.check()?;
        Ok(props)
    }

    fn check(&self) -> Result<(), InvalidProps> {
        let fail = |msg: String| Err(InvalidProps(msg));
        match self {
            Self::Heading(h) if !(1..=6).contains(&h.level) => {
                fail(format!("heading level {} is outside 1..=6", h.level))
            },
            Self::Grid(g) if !(1..=12).contains(&g.cols) => fail(format!("grid cols {} is outside 1..=12", g.cols)),
            Self::Image(i) if i.src.trim().is_empty() => fail("image src is empty".to_owned()),
            Self::Link(l) if l.href.trim().is_empty() => fail("link href is empty".to_owned()),
            _ => Ok(()),
        }
    }

    /// `className` of whichever schema, when it has one.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Heading(p) => p.class_name.as_deref(),
            Self::Text(p) => p.class_name.as_deref(),
            Self::Link(p) => p.class_name.as_deref(),
            Self::Image(p) => p.class_name.as_deref(),
            Self::Grid(p) => p.class_name.as_deref(),
            Self::Container(p) => p.class_name.as_deref(),
            Self::Button(p) => p.class_name.as_deref(),
            Self::Badge(p) => p.class_name.as_deref(),
            Self::Icon(p) => p.class_name.as_deref(),
            Self::Placeholder { .. } => None,
            Self::Opaque(raw) => raw.get("className").and_then(Value::as_str),
        }
    }

    /// Text content of whichever schema, when it has one.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Heading(p) => p.text.as_deref(),
            Self::Text(p) => p.text.as_deref(),
            Self::Link(p) => p.text.as_deref(),
            Self::Button(p) => p.label.as_deref(),
            Self::Badge(p) => p.text.as_deref(),
            Self::Opaque(raw) => raw.get("children").or_else(|| raw.get("text")).and_then(Value::as_str),
            _ => None,
        }
    }
}

fn typed<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, InvalidProps> {
    serde_json::from_value(value).map_err(|err| InvalidProps(err.to_string()))
}

/// Shallow merge: node props win over registration defaults.
#[must_use]
pub fn merge_props(defaults: &RawProps, props: &RawProps) -> RawProps {
    let mut merged = defaults.clone();
    merged.extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawProps {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn decodes_with_defaults_and_aliases() {
        let props = ComponentProps::decode(PropsKind::Heading, raw(json!({ "children": "Quick Links" }))).unwrap();
        assert_eq!(
            props,
            ComponentProps::Heading(HeadingProps { level: 1, text: Some("Quick Links".to_owned()), class_name: None })
        );
        assert_eq!(props.text(), Some("Quick Links"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = ComponentProps::decode(PropsKind::Heading, raw(json!({ "level": 9 }))).unwrap_err();
        assert!(err.0.contains("1..=6"));
        assert!(ComponentProps::decode(PropsKind::Grid, raw(json!({ "cols": "three" }))).is_err());
        assert!(ComponentProps::decode(PropsKind::Image, raw(json!({ "alt": "x" }))).is_err());
    }

    #[test]
    fn opaque_keeps_everything() {
        let props = ComponentProps::decode(PropsKind::Opaque, raw(json!({ "className": "row", "x": 1 }))).unwrap();
        assert_eq!(props.class_name(), Some("row"));
        assert!(matches!(props, ComponentProps::Opaque(ref m) if m.len() == 2));
    }

    #[test]
    fn node_props_win_over_defaults() {
        let merged = merge_props(&raw(json!({ "cols": 3, "className": "" })), &raw(json!({ "cols": 2 })));
        assert_eq!(Value::Object(merged), json!({ "cols": 2, "className": "" }));
    }
}
