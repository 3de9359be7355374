use impulse_domain::layout::{Layout, LayoutNode, LayoutScope};
use impulse_domain::theme::{DesignTokens, Theme, ThemeContext, ThemeStatus};
use serde_json::json;

#[test]
fn theme_row_deserializes_with_defaults() {
    let theme: Theme = serde_json::from_value(json!({
        "id": "t1",
        "name": "Impulsivity",
        "status": "published",
        "is_default": true,
        "design_tokens": {
            "colors": { "primary": "#00F0FF" },
            "animations": { "fast": "150ms" },
            "radius": { "md": "0.5rem" }
        },
        "component_tokens": [
            { "id": "c1", "component_name": "Card", "context": "admin", "styles": { "padding": "1rem" } }
        ],
        "created_at": "2024-05-01T10:00:00Z"
    }))
    .expect("theme row");

    assert_eq!(theme.status, ThemeStatus::Published);
    assert_eq!(theme.version, 1);
    assert_eq!(theme.design_tokens.colors["primary"], "#00F0FF");
    assert_eq!(theme.design_tokens.animation["fast"], "150ms");
    assert!(theme.design_tokens.category("radius").is_some());
    assert_eq!(theme.component_tokens[0].context, Some(ThemeContext::Admin));
    assert_eq!(theme.effective_cache_key(), "t1@1");
    assert!(theme.created_at.is_some());
}

#[test]
fn categories_iterate_core_first() {
    let mut tokens = DesignTokens::default();
    tokens.category_mut("zeta").insert("a".into(), json!("1"));
    tokens.category_mut("colors").insert("primary".into(), json!("#fff"));

    let names: Vec<_> = tokens.categories().map(|(name, _)| name).collect();
    assert_eq!(names, ["colors", "spacing", "typography", "effects", "animation", "zeta"]);
    assert!(!tokens.is_empty());
}

#[test]
fn context_parses_case_insensitively() {
    assert_eq!("Admin".parse::<ThemeContext>().unwrap(), ThemeContext::Admin);
    assert!("chat".parse::<ThemeContext>().is_err());
    assert_eq!(ThemeContext::Shared.to_string(), "shared");
}

#[test]
fn layout_row_uses_layout_json_column() {
    let layout: Layout = serde_json::from_value(json!({
        "id": "l1",
        "name": "Main TopNav",
        "type": "topnav",
        "scope": "site",
        "layout_json": {
            "components": [
                { "id": "root", "type": "nav", "children": [ { "id": "logo", "type": "Logo" } ] }
            ],
            "version": 2
        },
        "is_active": true
    }))
    .expect("layout row");

    assert_eq!(layout.scope, LayoutScope::Site);
    assert_eq!(layout.body.version, 2);
    assert_eq!(layout.node_count(), 2);
    assert_eq!(layout.components()[0].children[0].kind, "Logo");
}

#[test]
fn node_builder_nests_children() {
    let node = LayoutNode::new("root", "AdminSection")
        .with_prop("className", "space-y-6")
        .with_child(LayoutNode::new("title", "heading").requires("admin:view"));

    assert_eq!(node.node_count(), 2);
    assert_eq!(node.children[0].permissions, ["admin:view"]);
}
