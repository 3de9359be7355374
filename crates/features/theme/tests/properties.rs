use impulse_theme::domain::theme::{ComponentToken, DesignTokens, StyleMap, Theme, ThemeContext};
use impulse_theme::{CssProjector, InlineStyle, component_styles};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn context() -> impl Strategy<Value = Option<ThemeContext>> {
    prop_oneof![
        Just(None),
        Just(Some(ThemeContext::Site)),
        Just(Some(ThemeContext::Admin)),
        Just(Some(ThemeContext::Shared)),
    ]
}

fn component_token() -> impl Strategy<Value = ComponentToken> {
    ("[a-c]", context(), "[a-z]{1,6}").prop_map(|(name, context, color)| ComponentToken {
        id: format!("{name}-{color}"),
        component_name: name,
        context,
        styles: StyleMap::from([("color".to_owned(), color)]),
        ..ComponentToken::default()
    })
}

fn token_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        "[#a-f0-9 ]{0,8}".prop_map(Value::from),
        any::<u16>().prop_map(Value::from),
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop::collection::btree_map("[a-zA-Z0-9 ._-]{1,8}", inner, 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
    })
}

fn design_tokens() -> impl Strategy<Value = DesignTokens> {
    prop::collection::btree_map("[a-z]{1,8}", prop::collection::btree_map("[a-z0-9]{1,6}", token_value(), 0..4), 0..4)
        .prop_map(|categories| {
            let mut tokens = DesignTokens::default();
            for (category, entries) in categories {
                tokens.category_mut(&category).extend(entries);
            }
            tokens
        })
}

proptest! {
    #[test]
    fn lookup_prefers_context_then_context_free(
        tokens in prop::collection::vec(component_token(), 0..12),
        name in "[a-d]",
        ctx in context(),
    ) {
        let theme = Theme { id: "p".to_owned(), component_tokens: tokens.clone(), ..Theme::default() };
        let styles = component_styles(&theme, &name, ctx);

        let exact = ctx.and_then(|c| tokens.iter().find(|t| t.component_name == name && t.context == Some(c)));
        let generic = tokens.iter().find(|t| t.component_name == name && t.context.is_none());
        let expected = exact.or(generic).map(|t| t.styles.clone()).unwrap_or_default();
        prop_assert_eq!(styles, expected);
    }

    #[test]
    fn projection_always_yields_valid_names_and_is_idempotent(tokens in design_tokens()) {
        let theme = Theme { id: "p".to_owned(), design_tokens: tokens, ..Theme::default() };
        let mut projector = CssProjector::default();
        let fallback = projector.derive(&Theme::default());
        let vars = projector.derive(&theme);

        for (name, value) in vars.iter() {
            let body = name.strip_prefix("--").unwrap();
            prop_assert!(!body.is_empty());
            prop_assert!(body.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'), "{}", name);
            prop_assert!(!value.trim().is_empty());
        }
        for (name, _) in fallback.iter() {
            prop_assert!(vars.get(name).is_some(), "fallback variable {} missing", name);
        }

        let mut root = InlineStyle::new();
        projector.project(&theme, &mut root);
        prop_assert!(projector.project(&theme, &mut root).is_noop());
    }
}
