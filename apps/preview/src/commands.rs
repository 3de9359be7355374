use anyhow::{Context, Result, bail};
use impulse::Platform;
use impulse::domain::theme::{DesignTokens, ThemeContext};
use impulse::features::layout::{ResolveFlags, validate_layout};
use impulse::features::theme::{THEME_ATTRIBUTE, default_conflicts, to_declarations, validate_theme};
use impulse::kernel::security::PermissionSet;
use serde_json::{Map, Value};
use std::fmt::Write;
use tracing::info;

async fn switch_theme(platform: &Platform, theme: Option<&str>) -> Result<()> {
    if let Some(theme_id) = theme {
        platform.themes().load(theme_id).await.with_context(|| format!("Cannot load theme '{theme_id}'"))?;
    }
    Ok(())
}

/// Builds a token overlay from `category.path=value` pairs.
pub fn overrides_to_tokens(pairs: &[(String, String)]) -> Result<DesignTokens> {
    let mut tokens = DesignTokens::default();
    for (path, value) in pairs {
        let mut segments = path.split('.');
        let (Some(category), Some(mut key)) = (segments.next(), segments.next()) else {
            bail!("override '{path}' must name a category and a token");
        };
        let mut map = tokens.category_mut(category);
        for next in segments {
            let entry = map.entry(key.to_owned()).or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(inner) = entry else {
                bail!("override '{path}' crosses a non-object token");
            };
            map = inner;
            key = next;
        }
        map.insert(key.to_owned(), Value::String(value.clone()));
    }
    Ok(tokens)
}

/// The CSS rule holding every custom property of the active theme.
///
/// # Errors
/// When the requested theme cannot be loaded or an override is malformed.
pub async fn css(
    platform: &Platform,
    theme: Option<&str>,
    selector: &str,
    overrides: &[(String, String)],
) -> Result<String> {
    switch_theme(platform, theme).await?;
    if !overrides.is_empty() {
        let revision = platform.themes().preview_tokens(&overrides_to_tokens(overrides)?);
        info!(revision = revision.revision, overrides = overrides.len(), "Previewing token overrides");
    }
    Ok(platform.themes().css_variables().to_css_block(selector))
}

/// The scoped class rule of `component`, followed by the theme's precompiled CSS for it.
///
/// # Errors
/// When the requested theme cannot be loaded.
pub async fn styles(
    platform: &Platform,
    component: &str,
    context: Option<ThemeContext>,
    theme: Option<&str>,
) -> Result<String> {
    switch_theme(platform, theme).await?;
    let store = platform.themes();
    let context = context.or(Some(platform.config().theme.context));

    let styles = store.composed_styles(component, context);
    let mut out = format!(".{} {{ {} }}\n", store.theme_class(component, context), to_declarations(&styles));
    if let Some(cached) = store.cached_css(component, context) {
        let _ = writeln!(out, "{cached}");
    }
    Ok(out)
}

/// The resolved layout as HTML.
///
/// # Errors
/// When the layout cannot be fetched.
pub async fn render(
    platform: &Platform,
    layout_id: &str,
    grants: &[String],
    flags: ResolveFlags,
    document: bool,
) -> Result<String> {
    let layout = platform.layouts().get(layout_id).await.with_context(|| format!("Cannot load layout '{layout_id}'"))?;
    let permissions: PermissionSet = grants.iter().cloned().collect();
    let resolver = platform.resolver().clone().with_flags(platform.resolver().flags() | flags);

    let tree = resolver.resolve(&layout, &permissions);
    info!(
        layout = %layout.id,
        resolved = tree.report.resolved,
        skipped = tree.report.skipped,
        placeholders = tree.report.placeholders,
        "Layout rendered"
    );
    let body = tree.to_html();
    if !document {
        return Ok(body);
    }

    let theme = platform.themes().current();
    let css = platform.themes().css_variables().to_css_block(":root");
    Ok(format!(
        concat!(
            "<!DOCTYPE html>\n<html {attr}=\"{theme}\">\n<head>\n<meta charset=\"utf-8\" />\n",
            "<title>{title}</title>\n<style>\n{css}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        ),
        attr = THEME_ATTRIBUTE,
        theme = impulse::features::layout::escape(&theme.id),
        title = impulse::features::layout::escape(&layout.name),
        css = css,
        body = body,
    ))
}

/// Every problem found in the theme and layout sources, one per line.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub checked: usize,
    pub problems: Vec<String>,
}

/// Checks every theme and layout the platform can see.
///
/// # Errors
/// When a source cannot be listed.
pub async fn validate(platform: &Platform) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();

    let themes = platform.themes().source().list().await.context("Cannot list themes")?;
    for theme in &themes {
        report.problems.extend(validate_theme(theme).into_iter().map(|issue| format!("theme {}: {issue}", theme.id)));
    }
    let defaults = default_conflicts(&themes);
    if !defaults.is_empty() {
        report.problems.push(format!("themes: more than one default ({})", defaults.join(", ")));
    }

    let layouts = platform.layouts().list().await.context("Cannot list layouts")?;
    let max_depth = platform.config().layout.max_depth;
    for layout in &layouts {
        report.problems.extend(
            validate_layout(layout, Some(platform.registry()), max_depth)
                .into_iter()
                .map(|issue| format!("layout {}: {issue}", layout.id)),
        );
    }

    report.checked = themes.len() + layouts.len();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_nest_by_path() {
        let tokens = overrides_to_tokens(&[
            ("colors.primary".to_owned(), "#FF0000".to_owned()),
            ("colors.text.accent".to_owned(), "#00FF00".to_owned()),
            ("radius.lg".to_owned(), "1rem".to_owned()),
        ])
        .unwrap();

        assert_eq!(tokens.colors["primary"], "#FF0000");
        assert_eq!(tokens.colors["text"]["accent"], "#00FF00");
        assert_eq!(tokens.extra["radius"]["lg"], "1rem");
    }

    #[test]
    fn deeper_override_replaces_a_leaf() {
        let tokens = overrides_to_tokens(&[
            ("colors.text".to_owned(), "#fff".to_owned()),
            ("colors.text.primary".to_owned(), "#000".to_owned()),
        ])
        .unwrap();
        assert_eq!(tokens.colors["text"]["primary"], "#000");
    }

    #[tokio::test]
    async fn css_applies_overrides_over_the_default_theme() {
        let platform = Platform::builder().build().await.unwrap();
        let css = css(&platform, None, ":root", &[("colors.primary".to_owned(), "#102030".to_owned())]).await.unwrap();
        assert!(css.contains("--colors-primary: #102030;"), "{css}");
        assert!(css.contains("--colors-primary-rgb: 16, 32, 48;"), "{css}");
    }

    #[tokio::test]
    async fn unknown_theme_is_an_error() {
        let platform = Platform::builder().build().await.unwrap();
        assert!(css(&platform, Some("missing"), ":root", &[]).await.is_err());
    }
}
