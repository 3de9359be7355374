//! Core layouts every site needs, created on first start.

use crate::error::LayoutError;
use crate::source::LayoutSource;
use impulse_domain::layout::{Layout, LayoutBody, LayoutNode, LayoutScope};
use tracing::{info, instrument};

/// Layout types seeded for the site scope.
pub const CORE_LAYOUT_TYPES: [&str; 3] = ["topnav", "footer", "usermenu"];

/// What [`seed_core_layouts`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

/// Creates each core layout whose type has no active layout in the site scope yet.
///
/// A row already stored under the seed id is never replaced, even when it has been
/// deactivated or locked since.
///
/// # Errors
/// The first source error; layouts created before it stay created.
#[instrument(skip_all)]
pub async fn seed_core_layouts<S>(source: &S) -> Result<SeedReport, LayoutError>
where
    S: LayoutSource + ?Sized,
{
    let mut report = SeedReport::default();
    for layout in core_layouts() {
        let existing = match source.get(&layout.id).await {
            Ok(found) => Some(found.id),
            Err(LayoutError::NotFound { .. }) => source
                .get_by_type_and_scope(&layout.layout_type, layout.scope)
                .await?
                .map(|found| found.id),
            Err(err) => return Err(err),
        };
        if let Some(existing) = existing {
            info!(layout_type = %layout.layout_type, %existing, "Core layout present");
            report.existing.push(layout.layout_type);
            continue;
        }
        let layout_type = layout.layout_type.clone();
        source.save(layout).await?;
        info!(%layout_type, "Created core layout");
        report.created.push(layout_type);
    }
    Ok(report)
}

/// Default `topnav`, `footer` and `usermenu` layouts of the site scope.
#[must_use]
pub fn core_layouts() -> Vec<Layout> {
    vec![
        core("topnav", "Main TopNav", vec![topnav()]),
        core("footer", "Main Footer", vec![footer()]),
        core("usermenu", "User Menu", vec![
            div("usermenu-root", "flex items-center gap-4")
                .with_child(LayoutNode::new("usermenu-component", "UserMenu")),
        ]),
    ]
}

fn core(layout_type: &str, name: &str, components: Vec<LayoutNode>) -> Layout {
    Layout {
        id: format!("core-{layout_type}-site"),
        name: name.to_owned(),
        layout_type: layout_type.to_owned(),
        scope: LayoutScope::Site,
        description: Some(format!("Default {layout_type} layout for site")),
        body: LayoutBody { components, version: 1 },
        version: 1,
        is_active: true,
        ..Layout::default()
    }
}

fn div(id: &str, class: &str) -> LayoutNode {
    LayoutNode::new(id, "div").with_prop("className", class)
}

fn text(id: &str, tag: &str, class: Option<&str>, text: &str) -> LayoutNode {
    let node = LayoutNode::new(id, tag).with_prop("children", text);
    match class {
        Some(class) => node.with_prop("className", class),
        None => node,
    }
}

fn topnav() -> LayoutNode {
    LayoutNode::new("main-topnav-root", "nav")
        .with_prop("className", "mainnav-container mainnav-header mainnav-gradient mainnav-morph")
        .with_children([
            div("main-topnav-effects", "mainnav-effects-wrapper absolute inset-0 w-full h-full overflow-hidden")
                .with_child(div("main-topnav-effects-inner", "w-full h-full pointer-events-none")),
            div("main-topnav-content", "container mx-auto px-4").with_child(
                div("main-topnav-row", "flex items-center justify-between py-4").with_children([
                    LayoutNode::new("main-topnav-logo", "Logo"),
                    LayoutNode::new("main-topnav-navigation", "NavigationItems"),
                    div("main-topnav-actions", "flex items-center gap-4").with_children([
                        LayoutNode::new("main-topnav-search", "SearchButton"),
                        LayoutNode::new("main-topnav-auth", "AuthSection"),
                    ]),
                ]),
            ),
        ])
}

fn footer_link(n: usize, href: &str, label: &str) -> LayoutNode {
    LayoutNode::new(format!("main-footer-link-{n}"), "li").with_child(
        LayoutNode::new(format!("main-footer-link-{n}-a"), "a")
            .with_prop("href", href)
            .with_prop("className", "text-muted-foreground hover:text-foreground transition-colors")
            .with_prop("children", label),
    )
}

fn social(n: usize, label: &str, icon: &str) -> LayoutNode {
    LayoutNode::new(format!("main-footer-social-{n}"), "a")
        .with_prop("href", "#")
        .with_prop("className", "text-muted-foreground hover:text-foreground")
        .with_prop("aria-label", label)
        .with_child(LayoutNode::new(format!("main-footer-social-{n}-icon"), icon).with_prop("className", "h-5 w-5"))
}

fn footer() -> LayoutNode {
    let branding = LayoutNode::new("main-footer-branding", "div").with_children([
        LayoutNode::new("main-footer-logo", "Logo").with_prop("size", "sm"),
        text(
            "main-footer-tagline",
            "p",
            Some("mt-2 text-sm text-muted-foreground"),
            "A hub for passionate makers building and customizing 3D printers.",
        ),
    ]);
    let links = div("main-footer-links", "space-y-4").with_children([
        text("main-footer-links-title", "h3", Some("text-sm font-medium"), "Quick Links"),
        LayoutNode::new("main-footer-links-list", "ul").with_prop("className", "space-y-2 text-sm").with_children([
            footer_link(1, "/builds", "Browse Builds"),
            footer_link(2, "/parts", "Parts Library"),
            footer_link(3, "/community", "Community"),
        ]),
    ]);
    let socials = div("main-footer-social", "space-y-4").with_children([
        text("main-footer-social-title", "h3", Some("text-sm font-medium"), "Connect With Us"),
        div("main-footer-social-links", "flex space-x-4").with_children([
            social(1, "Twitter", "TwitterIcon"),
            social(2, "GitHub", "GithubIcon"),
            social(3, "Discord", "DiscordIcon"),
        ]),
    ]);

    LayoutNode::new("main-footer-root", "footer")
        .with_prop("className", "bg-background/80 border-t border-border py-8 mt-auto")
        .with_child(
            div("main-footer-container", "container mx-auto px-4").with_children([
                div("main-footer-content", "grid grid-cols-1 md:grid-cols-3 gap-8")
                    .with_children([branding, links, socials]),
                div(
                    "main-footer-copyright",
                    "mt-8 pt-4 border-t border-border text-center text-xs text-muted-foreground",
                )
                .with_child(text("main-footer-copyright-text", "p", None, "MakersImpulse. All rights reserved.")),
            ]),
        )
}
