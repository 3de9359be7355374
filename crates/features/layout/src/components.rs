//! Built-in components and the per-scope registration sets.

use crate::html::{Element, safe_url};
use crate::props::{ComponentProps, PropsKind};
use crate::registry::{ComponentFactory, ComponentRegistration, ComponentRegistry, RenderContext};
use impulse_domain::constants::{ADMIN_ACCESS, ADMIN_VIEW, ANALYTICS_VIEW, UNREGISTERED_COMPONENT, USER_VIEW};
use impulse_domain::layout::LayoutScope;
use tracing::info;

/// A plain HTML element with optional class and text.
#[derive(Debug, Clone, Copy)]
pub struct Tag(pub &'static str);

impl ComponentFactory for Tag {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        Element::new(self.0)
            .class_opt(ctx.props.class_name())
            .text_opt(ctx.props.text())
            .html(ctx.children)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Heading;

impl ComponentFactory for Heading {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let level = match ctx.props {
            ComponentProps::Heading(h) => h.level.clamp(1, 6),
            _ => 1,
        };
        Tag(HEADINGS[usize::from(level - 1)]).render(ctx)
    }
}

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Clone, Copy)]
pub struct Link;

impl ComponentFactory for Link {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let ComponentProps::Link(link) = ctx.props else {
            return Tag("a").render(ctx);
        };
        let mut el = Element::new("a")
            .attr("href", safe_url(&link.href))
            .class_opt(link.class_name.as_deref())
            .attr_opt("aria-label", link.aria_label.as_deref());
        if link.external {
            el = el.attr("target", "_blank").attr("rel", "noopener noreferrer");
        }
        el.text_opt(link.text.as_deref()).html(ctx.children).finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Image;

impl ComponentFactory for Image {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let ComponentProps::Image(img) = ctx.props else {
            return String::new();
        };
        Element::new("img")
            .attr("src", safe_url(&img.src))
            .attr("alt", &img.alt)
            .attr_opt("width", img.width.map(|w| w.to_string()))
            .attr_opt("height", img.height.map(|h| h.to_string()))
            .class_opt(img.class_name.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Grid;

impl ComponentFactory for Grid {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let cols = match ctx.props {
            ComponentProps::Grid(g) => g.cols,
            _ => 1,
        };
        let responsive = match cols {
            2 => "md:grid-cols-2",
            3 => "md:grid-cols-2 lg:grid-cols-3",
            4 => "md:grid-cols-2 lg:grid-cols-4",
            _ => "",
        };
        Element::new("div")
            .class("grid grid-cols-1")
            .class(responsive)
            .class("gap-6")
            .class_opt(ctx.props.class_name())
            .html(ctx.children)
            .finish()
    }
}

/// A `div` with a fixed base class and an optional title.
#[derive(Debug, Clone, Copy)]
pub struct Panel {
    pub class: &'static str,
}

impl ComponentFactory for Panel {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let title = match ctx.props {
            ComponentProps::Container(c) => c.title.as_deref(),
            _ => None,
        };
        let heading = title
            .map(|t| Element::new("h2").class(format!("{}__title", self.class)).text(t).finish())
            .unwrap_or_default();
        Element::new("div")
            .class(self.class)
            .class_opt(ctx.props.class_name())
            .html(&heading)
            .html(ctx.children)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Button;

impl ComponentFactory for Button {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let ComponentProps::Button(btn) = ctx.props else {
            return Tag("button").render(ctx);
        };
        let el = match &btn.href {
            Some(href) => Element::new("a").attr("href", safe_url(href)),
            None => Element::new("button").attr("type", "button"),
        };
        el.class(format!("btn btn-{} btn-{}", btn.variant, btn.size))
            .class_opt(btn.class_name.as_deref())
            .text_opt(btn.label.as_deref())
            .html(ctx.children)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Badge;

impl ComponentFactory for Badge {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let variant = match ctx.props {
            ComponentProps::Badge(b) => b.variant.as_str(),
            _ => "default",
        };
        Element::new("span")
            .class(format!("badge badge-{variant}"))
            .class_opt(ctx.props.class_name())
            .text_opt(ctx.props.text())
            .html(ctx.children)
            .finish()
    }
}

/// An inline stroke icon.
#[derive(Debug, Clone, Copy)]
pub struct Icon {
    pub paths: &'static [&'static str],
}

impl ComponentFactory for Icon {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let (size, title) = match ctx.props {
            ComponentProps::Icon(i) => (i.size, i.title.as_deref()),
            _ => (None, None),
        };
        let body: String = self.paths.iter().map(|d| Element::new("path").attr("d", *d).finish()).collect();
        let title = title.map(|t| Element::new("title").text(t).finish()).unwrap_or_default();
        Element::new("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr("viewBox", "0 0 24 24")
            .attr("fill", "none")
            .attr("stroke", "currentColor")
            .attr("stroke-width", "2")
            .attr_opt("width", size.map(|s| s.to_string()))
            .attr_opt("height", size.map(|s| s.to_string()))
            .class_opt(ctx.props.class_name())
            .html(&title)
            .html(&body)
            .finish()
    }
}

/// Mount point for an interactive widget hydrated on the client.
///
/// Props are handed over as a JSON `data-props` attribute.
#[derive(Debug, Clone, Copy)]
pub struct Island;

impl ComponentFactory for Island {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let props = match ctx.props {
            ComponentProps::Opaque(raw) if !raw.is_empty() => serde_json::to_string(raw).ok(),
            _ => None,
        };
        Element::new("div")
            .class("island")
            .attr("data-island", ctx.kind)
            .attr_opt("data-props", props)
            .html(ctx.children)
            .finish()
    }
}

/// Rendered in place of a component type nobody registered.
#[derive(Debug, Clone, Copy)]
pub struct UnregisteredComponent;

impl ComponentFactory for UnregisteredComponent {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let (requested, props) = match ctx.props {
            ComponentProps::Placeholder { requested, props } => (requested.as_str(), Some(props)),
            _ => (ctx.kind, None),
        };
        let dump = props
            .filter(|p| !p.is_empty())
            .and_then(|p| serde_json::to_string_pretty(p).ok())
            .map(|json| Element::new("pre").class("unregistered-component__props").text(&json).finish())
            .unwrap_or_default();
        Element::new("div")
            .class("unregistered-component")
            .attr("data-requested-type", requested)
            .html(
                &Element::new("div")
                    .class("unregistered-component__title")
                    .text(&format!("Component Not Found: {requested}"))
                    .finish(),
            )
            .html(&dump)
            .html(ctx.children)
            .finish()
    }
}

const TWITTER: &[&str] = &[concat!(
    "M22 4s-.7 2.1-2 3.4c1.6 10-9.4 17.3-18 11.6 2.2.1 4.4-.6 6-2C3 15.5.5 9.6 3 5",
    "c2.2 2.6 5.6 4.1 9 4-.9-4.2 4-6.6 7-3.8 1.1 0 3-1.2 3-1.2z",
)];
const GITHUB: &[&str] = &[concat!(
    "M9 19c-5 1.5-5-2.5-7-3m14 6v-3.87a3.37 3.37 0 0 0-.94-2.61c3.14-.35 6.44-1.54 6.44-7",
    "A5.44 5.44 0 0 0 20 4.77 5.07 5.07 0 0 0 19.91 1S18.73.65 16 2.48a13.38 13.38 0 0 0-7 0",
    "C6.27.65 5.09 1 5.09 1A5.07 5.07 0 0 0 5 4.77a5.44 5.44 0 0 0-1.5 3.78c0 5.42 3.3 6.61 6.44 7",
    "A3.37 3.37 0 0 0 9 18.13V22",
)];
const DISCORD: &[&str] = &[
    "M18 9a5 5 0 0 0-5-5H9a5 5 0 0 0-5 5v7a5 5 0 0 0 5 5h4a5 5 0 0 0 5-5Z",
    "M15 9c0 1.105-0.895 2-2 2s-2-0.895-2-2s0.895-2 2-2 S15 7.895 15 9z",
    "M9 14c0 1.105-0.895 2-2 2s-2-0.895-2-2 s0.895-2 2-2 S9 12.895 9 14z",
    "M17 14c0 1.105-0.895 2-2 2s-2-0.895-2-2 s0.895-2 2-2 S17 12.895 17 14z",
];

fn element(tag: &'static str) -> ComponentRegistration {
    ComponentRegistration::new(Tag(tag)).with_props(PropsKind::Text).in_category("html")
}

fn island(description: &str) -> ComponentRegistration {
    ComponentRegistration::new(Island).in_category("widget").described(description)
}

/// Plain elements available in every scope.
#[must_use]
pub fn html_components() -> Vec<(&'static str, ComponentRegistration)> {
    let mut set: Vec<_> = ["div", "span", "p", "nav", "footer", "section", "ul", "li", "h3"]
        .into_iter()
        .map(|tag| (tag, element(tag)))
        .collect();
    set.extend([
        ("a", ComponentRegistration::new(Link).with_props(PropsKind::Link).in_category("html")),
        ("img", ComponentRegistration::new(Image).with_props(PropsKind::Image).in_category("html")),
        (
            "heading",
            ComponentRegistration::new(Heading)
                .with_props(PropsKind::Heading)
                .with_default("level", 1)
                .with_default("className", "text-2xl font-bold")
                .in_category("html"),
        ),
    ]);
    set
}

/// Components referenced by public site layouts (navigation, footer, user menu).
#[must_use]
pub fn site_components() -> Vec<(&'static str, ComponentRegistration)> {
    let icon = |paths| ComponentRegistration::new(Icon { paths }).with_props(PropsKind::Icon).in_category("icon");
    vec![
        ("Logo", island("Site logo linking home")),
        ("NavigationItems", island("Primary navigation links")),
        ("SearchButton", island("Opens the search dialog")),
        ("AuthSection", island("Sign-in button or account menu")),
        ("LoginSheet", island("Sign-in sheet")),
        ("UserMenu", island("Account dropdown")),
        ("TwitterIcon", icon(TWITTER)),
        ("GithubIcon", icon(GITHUB)),
        ("DiscordIcon", icon(DISCORD)),
    ]
}

/// Components of the admin dashboard.
#[must_use]
pub fn admin_components() -> Vec<(&'static str, ComponentRegistration)> {
    let panel = |class| {
        ComponentRegistration::new(Panel { class }).with_props(PropsKind::Container).in_category("layout")
    };
    let ui = |tag: &'static str, class: &'static str| element(tag).with_default("className", class).in_category("ui");
    vec![
        ("AdminLayout", panel("admin-layout").requires(ADMIN_ACCESS)),
        ("AdminSection", panel("space-y-6")),
        (
            "AdminGrid",
            ComponentRegistration::new(Grid).with_props(PropsKind::Grid).with_default("cols", 3).in_category("layout"),
        ),
        ("DashboardLayout", panel("dashboard-layout").requires(ADMIN_VIEW)),
        ("AdminTopNav", island("Admin top navigation").requires(ADMIN_ACCESS)),
        ("AdminSidebar", island("Admin sidebar").requires(ADMIN_ACCESS)),
        ("Card", panel("card").in_category("ui")),
        ("CardHeader", panel("card-header").in_category("ui")),
        ("CardTitle", ui("h3", "card-title")),
        ("CardDescription", ui("p", "card-description")),
        ("CardContent", panel("card-content").in_category("ui")),
        ("CardFooter", panel("card-footer").in_category("ui")),
        ("Badge", ComponentRegistration::new(Badge).with_props(PropsKind::Badge).in_category("ui")),
        (
            "Button",
            ComponentRegistration::new(Button)
                .with_props(PropsKind::Button)
                .with_default("variant", "default")
                .with_default("size", "default")
                .in_category("ui"),
        ),
        ("DashboardShortcuts", island("Quick links").requires(ADMIN_VIEW)),
        ("StatsCards", island("Headline counters").requires(ADMIN_VIEW)),
        ("ActiveUsersList", island("Users online now").requires(USER_VIEW)),
        ("PerformanceMetrics", island("Response time charts").requires(ANALYTICS_VIEW)),
        ("TrendingParts", island("Most viewed parts").requires(ADMIN_VIEW)),
    ]
}

/// Registers the component set of `scope` plus the plain elements, and installs
/// [`UnregisteredComponent`] as fallback. Returns the number of registrations.
pub fn bootstrap(registry: &ComponentRegistry, scope: LayoutScope) -> usize {
    let mut count = registry.register_bulk(html_components());
    count += match scope {
        LayoutScope::Site | LayoutScope::Feature => registry.register_bulk(site_components()),
        LayoutScope::Admin => registry.register_bulk(admin_components()),
    };
    registry.register(UNREGISTERED_COMPONENT, ComponentRegistration::new(UnregisteredComponent).in_category("system"));
    count += 1;
    registry.set_fallback_component(UnregisteredComponent);
    info!(%scope, count, "Component registry bootstrapped");
    count
}
