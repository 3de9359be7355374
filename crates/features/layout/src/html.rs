//! Minimal HTML writer used by the built-in components.

use std::borrow::Cow;
use std::fmt::Write as _;

const VOID_TAGS: [&str; 5] = ["br", "hr", "img", "input", "meta"];

/// Escapes text and attribute values.
#[must_use]
pub fn escape(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// URL schemes a rendered `href` or `src` may carry. Relative URLs are always allowed.
pub const ALLOWED_URL_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// `url` when it is relative or uses one of [`ALLOWED_URL_SCHEMES`], `#` otherwise.
///
/// Whitespace and control characters are ignored while reading the scheme, as browsers do,
/// so `java\tscript:` is caught too.
#[must_use]
pub fn safe_url(url: &str) -> &str {
    let compact: String = url.chars().filter(|c| !c.is_ascii_whitespace() && !c.is_control()).collect();
    let scheme = compact
        .split_once(':')
        .map(|(head, _)| head)
        .filter(|head| !head.contains(['/', '?', '#']));
    match scheme {
        None => url,
        Some(scheme) if ALLOWED_URL_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) => url,
        Some(_) => "#",
    }
}

/// Builder for a single element. Attribute values and text are escaped; `html` is not.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    body: String,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), classes: Vec::new(), attributes: Vec::new(), body: String::new() }
    }

    /// Adds space separated classes; empty input is ignored.
    #[must_use]
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        self.classes.extend(class.as_ref().split_whitespace().map(str::to_owned));
        self
    }

    #[must_use]
    pub fn class_opt(self, class: Option<&str>) -> Self {
        match class {
            Some(class) => self.class(class),
            None => self,
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn attr_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.body.push_str(&escape(text));
        self
    }

    #[must_use]
    pub fn text_opt(self, text: Option<&str>) -> Self {
        match text {
            Some(text) => self.text(text),
            None => self,
        }
    }

    /// Appends already rendered markup.
    #[must_use]
    pub fn html(mut self, html: &str) -> Self {
        self.body.push_str(html);
        self
    }

    #[must_use]
    pub fn finish(self) -> String {
        let mut out = format!("<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        if VOID_TAGS.contains(&self.tag.as_str()) {
            out.push_str(" />");
            return out;
        }
        let _ = write!(out, ">{}</{}>", self.body, self.tag);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let html = Element::new("a")
            .class("link  muted")
            .attr("href", "/search?q=\"x\"&y")
            .text("<b>")
            .finish();
        assert_eq!(html, "<a class=\"link muted\" href=\"/search?q=&quot;x&quot;&amp;y\">&lt;b&gt;</a>");
    }

    #[test]
    fn only_listed_schemes_survive() {
        for url in ["/parts", "#top", "?q=1", "docs/a:b", "https://x.dev", "MAILTO:a@b.c", "tel:+380"] {
            assert_eq!(safe_url(url), url);
        }
        let hostile =
            ["javascript:alert(1)", " JavaScript:alert(1)", "java\tscript:alert(1)", "data:text/html,x", "vbscript:x"];
        for url in hostile {
            assert_eq!(safe_url(url), "#", "{url}");
        }
    }

    #[test]
    fn void_elements_self_close() {
        assert_eq!(Element::new("img").attr("src", "a.png").html("ignored").finish(), "<img src=\"a.png\" />");
    }
}
