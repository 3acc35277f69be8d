//! HTML backend for image tags.
//!
//! Produces HTML5 void `<img>` elements, `<a>` wrappers and inline-markdown
//! captions. Empty attributes are omitted, except `alt`.

use std::borrow::Cow;
use std::fmt::Write;

use pulldown_cmark::{Event, Parser};

use crate::backend::{Anchor, MarkupBackend, RawImage};
use crate::util::normalize_url;

/// Escape a string for use in HTML text or a quoted attribute value.
///
/// # Examples
///
/// ```
/// use imageset_tag::escape_html;
///
/// assert_eq!(escape_html(r#"Tom & "Jerry""#), "Tom &amp; &quot;Jerry&quot;");
/// ```
pub fn escape_html(s: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(s)
}

/// Append ` name="value"` when `value` is non-empty.
fn push_attr(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        let _ = write!(out, r#" {name}="{}""#, escape_html(value));
    }
}

/// HTML render backend.
///
/// Relative locators are joined onto `base_url`.
#[derive(Clone, Debug, Default)]
pub struct HtmlBackend {
    base_url: String,
}

impl HtmlBackend {
    /// Create a backend that resolves relative URLs against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Site base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl MarkupBackend for HtmlBackend {
    fn normalize_url(&self, raw: &str) -> String {
        normalize_url(&self.base_url, raw)
    }

    fn raw_image(&self, image: &RawImage<'_>) -> String {
        let mut out = String::from("<img");
        let _ = write!(
            out,
            r#" src="{}" alt="{}""#,
            escape_html(image.src),
            escape_html(image.alt)
        );
        push_attr(&mut out, "width", image.width);
        push_attr(&mut out, "height", image.height);
        push_attr(&mut out, "class", image.class);
        push_attr(&mut out, "title", image.title);
        out.push('>');
        out
    }

    fn anchor(&self, anchor: &Anchor<'_>, inner: &str) -> String {
        let mut out = String::from("<a");
        let _ = write!(out, r#" href="{}""#, escape_html(anchor.href));
        push_attr(&mut out, "rel", anchor.rel);
        push_attr(&mut out, "class", anchor.class);
        push_attr(&mut out, "title", anchor.title);
        push_attr(&mut out, "target", anchor.target.unwrap_or_default());
        let _ = write!(out, ">{inner}</a>");
        out
    }

    fn caption(&self, text: &str) -> String {
        render_inline_markdown(text)
    }
}

/// Render caption text as markdown with raw HTML escaped.
///
/// A caption that renders to a single paragraph loses its `<p>` wrapper so it
/// sits directly inside `<figcaption>`.
fn render_inline_markdown(text: &str) -> String {
    let events = Parser::new(text).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        other => other,
    });

    let mut rendered = String::new();
    pulldown_cmark::html::push_html(&mut rendered, events);

    let trimmed = rendered.trim_end();
    if let Some(inner) = trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        && !inner.contains("<p>")
    {
        return inner.to_owned();
    }
    trimmed.to_owned()
}
