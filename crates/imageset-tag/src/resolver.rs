//! Image tag resolution.
//!
//! Turns [`TagAttributes`] plus an optional looked-up file into final markup.
//! Each precedence rule is a standalone function so it can be checked in
//! isolation; [`TagResolver::resolve`] chains them.

use std::borrow::Cow;
use std::fmt::Write;

use crate::attrs::{AttrName, TagAttributes};
use crate::backend::{Anchor, MarkupBackend, RawImage, ResponsiveImage};
use crate::file::{FileLookup, MediaFile};
use crate::html::escape_html;

/// Alt text used when nothing better is known.
pub const FALLBACK_ALT: &str = " ";

/// Link value that points back at the displayed image.
pub const LINK_SELF: &str = "self";

/// Site-wide tag settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Wrap every image in a `<figure>`, not only captioned ones.
    pub figure: bool,
    /// Size spec used when a tag has no `size` attribute.
    pub default_size: Option<String>,
}

/// URL of the displayed image: the file's URL, or the normalized locator.
pub fn source_url(
    image: &str,
    file: Option<&dyn MediaFile>,
    backend: &impl MarkupBackend,
) -> String {
    match file {
        Some(file) => file.url().to_owned(),
        None => backend.normalize_url(image),
    }
}

/// Alt text: `text`, then `alt`, then the file's alt, then [`FALLBACK_ALT`].
pub fn alt_text<'a>(attrs: &'a TagAttributes, file: Option<&'a dyn MediaFile>) -> &'a str {
    [attrs.get(AttrName::Text), attrs.get(AttrName::Alt)]
        .into_iter()
        .chain(file.map(|f| f.alt()))
        .find(|s| !s.is_empty())
        .unwrap_or(FALLBACK_ALT)
}

/// Title: `title`, then the file's title. Empty when neither is set.
pub fn title_text<'a>(attrs: &'a TagAttributes, file: Option<&'a dyn MediaFile>) -> &'a str {
    let title = attrs.get(AttrName::Title);
    if !title.is_empty() {
        return title;
    }
    file.map(|f| f.title()).unwrap_or_default()
}

/// Link target before URL normalization. `None` when `link` is empty.
///
/// `self` links to the displayed image, the displayed file's own name links to
/// that file's URL, another known file links to its URL, and anything else
/// is taken literally.
pub fn link_href<L: FileLookup>(
    link: &str,
    source_url: &str,
    file: Option<&dyn MediaFile>,
    lookup: &L,
) -> Result<Option<String>, L::Error> {
    if link.is_empty() {
        return Ok(None);
    }
    if link == LINK_SELF {
        return Ok(Some(source_url.to_owned()));
    }
    if let Some(file) = file
        && link == file.filename()
    {
        return Ok(Some(file.url().to_owned()));
    }
    if let Some(other) = lookup.lookup(link)? {
        return Ok(Some(other.url().to_owned()));
    }
    Ok(Some(link.to_owned()))
}

/// Image class outside a figure: `class` and `imgclass` joined, then trimmed.
///
/// Classes are not de-duplicated.
pub fn merged_class(class: &str, imgclass: &str) -> String {
    format!("{class} {imgclass}").trim().to_owned()
}

/// Whether the output is wrapped in a `<figure>`.
pub fn wants_figure(config: &ResolverConfig, attrs: &TagAttributes) -> bool {
    config.figure || !attrs.get(AttrName::Caption).is_empty()
}

/// Size spec: the `size` attribute, else the configured default.
pub fn effective_size<'a>(attrs: &'a TagAttributes, config: &'a ResolverConfig) -> &'a str {
    let size = attrs.get(AttrName::Size);
    if size.is_empty() {
        config.default_size.as_deref().unwrap_or_default()
    } else {
        size
    }
}

/// A looked-up file with the tag's resolved alt and title in place of its own.
struct ResolvedFile<'a> {
    file: &'a dyn MediaFile,
    alt: &'a str,
    title: &'a str,
}

impl MediaFile for ResolvedFile<'_> {
    fn url(&self) -> &str {
        self.file.url()
    }

    fn filename(&self) -> &str {
        self.file.filename()
    }

    fn alt(&self) -> &str {
        self.alt
    }

    fn title(&self) -> &str {
        self.title
    }
}

/// Resolves image tags against a file lookup and markup collaborators.
///
/// # Example
///
/// ```
/// use imageset_tag::{
///     AttrName, HtmlBackend, MemoryFiles, ResolverConfig, SrcsetRenderer, StaticFile,
///     TagAttributes, TagResolver,
/// };
///
/// let files = MemoryFiles::new()
///     .with_file(StaticFile::new("photo.jpg", "/files/photo.jpg").with_alt("A photo"));
/// let backend = HtmlBackend::new("https://example.com");
/// let srcset = SrcsetRenderer::default();
/// let resolver = TagResolver::new(ResolverConfig::default(), &files, &backend, &srcset);
///
/// let attrs = TagAttributes::new("photo.jpg").with(AttrName::Link, "self");
/// let html = resolver.resolve(&attrs).unwrap();
/// assert_eq!(
///     html,
///     r#"<a href="/files/photo.jpg"><img src="/files/photo.jpg" alt="A photo"></a>"#
/// );
/// ```
pub struct TagResolver<'a, L, B, R> {
    config: ResolverConfig,
    lookup: &'a L,
    backend: &'a B,
    responsive: &'a R,
}

impl<'a, L, B, R> TagResolver<'a, L, B, R>
where
    L: FileLookup,
    B: MarkupBackend,
    R: ResponsiveImage,
{
    /// Create a resolver.
    pub fn new(config: ResolverConfig, lookup: &'a L, backend: &'a B, responsive: &'a R) -> Self {
        Self {
            config,
            lookup,
            backend,
            responsive,
        }
    }

    /// Resolve one tag invocation to markup.
    ///
    /// Never fails on missing or empty attributes. Errors come only from the
    /// file lookup and are returned unchanged.
    pub fn resolve(&self, attrs: &TagAttributes) -> Result<String, L::Error> {
        let image = attrs.get(AttrName::Image);
        let file = if image.is_empty() {
            None
        } else {
            self.lookup.lookup(image)?
        };
        let file = file.as_ref().map(|f| f as &dyn MediaFile);

        let url = source_url(image, file, self.backend);
        let alt = alt_text(attrs, file);
        let title = title_text(attrs, file);
        let href = link_href(attrs.get(AttrName::Link), &url, file, self.lookup)?
            .map(|href| self.backend.normalize_url(&href));

        tracing::debug!(
            image,
            resolved = file.is_some(),
            linked = href.is_some(),
            "Resolving image tag"
        );

        let figure = wants_figure(&self.config, attrs);
        let class = if figure {
            Cow::Borrowed(attrs.get(AttrName::ImgClass))
        } else {
            Cow::Owned(merged_class(
                attrs.get(AttrName::Class),
                attrs.get(AttrName::ImgClass),
            ))
        };

        let img = self.image(attrs, file, &url, &class, title, alt);
        let linked = match href {
            Some(href) => self.link(attrs, &href, title, &img),
            None => img,
        };

        if figure {
            Ok(self.figure(attrs, &linked))
        } else {
            Ok(linked)
        }
    }

    fn image(
        &self,
        attrs: &TagAttributes,
        file: Option<&dyn MediaFile>,
        url: &str,
        class: &str,
        title: &str,
        alt: &str,
    ) -> String {
        let size = effective_size(attrs, &self.config);
        if let Some(file) = file
            && !size.is_empty()
        {
            let resolved = ResolvedFile { file, alt, title };
            return self.responsive.render(&resolved, size);
        }
        if file.is_none() && !size.is_empty() {
            tracing::debug!(size, "Size given for unresolved image, emitting plain img");
        }

        self.backend.raw_image(&RawImage {
            src: url,
            width: attrs.get(AttrName::Width),
            height: attrs.get(AttrName::Height),
            class,
            title,
            alt,
        })
    }

    fn link(&self, attrs: &TagAttributes, href: &str, title: &str, inner: &str) -> String {
        let target = self
            .backend
            .target(attrs.get(AttrName::Target), attrs.get(AttrName::Popup));
        self.backend.anchor(
            &Anchor {
                href,
                rel: attrs.get(AttrName::Rel),
                class: attrs.get(AttrName::LinkClass),
                title,
                target: target.as_deref(),
            },
            inner,
        )
    }

    fn figure(&self, attrs: &TagAttributes, inner: &str) -> String {
        let mut out = String::from("<figure");
        let class = attrs.get(AttrName::Class);
        if !class.is_empty() {
            let _ = write!(out, r#" class="{}""#, escape_html(class));
        }
        out.push('>');
        out.push_str(inner);

        let caption = attrs.get(AttrName::Caption);
        if !caption.is_empty() {
            let _ = write!(
                out,
                "<figcaption>{}</figcaption>",
                self.backend.caption(caption)
            );
        }

        out.push_str("</figure>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{MemoryFiles, StaticFile};
    use crate::html::HtmlBackend;
    use crate::srcset::SrcsetRenderer;
    use pretty_assertions::assert_eq;

    struct StubResponsive;

    impl ResponsiveImage for StubResponsive {
        fn render(&self, file: &dyn MediaFile, size: &str) -> String {
            format!(r#"<picture data-size="{size}" data-src="{}"></picture>"#, file.url())
        }
    }

    fn files() -> MemoryFiles {
        MemoryFiles::new()
            .with_file(StaticFile::new("photo.jpg", "/files/photo.jpg").with_alt("A photo"))
            .with_file(StaticFile::new("other.jpg", "/files/other.jpg"))
            .with_file(
                StaticFile::new("titled.jpg", "/files/titled.jpg")
                    .with_alt("File alt")
                    .with_title("File title"),
            )
    }

    fn render(config: ResolverConfig, attrs: &TagAttributes) -> String {
        let files = files();
        let backend = HtmlBackend::new("https://example.com");
        let resolver = TagResolver::new(config, &files, &backend, &StubResponsive);
        resolver.resolve(attrs).unwrap()
    }

    fn render_default(attrs: &TagAttributes) -> String {
        render(ResolverConfig::default(), attrs)
    }

    // ── precedence functions ─────────────────────────────────────────

    #[test]
    fn test_alt_text_prefers_text() {
        let file = StaticFile::new("a.jpg", "/a.jpg").with_alt("file alt");
        let attrs = TagAttributes::new("a.jpg")
            .with(AttrName::Text, "text wins")
            .with(AttrName::Alt, "explicit alt");
        assert_eq!(alt_text(&attrs, Some(&file)), "text wins");
    }

    #[test]
    fn test_alt_text_explicit_over_file() {
        let file = StaticFile::new("a.jpg", "/a.jpg").with_alt("file alt");
        let attrs = TagAttributes::new("a.jpg").with(AttrName::Alt, "explicit alt");
        assert_eq!(alt_text(&attrs, Some(&file)), "explicit alt");
    }

    #[test]
    fn test_alt_text_from_file() {
        let file = StaticFile::new("a.jpg", "/a.jpg").with_alt("file alt");
        assert_eq!(alt_text(&TagAttributes::new("a.jpg"), Some(&file)), "file alt");
    }

    #[test]
    fn test_alt_text_fallback_is_single_space() {
        let attrs = TagAttributes::new("a.jpg");
        assert_eq!(alt_text(&attrs, None), " ");

        let file = StaticFile::new("a.jpg", "/a.jpg");
        assert_eq!(alt_text(&attrs, Some(&file)), " ");
    }

    #[test]
    fn test_title_text_precedence() {
        let file = StaticFile::new("a.jpg", "/a.jpg").with_title("file title");
        let explicit = TagAttributes::new("a.jpg").with(AttrName::Title, "explicit");
        assert_eq!(title_text(&explicit, Some(&file)), "explicit");
        assert_eq!(title_text(&TagAttributes::new("a.jpg"), Some(&file)), "file title");
        assert_eq!(title_text(&TagAttributes::new("a.jpg"), None), "");
    }

    #[test]
    fn test_link_href_empty_is_none() {
        let href = link_href("", "/a.jpg", None, &files()).unwrap();
        assert_eq!(href, None);
    }

    #[test]
    fn test_link_href_self() {
        let href = link_href("self", "/a.jpg", None, &files()).unwrap();
        assert_eq!(href.as_deref(), Some("/a.jpg"));
    }

    #[test]
    fn test_link_href_own_filename() {
        let file = StaticFile::new("big.jpg", "/files/big.jpg");
        let href = link_href("big.jpg", "/thumbs/big-300.jpg", Some(&file), &files()).unwrap();
        assert_eq!(href.as_deref(), Some("/files/big.jpg"));
    }

    #[test]
    fn test_link_href_other_file() {
        let href = link_href("other.jpg", "/a.jpg", None, &files()).unwrap();
        assert_eq!(href.as_deref(), Some("/files/other.jpg"));
    }

    #[test]
    fn test_link_href_literal() {
        let href = link_href("https://example.org", "/a.jpg", None, &files()).unwrap();
        assert_eq!(href.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_merged_class() {
        assert_eq!(merged_class("", ""), "");
        assert_eq!(merged_class("wide", ""), "wide");
        assert_eq!(merged_class("", "rounded"), "rounded");
        assert_eq!(merged_class("wide", "rounded"), "wide rounded");
    }

    #[test]
    fn test_merged_class_keeps_duplicates() {
        assert_eq!(merged_class("shadow", "shadow"), "shadow shadow");
    }

    #[test]
    fn test_effective_size_default() {
        let config = ResolverConfig {
            default_size: Some("default".to_owned()),
            ..ResolverConfig::default()
        };
        let attrs = TagAttributes::new("a.jpg");
        assert_eq!(effective_size(&attrs, &config), "default");

        let attrs = attrs.with(AttrName::Size, "hero");
        assert_eq!(effective_size(&attrs, &config), "hero");
    }

    // ── full resolution ──────────────────────────────────────────────

    #[test]
    fn test_resolved_file_plain_img() {
        let html = render_default(&TagAttributes::new("photo.jpg"));
        assert_eq!(html, r#"<img src="/files/photo.jpg" alt="A photo">"#);
    }

    #[test]
    fn test_unresolved_image_normalized() {
        let html = render_default(&TagAttributes::new("missing.jpg"));
        assert_eq!(html, r#"<img src="https://example.com/missing.jpg" alt=" ">"#);
    }

    #[test]
    fn test_empty_attributes_never_fail() {
        let html = render_default(&TagAttributes::default());
        assert_eq!(html, r#"<img src="" alt=" ">"#);
    }

    #[test]
    fn test_text_overrides_alt_and_file() {
        let attrs = TagAttributes::new("photo.jpg")
            .with(AttrName::Alt, "explicit")
            .with(AttrName::Text, "from text");
        let html = render_default(&attrs);
        assert!(html.contains(r#"alt="from text""#), "{html}");
    }

    #[test]
    fn test_file_title_on_image() {
        let html = render_default(&TagAttributes::new("titled.jpg"));
        assert_eq!(
            html,
            r#"<img src="/files/titled.jpg" alt="File alt" title="File title">"#
        );
    }

    #[test]
    fn test_no_link_no_anchor() {
        let attrs = TagAttributes::new("photo.jpg")
            .with(AttrName::Rel, "lightbox")
            .with(AttrName::LinkClass, "zoom")
            .with(AttrName::Popup, "yes");
        let html = render_default(&attrs);
        assert!(!html.contains("<a"), "{html}");
    }

    #[test]
    fn test_link_self_matches_source() {
        let attrs = TagAttributes::new("missing.jpg").with(AttrName::Link, "self");
        let html = render_default(&attrs);
        assert_eq!(
            html,
            r#"<a href="https://example.com/missing.jpg"><img src="https://example.com/missing.jpg" alt=" "></a>"#
        );
    }

    #[test]
    fn test_link_other_file() {
        let attrs = TagAttributes::new("photo.jpg").with(AttrName::Link, "other.jpg");
        let html = render_default(&attrs);
        assert_eq!(
            html,
            r#"<a href="/files/other.jpg"><img src="/files/photo.jpg" alt="A photo"></a>"#
        );
    }

    #[test]
    fn test_link_literal_normalized() {
        let attrs = TagAttributes::new("photo.jpg").with(AttrName::Link, "about");
        let html = render_default(&attrs);
        assert!(html.starts_with(r#"<a href="https://example.com/about">"#), "{html}");
    }

    #[test]
    fn test_anchor_attributes_and_title_reuse() {
        let attrs = TagAttributes::new("titled.jpg")
            .with(AttrName::Link, "self")
            .with(AttrName::Rel, "lightbox")
            .with(AttrName::LinkClass, "zoom")
            .with(AttrName::Target, "_top");
        let html = render_default(&attrs);
        assert_eq!(
            html,
            r#"<a href="/files/titled.jpg" rel="lightbox" class="zoom" title="File title" target="_top"><img src="/files/titled.jpg" alt="File alt" title="File title"></a>"#
        );
    }

    #[test]
    fn test_popup_opens_blank() {
        let attrs = TagAttributes::new("photo.jpg")
            .with(AttrName::Link, "self")
            .with(AttrName::Popup, "yes");
        let html = render_default(&attrs);
        assert!(html.contains(r#"target="_blank""#), "{html}");
    }

    #[test]
    fn test_classes_merged_without_figure() {
        let attrs = TagAttributes::new("photo.jpg")
            .with(AttrName::Class, " wide ")
            .with(AttrName::ImgClass, "rounded");
        let html = render_default(&attrs);
        assert!(html.contains(r#"class="wide  rounded""#), "{html}");
    }

    #[test]
    fn test_caption_builds_figure() {
        let attrs = TagAttributes::new("photo.jpg")
            .with(AttrName::Caption, "Nice!")
            .with(AttrName::Link, "self");
        let html = render_default(&attrs);
        assert_eq!(
            html,
            r#"<figure><a href="/files/photo.jpg"><img src="/files/photo.jpg" alt="A photo"></a><figcaption>Nice!</figcaption></figure>"#
        );
        assert_eq!(html.matches("<figcaption>").count(), 1);
    }

    #[test]
    fn test_figure_classes_split() {
        let attrs = TagAttributes::new("photo.jpg")
            .with(AttrName::Caption, "Nice!")
            .with(AttrName::Class, "wide")
            .with(AttrName::ImgClass, "rounded");
        let html = render_default(&attrs);
        assert_eq!(
            html,
            r#"<figure class="wide"><img src="/files/photo.jpg" alt="A photo" class="rounded"><figcaption>Nice!</figcaption></figure>"#
        );
    }

    #[test]
    fn test_caption_escaped() {
        let attrs = TagAttributes::new("photo.jpg").with(AttrName::Caption, "Fish & <b>Chips</b>");
        let html = render_default(&attrs);
        assert!(
            html.contains("<figcaption>Fish &amp; &lt;b&gt;Chips&lt;/b&gt;</figcaption>"),
            "{html}"
        );
    }

    #[test]
    fn test_figure_mode_without_caption() {
        let config = ResolverConfig {
            figure: true,
            ..ResolverConfig::default()
        };
        let html = render(config, &TagAttributes::new("photo.jpg"));
        assert_eq!(
            html,
            r#"<figure><img src="/files/photo.jpg" alt="A photo"></figure>"#
        );
    }

    #[test]
    fn test_no_caption_no_figure() {
        let html = render_default(&TagAttributes::new("photo.jpg").with(AttrName::Class, "wide"));
        assert!(!html.contains("<figure"), "{html}");
    }

    #[test]
    fn test_size_uses_responsive_renderer() {
        let attrs = TagAttributes::new("photo.jpg").with(AttrName::Size, "hero");
        let html = render_default(&attrs);
        assert_eq!(
            html,
            r#"<picture data-size="hero" data-src="/files/photo.jpg"></picture>"#
        );
    }

    #[test]
    fn test_default_size_uses_responsive_renderer() {
        let config = ResolverConfig {
            default_size: Some("default".to_owned()),
            ..ResolverConfig::default()
        };
        let html = render(config, &TagAttributes::new("photo.jpg"));
        assert!(html.starts_with(r#"<picture data-size="default""#), "{html}");
    }

    #[test]
    fn test_responsive_image_gets_resolved_alt_and_title() {
        let files = files();
        let backend = HtmlBackend::default();
        let srcset = SrcsetRenderer::default();
        let config = ResolverConfig {
            default_size: Some("320,640".to_owned()),
            ..ResolverConfig::default()
        };
        let resolver = TagResolver::new(config, &files, &backend, &srcset);

        let attrs = TagAttributes::new("photo.jpg")
            .with(AttrName::Text, "From text")
            .with(AttrName::Alt, "From alt");
        assert_eq!(
            resolver.resolve(&attrs).unwrap(),
            r#"<img src="/files/photo.jpg?width=320" srcset="/files/photo.jpg?width=320 320w, /files/photo.jpg?width=640 640w" alt="From text">"#
        );

        let html = resolver
            .resolve(&TagAttributes::new("titled.jpg").with(AttrName::Alt, "Tag alt"))
            .unwrap();
        assert!(html.ends_with(r#" alt="Tag alt">"#), "{html}");
    }

    #[test]
    fn test_responsive_image_sees_resolved_title() {
        struct EchoMetadata;

        impl ResponsiveImage for EchoMetadata {
            fn render(&self, file: &dyn MediaFile, _size: &str) -> String {
                format!("{}|{}|{}", file.filename(), file.alt(), file.title())
            }
        }

        let files = files();
        let backend = HtmlBackend::default();
        let resolver =
            TagResolver::new(ResolverConfig::default(), &files, &backend, &EchoMetadata);

        let attrs = TagAttributes::new("titled.jpg").with(AttrName::Size, "hero");
        assert_eq!(
            resolver.resolve(&attrs).unwrap(),
            "titled.jpg|File alt|File title"
        );

        let attrs = attrs.with(AttrName::Title, "Tag title");
        assert_eq!(
            resolver.resolve(&attrs).unwrap(),
            "titled.jpg|File alt|Tag title"
        );
    }

    #[test]
    fn test_size_without_file_plain_img() {
        let attrs = TagAttributes::new("https://cdn.test/a.jpg").with(AttrName::Size, "hero");
        let html = render_default(&attrs);
        assert_eq!(html, r#"<img src="https://cdn.test/a.jpg" alt=" ">"#);
    }

    #[test]
    fn test_responsive_inside_link_and_figure() {
        let attrs = TagAttributes::new("photo.jpg")
            .with(AttrName::Size, "hero")
            .with(AttrName::Link, "photo.jpg")
            .with(AttrName::Caption, "Nice!");
        let html = render_default(&attrs);
        assert_eq!(
            html,
            r#"<figure><a href="/files/photo.jpg"><picture data-size="hero" data-src="/files/photo.jpg"></picture></a><figcaption>Nice!</figcaption></figure>"#
        );
    }

    #[test]
    fn test_lookup_error_propagates() {
        struct FailingLookup;

        impl FileLookup for FailingLookup {
            type File = StaticFile;
            type Error = String;

            fn lookup(&self, locator: &str) -> Result<Option<StaticFile>, String> {
                Err(format!("cannot read {locator}"))
            }
        }

        let backend = HtmlBackend::default();
        let resolver = TagResolver::new(
            ResolverConfig::default(),
            &FailingLookup,
            &backend,
            &StubResponsive,
        );
        let err = resolver.resolve(&TagAttributes::new("a.jpg")).unwrap_err();
        assert_eq!(err, "cannot read a.jpg");
    }
}
