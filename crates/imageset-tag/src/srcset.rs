//! Responsive `<img srcset>` renderer.
//!
//! Size specs are either a preset name (`hero`) or an explicit width list
//! (`320,640,1280`). Thumbnail URLs come from a template with `{url}` and
//! `{width}` placeholders; no image is resized here.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::backend::ResponsiveImage;
use crate::file::MediaFile;
use crate::html::escape_html;
use crate::resolver::FALLBACK_ALT;

/// Default thumbnail URL template.
pub const DEFAULT_THUMB_URL: &str = "{url}?width={width}";

/// A named set of candidate widths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SizePreset {
    /// Candidate widths in pixels.
    pub widths: Vec<u32>,
    /// Value of the `sizes` attribute, if any.
    pub sizes: Option<String>,
}

impl SizePreset {
    /// Create a preset from widths.
    #[must_use]
    pub fn new(widths: impl Into<Vec<u32>>) -> Self {
        Self {
            widths: widths.into(),
            sizes: None,
        }
    }

    /// Set the `sizes` attribute.
    #[must_use]
    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }
}

/// Parse an explicit width list such as `320, 640,1280`.
///
/// Returns `None` unless every entry is a positive integer.
pub fn parse_widths(spec: &str) -> Option<Vec<u32>> {
    spec.split(',')
        .map(|part| part.trim().parse::<u32>().ok().filter(|&w| w > 0))
        .collect()
}

/// Srcset renderer with named presets.
///
/// # Example
///
/// ```
/// use imageset_tag::{ResponsiveImage, SizePreset, SrcsetRenderer, StaticFile};
///
/// let renderer = SrcsetRenderer::default()
///     .with_preset("thumb", SizePreset::new([200, 400]).with_sizes("50vw"));
/// let file = StaticFile::new("a.jpg", "/a.jpg").with_alt("A");
///
/// assert_eq!(
///     renderer.render(&file, "thumb"),
///     r#"<img src="/a.jpg?width=200" srcset="/a.jpg?width=200 200w, /a.jpg?width=400 400w" sizes="50vw" alt="A">"#
/// );
/// ```
#[derive(Clone, Debug)]
pub struct SrcsetRenderer {
    presets: BTreeMap<String, SizePreset>,
    thumb_url: String,
}

impl Default for SrcsetRenderer {
    fn default() -> Self {
        Self {
            presets: BTreeMap::new(),
            thumb_url: DEFAULT_THUMB_URL.to_owned(),
        }
    }
}

impl SrcsetRenderer {
    /// Create a renderer with a thumbnail URL template.
    #[must_use]
    pub fn new(thumb_url: impl Into<String>) -> Self {
        Self {
            thumb_url: thumb_url.into(),
            ..Self::default()
        }
    }

    /// Register a named preset.
    #[must_use]
    pub fn with_preset(mut self, name: impl Into<String>, preset: SizePreset) -> Self {
        self.presets.insert(name.into(), preset);
        self
    }

    /// Look up a preset by name.
    #[must_use]
    pub fn preset(&self, name: &str) -> Option<&SizePreset> {
        self.presets.get(name)
    }

    fn thumb(&self, url: &str, width: u32) -> String {
        self.thumb_url
            .replace("{url}", url)
            .replace("{width}", &width.to_string())
    }

    fn widths_for(&self, size: &str) -> Option<(Vec<u32>, Option<&str>)> {
        if let Some(preset) = self.presets.get(size) {
            return Some((preset.widths.clone(), preset.sizes.as_deref()));
        }
        parse_widths(size).map(|widths| (widths, None))
    }
}

impl ResponsiveImage for SrcsetRenderer {
    fn render(&self, file: &dyn MediaFile, size: &str) -> String {
        let alt = if file.alt().is_empty() {
            FALLBACK_ALT
        } else {
            file.alt()
        };

        let Some((mut widths, sizes)) = self.widths_for(size).filter(|(w, _)| !w.is_empty())
        else {
            tracing::warn!(size, file = file.filename(), "Unknown size spec, emitting plain img");
            return format!(
                r#"<img src="{}" alt="{}">"#,
                escape_html(file.url()),
                escape_html(alt)
            );
        };
        widths.sort_unstable();
        widths.dedup();

        let srcset = widths
            .iter()
            .map(|&w| format!("{} {w}w", self.thumb(file.url(), w)))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::new();
        let _ = write!(
            out,
            r#"<img src="{}" srcset="{}""#,
            escape_html(&self.thumb(file.url(), widths[0])),
            escape_html(&srcset)
        );
        if let Some(sizes) = sizes {
            let _ = write!(out, r#" sizes="{}""#, escape_html(sizes));
        }
        let _ = write!(out, r#" alt="{}">"#, escape_html(alt));
        out
    }
}
