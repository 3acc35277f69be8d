//! Image tag resolution for authored content.
//!
//! Expands `(image: …)` tags into `<img>` or `<figure>` markup, optionally
//! wrapped in a link, with alt and title text resolved against file metadata.
//!
//! # Architecture
//!
//! - [`TagResolver`]: turns one tag's [`TagAttributes`] into markup
//! - [`TagProcessor`]: finds tags in text and splices resolved markup in place
//! - [`FileLookup`]: collaborator that maps locators to [`MediaFile`]s
//! - [`MarkupBackend`]: collaborator that spells elements ([`HtmlBackend`])
//! - [`ResponsiveImage`]: collaborator for sized images ([`SrcsetRenderer`])
//!
//! The resolver is a pure function of its attributes, [`ResolverConfig`] and
//! collaborators. It never fails on missing attributes; only lookup errors
//! are returned.
//!
//! # Example
//!
//! ```
//! use imageset_tag::{
//!     HtmlBackend, MemoryFiles, ResolverConfig, SrcsetRenderer, StaticFile, TagProcessor,
//!     TagResolver,
//! };
//!
//! let files = MemoryFiles::new()
//!     .with_file(StaticFile::new("photo.jpg", "/files/photo.jpg").with_alt("A photo"));
//! let backend = HtmlBackend::new("https://example.com");
//! let srcset = SrcsetRenderer::default();
//! let resolver = TagResolver::new(ResolverConfig::default(), &files, &backend, &srcset);
//!
//! let html = TagProcessor::new(resolver)
//!     .process("(image: photo.jpg caption: Nice!)")
//!     .unwrap();
//! assert_eq!(
//!     html,
//!     r#"<figure><img src="/files/photo.jpg" alt="A photo"><figcaption>Nice!</figcaption></figure>"#
//! );
//! ```

mod attrs;
mod backend;
mod fence;
mod file;
mod html;
mod parser;
mod processor;
mod resolver;
mod srcset;
mod util;

pub use attrs::{AttrName, TagAttributes, UnknownAttr};
pub use backend::{Anchor, MarkupBackend, RawImage, ResponsiveImage};
pub use file::{FileLookup, MediaFile, MemoryFiles, StaticFile};
pub use html::{HtmlBackend, escape_html};
pub use parser::parse_tag;
pub use processor::TagProcessor;
pub use resolver::{
    FALLBACK_ALT, LINK_SELF, ResolverConfig, TagResolver, alt_text, effective_size, link_href,
    merged_class, source_url, title_text, wants_figure,
};
pub use srcset::{DEFAULT_THUMB_URL, SizePreset, SrcsetRenderer, parse_widths};
pub use util::{is_url, normalize_url};
