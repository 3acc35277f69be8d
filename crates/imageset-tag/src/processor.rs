//! Image tag expansion over authored text.
//!
//! Scans text for `(image: …)` tags, resolves each with a [`TagResolver`] and
//! splices the markup in place. Everything else passes through untouched.

use crate::attrs::AttrName;
use crate::backend::{MarkupBackend, ResponsiveImage};
use crate::fence::fenced_ranges;
use crate::file::FileLookup;
use crate::parser::find_tags;
use crate::resolver::TagResolver;

/// Expands image tags in text.
///
/// # Example
///
/// ```
/// use imageset_tag::{
///     HtmlBackend, MemoryFiles, ResolverConfig, SrcsetRenderer, StaticFile, TagProcessor,
///     TagResolver,
/// };
///
/// let files = MemoryFiles::new()
///     .with_file(StaticFile::new("photo.jpg", "/files/photo.jpg").with_alt("A photo"));
/// let backend = HtmlBackend::default();
/// let srcset = SrcsetRenderer::default();
/// let resolver = TagResolver::new(ResolverConfig::default(), &files, &backend, &srcset);
///
/// let mut processor = TagProcessor::new(resolver);
/// let output = processor.process("Look: (image: photo.jpg)").unwrap();
/// assert_eq!(output, r#"Look: <img src="/files/photo.jpg" alt="A photo">"#);
/// ```
pub struct TagProcessor<'a, L, B, R> {
    resolver: TagResolver<'a, L, B, R>,
    skip_code_fences: bool,
    warnings: Vec<String>,
}

impl<'a, L, B, R> TagProcessor<'a, L, B, R>
where
    L: FileLookup,
    B: MarkupBackend,
    R: ResponsiveImage,
{
    /// Create a processor. Tags inside fenced code blocks are skipped.
    pub fn new(resolver: TagResolver<'a, L, B, R>) -> Self {
        Self {
            resolver,
            skip_code_fences: true,
            warnings: Vec::new(),
        }
    }

    /// Expand tags inside fenced code blocks too.
    #[must_use]
    pub fn with_code_fences(mut self) -> Self {
        self.skip_code_fences = false;
        self
    }

    /// Warnings collected by previous [`process`](Self::process) calls.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Expand every image tag in `input`.
    ///
    /// Lookup failures abort processing and are returned unchanged.
    pub fn process(&mut self, input: &str) -> Result<String, L::Error> {
        let fences = if self.skip_code_fences {
            fenced_ranges(input)
        } else {
            Vec::new()
        };
        let scan = find_tags(input, &fences);

        for &offset in &scan.unclosed {
            self.warn(input, offset, "unclosed image tag left as text");
        }

        let mut output = String::with_capacity(input.len());
        let mut cursor = 0;
        let mut expanded = 0usize;

        for tag in scan.tags {
            if tag.attrs.get(AttrName::Image).is_empty() {
                self.warn(input, tag.start, "image tag without a source");
            }

            output.push_str(&input[cursor..tag.start]);
            output.push_str(&self.resolver.resolve(&tag.attrs)?);
            cursor = tag.end;
            expanded += 1;
        }
        output.push_str(&input[cursor..]);

        tracing::debug!(expanded, "Expanded image tags");
        Ok(output)
    }

    fn warn(&mut self, input: &str, offset: usize, message: &str) {
        let line = line_number(input, offset);
        tracing::warn!(line, "{message}");
        self.warnings.push(format!("line {line}: {message}"));
    }
}

/// 1-indexed line number of a byte offset.
fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
