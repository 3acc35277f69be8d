//! Image tag syntax parsing.
//!
//! Parses `(image: photo.jpg alt: A photo caption: Nice!)`. A key starts at a
//! recognized attribute name followed by `:` and preceded by whitespace; its
//! value runs to the next key. Anything else, including `https:` inside a
//! URL, stays part of the current value.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::attrs::{AttrName, TagAttributes};

static TAG_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\(image:").unwrap());

static ATTR_KEY: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<&str> = AttrName::ALL.iter().map(|name| name.as_str()).collect();
    Regex::new(&format!(r"(?i)(?:^|\s)({}):", names.join("|"))).unwrap()
});

/// A tag located in a larger text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagMatch {
    /// Byte offset of the opening `(`.
    pub start: usize,
    /// Byte offset just past the closing `)`.
    pub end: usize,
    pub attrs: TagAttributes,
}

/// Result of scanning a text for image tags.
#[derive(Debug, Default)]
pub(crate) struct Scan {
    /// Complete tags, in order of appearance.
    pub tags: Vec<TagMatch>,
    /// Byte offsets of tag openings without a matching `)`.
    pub unclosed: Vec<usize>,
}

/// Find all image tags in `text`, in order.
///
/// Openings inside a `skip` range are ignored, and a tag may not close past
/// the start of the next skipped range. A tag without a matching `)` is
/// recorded in [`Scan::unclosed`] and left in the text.
pub(crate) fn find_tags(text: &str, skip: &[Range<usize>]) -> Scan {
    let mut scan = Scan::default();
    let mut cursor = 0;

    while let Some(open) = TAG_START.find_at(text, cursor) {
        let start = open.start();
        if skip.iter().any(|r| r.contains(&start)) {
            cursor = open.end();
            continue;
        }

        let limit = skip
            .iter()
            .map(|r| r.start)
            .filter(|&s| s > start)
            .min()
            .unwrap_or(text.len());
        match matching_paren(&text[start..limit]) {
            Some(close) => {
                let end = start + close + 1;
                scan.tags.push(TagMatch {
                    start,
                    end,
                    attrs: parse_body(&text[start + 1..end - 1]),
                });
                cursor = end;
            }
            None => {
                scan.unclosed.push(start);
                cursor = open.end();
            }
        }
    }

    scan
}

/// Parse a single complete tag, `(image: …)`.
///
/// Returns `None` if `tag` is not exactly one image tag.
///
/// # Example
///
/// ```
/// use imageset_tag::{AttrName, parse_tag};
///
/// let attrs = parse_tag("(image: photo.jpg link: https://example.com caption: Nice!)").unwrap();
/// assert_eq!(attrs.get(AttrName::Image), "photo.jpg");
/// assert_eq!(attrs.get(AttrName::Link), "https://example.com");
/// assert_eq!(attrs.get(AttrName::Caption), "Nice!");
/// ```
pub fn parse_tag(tag: &str) -> Option<TagAttributes> {
    let tag = tag.trim();
    let open = TAG_START.find(tag)?;
    if open.start() != 0 || matching_paren(tag)? + 1 != tag.len() {
        return None;
    }
    Some(parse_body(&tag[1..tag.len() - 1]))
}

/// Split the text between the parentheses into attributes.
fn parse_body(body: &str) -> TagAttributes {
    // (name, offset where the key begins, offset where its value begins)
    let keys: Vec<_> = ATTR_KEY
        .captures_iter(body)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().parse::<AttrName>().ok()?;
            let whole = caps.get(0)?;
            Some((name, whole.start(), whole.end()))
        })
        .collect();

    let mut attrs = TagAttributes::default();
    for (i, &(name, _, value_start)) in keys.iter().enumerate() {
        let value_end = keys.get(i + 1).map_or(body.len(), |&(_, next, _)| next);
        attrs.set(name, body[value_start..value_end].trim());
    }
    attrs
}

/// Find the `)` matching the `(` at the start of `s`, allowing nesting.
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
