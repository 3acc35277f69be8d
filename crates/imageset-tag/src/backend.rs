//! Markup collaborator traits.
//!
//! The resolver decides *what* to emit. Backends decide *how* elements are
//! spelled: URL normalization, element rendering and caption formatting.

use crate::file::MediaFile;

/// Inputs for a plain `<img>` element.
///
/// Empty strings mean "omit the attribute", except `alt`, which the resolver
/// always fills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawImage<'a> {
    pub src: &'a str,
    pub width: &'a str,
    pub height: &'a str,
    pub class: &'a str,
    pub title: &'a str,
    pub alt: &'a str,
}

/// Inputs for an `<a>` wrapper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anchor<'a> {
    pub href: &'a str,
    pub rel: &'a str,
    pub class: &'a str,
    pub title: &'a str,
    pub target: Option<&'a str>,
}

/// Element rendering backend.
pub trait MarkupBackend {
    /// Turn a literal locator into a URL.
    fn normalize_url(&self, raw: &str) -> String;

    /// Render a plain `<img>` element.
    fn raw_image(&self, image: &RawImage<'_>) -> String;

    /// Wrap `inner` in an `<a>` element.
    fn anchor(&self, anchor: &Anchor<'_>, inner: &str) -> String;

    /// Render caption text into safe HTML for a `<figcaption>`.
    fn caption(&self, text: &str) -> String;

    /// Interpret the `target` and `popup` attributes.
    ///
    /// A non-empty `popup` opens a new window. Otherwise a non-empty `target`
    /// is used as given.
    fn target(&self, target: &str, popup: &str) -> Option<String> {
        if !popup.is_empty() {
            Some("_blank".to_owned())
        } else if !target.is_empty() {
            Some(target.to_owned())
        } else {
            None
        }
    }
}

/// Size-aware image renderer, used when a file and a size spec are both known.
pub trait ResponsiveImage {
    /// Render responsive markup for `file` at the given size spec.
    fn render(&self, file: &dyn MediaFile, size: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullBackend;

    impl MarkupBackend for NullBackend {
        fn normalize_url(&self, raw: &str) -> String {
            raw.to_owned()
        }

        fn raw_image(&self, _image: &RawImage<'_>) -> String {
            String::new()
        }

        fn anchor(&self, _anchor: &Anchor<'_>, inner: &str) -> String {
            inner.to_owned()
        }

        fn caption(&self, text: &str) -> String {
            text.to_owned()
        }
    }

    #[test]
    fn test_default_target_none() {
        assert_eq!(NullBackend.target("", ""), None);
    }

    #[test]
    fn test_default_target_explicit() {
        assert_eq!(NullBackend.target("_self", ""), Some("_self".to_owned()));
    }

    #[test]
    fn test_default_target_popup_wins() {
        assert_eq!(NullBackend.target("_self", "yes"), Some("_blank".to_owned()));
        assert_eq!(NullBackend.target("", "true"), Some("_blank".to_owned()));
    }
}
