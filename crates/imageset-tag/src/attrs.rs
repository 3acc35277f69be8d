//! Typed image tag attributes.
//!
//! Every attribute the `image` tag understands is an explicit optional field.
//! A missing attribute reads as an empty string, never as an error.

use std::fmt;
use std::str::FromStr;

/// Attribute names recognized by the `image` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrName {
    Image,
    Width,
    Height,
    Alt,
    Text,
    Title,
    Class,
    ImgClass,
    LinkClass,
    Caption,
    Link,
    Target,
    Popup,
    Rel,
    Site,
    Size,
}

impl AttrName {
    /// All recognized names, the tag name (`image`) first.
    pub const ALL: [Self; 16] = [
        Self::Image,
        Self::Width,
        Self::Height,
        Self::Alt,
        Self::Text,
        Self::Title,
        Self::Class,
        Self::ImgClass,
        Self::LinkClass,
        Self::Caption,
        Self::Link,
        Self::Target,
        Self::Popup,
        Self::Rel,
        Self::Site,
        Self::Size,
    ];

    /// Name as written in tag syntax.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Width => "width",
            Self::Height => "height",
            Self::Alt => "alt",
            Self::Text => "text",
            Self::Title => "title",
            Self::Class => "class",
            Self::ImgClass => "imgclass",
            Self::LinkClass => "linkclass",
            Self::Caption => "caption",
            Self::Link => "link",
            Self::Target => "target",
            Self::Popup => "popup",
            Self::Rel => "rel",
            Self::Site => "site",
            Self::Size => "size",
        }
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for attribute names the tag does not recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAttr(pub String);

impl FromStr for AttrName {
    type Err = UnknownAttr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAttr(s.to_owned()))
    }
}

/// Attributes of a single `image` tag invocation.
///
/// # Example
///
/// ```
/// use imageset_tag::{AttrName, TagAttributes};
///
/// let attrs = TagAttributes::from_pairs([
///     ("image", "photo.jpg"),
///     ("caption", "Nice!"),
///     ("unknown", "ignored"),
/// ]);
///
/// assert_eq!(attrs.get(AttrName::Image), "photo.jpg");
/// assert_eq!(attrs.get(AttrName::Caption), "Nice!");
/// assert_eq!(attrs.get(AttrName::Alt), "");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagAttributes {
    /// Source locator: a file name known to the lookup, or a URL.
    pub image: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub alt: Option<String>,
    /// Overrides `alt` when set.
    pub text: Option<String>,
    pub title: Option<String>,
    /// Generic class: the figure's class, or merged into the image class.
    pub class: Option<String>,
    pub imgclass: Option<String>,
    pub linkclass: Option<String>,
    pub caption: Option<String>,
    /// `self`, a file name, or a URL.
    pub link: Option<String>,
    pub target: Option<String>,
    pub popup: Option<String>,
    pub rel: Option<String>,
    /// Accepted for compatibility. Has no effect on output.
    pub site: Option<String>,
    /// Responsive size spec. Falls back to the configured default.
    pub size: Option<String>,
}

impl TagAttributes {
    /// Create attributes for an image locator.
    #[must_use]
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..Self::default()
        }
    }

    /// Build attributes from `(name, value)` pairs, ignoring unknown names.
    ///
    /// Later pairs override earlier ones.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut attrs = Self::default();
        for (key, value) in pairs {
            if let Ok(name) = key.as_ref().parse::<AttrName>() {
                attrs.set(name, value);
            }
        }
        attrs
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, name: AttrName, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an attribute value.
    pub fn set(&mut self, name: AttrName, value: impl Into<String>) {
        *self.slot_mut(name) = Some(value.into());
    }

    /// Get an attribute value, empty if unset.
    #[must_use]
    pub fn get(&self, name: AttrName) -> &str {
        self.slot(name).as_deref().unwrap_or_default()
    }

    fn slot(&self, name: AttrName) -> &Option<String> {
        match name {
            AttrName::Image => &self.image,
            AttrName::Width => &self.width,
            AttrName::Height => &self.height,
            AttrName::Alt => &self.alt,
            AttrName::Text => &self.text,
            AttrName::Title => &self.title,
            AttrName::Class => &self.class,
            AttrName::ImgClass => &self.imgclass,
            AttrName::LinkClass => &self.linkclass,
            AttrName::Caption => &self.caption,
            AttrName::Link => &self.link,
            AttrName::Target => &self.target,
            AttrName::Popup => &self.popup,
            AttrName::Rel => &self.rel,
            AttrName::Site => &self.site,
            AttrName::Size => &self.size,
        }
    }

    fn slot_mut(&mut self, name: AttrName) -> &mut Option<String> {
        match name {
            AttrName::Image => &mut self.image,
            AttrName::Width => &mut self.width,
            AttrName::Height => &mut self.height,
            AttrName::Alt => &mut self.alt,
            AttrName::Text => &mut self.text,
            AttrName::Title => &mut self.title,
            AttrName::Class => &mut self.class,
            AttrName::ImgClass => &mut self.imgclass,
            AttrName::LinkClass => &mut self.linkclass,
            AttrName::Caption => &mut self.caption,
            AttrName::Link => &mut self.link,
            AttrName::Target => &mut self.target,
            AttrName::Popup => &mut self.popup,
            AttrName::Rel => &mut self.rel,
            AttrName::Site => &mut self.site,
            AttrName::Size => &mut self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reads_empty() {
        let attrs = TagAttributes::default();
        for name in AttrName::ALL {
            assert_eq!(attrs.get(name), "", "{name} should read as empty");
        }
    }

    #[test]
    fn test_parse_name_case_insensitive() {
        assert_eq!("ImgClass".parse::<AttrName>(), Ok(AttrName::ImgClass));
        assert_eq!("CAPTION".parse::<AttrName>(), Ok(AttrName::Caption));
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(
            "loading".parse::<AttrName>(),
            Err(UnknownAttr("loading".to_owned()))
        );
    }

    #[test]
    fn test_from_pairs_ignores_unknown() {
        let attrs = TagAttributes::from_pairs([("image", "a.jpg"), ("loading", "lazy")]);
        assert_eq!(attrs, TagAttributes::new("a.jpg"));
    }

    #[test]
    fn test_from_pairs_last_wins() {
        let attrs = TagAttributes::from_pairs([("alt", "first"), ("alt", "second")]);
        assert_eq!(attrs.get(AttrName::Alt), "second");
    }

    #[test]
    fn test_with_sets_field() {
        let attrs = TagAttributes::new("a.jpg")
            .with(AttrName::ImgClass, "rounded")
            .with(AttrName::LinkClass, "lightbox");
        assert_eq!(attrs.imgclass.as_deref(), Some("rounded"));
        assert_eq!(attrs.linkclass.as_deref(), Some("lightbox"));
    }

    #[test]
    fn test_name_round_trips_through_display() {
        for name in AttrName::ALL {
            assert_eq!(name.to_string().parse::<AttrName>(), Ok(name));
        }
    }
}
