//! File lookup collaborator.
//!
//! The resolver never locates files itself. A [`FileLookup`] maps a locator
//! from tag syntax (`photo.jpg`, `gallery/photo.jpg`) to a [`MediaFile`].

use std::collections::HashMap;
use std::convert::Infallible;

/// A located media file.
pub trait MediaFile {
    /// Public URL of the file.
    fn url(&self) -> &str;

    /// File name, e.g. `photo.jpg`.
    fn filename(&self) -> &str;

    /// Alt text from the file's metadata, empty if none.
    fn alt(&self) -> &str;

    /// Title from the file's metadata, empty if none.
    fn title(&self) -> &str;
}

/// Resolves tag locators to media files.
///
/// Returning `Ok(None)` means the locator is not a known file and the caller
/// treats it as a literal URL. Errors are reserved for lookup failures (I/O,
/// malformed metadata) and are propagated to the caller unchanged.
pub trait FileLookup {
    /// The file type produced by this lookup.
    type File: MediaFile;
    /// Lookup failure.
    type Error;

    /// Look up a file by locator.
    fn lookup(&self, locator: &str) -> Result<Option<Self::File>, Self::Error>;
}

/// Plain in-memory media file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticFile {
    pub url: String,
    pub filename: String,
    pub alt: String,
    pub title: String,
}

impl StaticFile {
    /// Create a file with no metadata.
    #[must_use]
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Set the alt text.
    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl MediaFile for StaticFile {
    fn url(&self) -> &str {
        &self.url
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn alt(&self) -> &str {
        &self.alt
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// In-memory lookup keyed by locator.
///
/// # Example
///
/// ```
/// use imageset_tag::{FileLookup, MediaFile, MemoryFiles, StaticFile};
///
/// let files = MemoryFiles::new()
///     .with_file(StaticFile::new("photo.jpg", "/files/photo.jpg").with_alt("A photo"));
///
/// let file = files.lookup("photo.jpg").unwrap().unwrap();
/// assert_eq!(file.url(), "/files/photo.jpg");
/// assert!(files.lookup("missing.jpg").unwrap().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryFiles {
    files: HashMap<String, StaticFile>,
}

impl MemoryFiles {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file under its file name.
    #[must_use]
    pub fn with_file(self, file: StaticFile) -> Self {
        let locator = file.filename.clone();
        self.with_locator(locator, file)
    }

    /// Register a file under an explicit locator.
    #[must_use]
    pub fn with_locator(mut self, locator: impl Into<String>, file: StaticFile) -> Self {
        self.files.insert(locator.into(), file);
        self
    }
}

impl FileLookup for MemoryFiles {
    type File = StaticFile;
    type Error = Infallible;

    fn lookup(&self, locator: &str) -> Result<Option<StaticFile>, Infallible> {
        Ok(self.files.get(locator).cloned())
    }
}
