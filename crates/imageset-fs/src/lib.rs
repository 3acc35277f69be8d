//! Filesystem file lookup for imageset.
//!
//! [`FsFileLookup`] implements [`FileLookup`] over a content directory. Tag
//! locators resolve relative to the page's directory and must stay inside the
//! content root. Alt text and titles come from YAML sidecar files
//! (`photo.jpg.yml`).
//!
//! # Example
//!
//! ```ignore
//! use imageset_fs::FsFileLookup;
//! use imageset_tag::{FileLookup, MediaFile};
//!
//! let lookup = FsFileLookup::new("content", "content/blog", "/media");
//! if let Some(file) = lookup.lookup("photo.jpg")? {
//!     println!("{} -> {}", file.filename(), file.url());
//! }
//! ```

mod yaml;

use std::io;
use std::path::{Component, Path, PathBuf};

use imageset_tag::{FileLookup, MediaFile, is_url};

use yaml::{parse_sidecar, sidecar_path};

/// Error from a filesystem lookup.
#[derive(Debug, thiserror::Error)]
pub enum FsLookupError {
    /// I/O failure other than a missing file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Malformed sidecar metadata.
    #[error("Invalid metadata in {}: {message}", path.display())]
    Metadata {
        /// Sidecar file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

impl FsLookupError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A media file found on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsFile {
    path: PathBuf,
    url: String,
    filename: String,
    alt: String,
    title: String,
}

impl FsFile {
    /// Canonical path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MediaFile for FsFile {
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

/// File lookup rooted at a content directory.
#[derive(Clone, Debug)]
pub struct FsFileLookup {
    content_dir: PathBuf,
    page_dir: PathBuf,
    base_url: String,
}

impl FsFileLookup {
    /// Create a lookup.
    ///
    /// `page_dir` is the directory of the page being processed; locators
    /// resolve relative to it. File URLs are `base_url` followed by the
    /// path relative to `content_dir`.
    pub fn new(
        content_dir: impl Into<PathBuf>,
        page_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            content_dir: content_dir.into(),
            page_dir: page_dir.into(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a locator to a canonical path inside the content root.
    ///
    /// Returns `Ok(None)` for missing files, directories and paths that
    /// escape the content root.
    fn resolve(&self, locator: &str) -> Result<Option<(PathBuf, PathBuf)>, FsLookupError> {
        let canonical_base = self
            .content_dir
            .canonicalize()
            .map_err(|e| FsLookupError::io(&self.content_dir, e))?;

        let joined = self.page_dir.join(locator);
        let canonical = match joined.canonicalize() {
            Ok(path) => path,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FsLookupError::io(&joined, e)),
        };

        let Ok(relative) = canonical.strip_prefix(&canonical_base) else {
            tracing::warn!(locator, "Image path escapes content directory");
            return Ok(None);
        };
        if !canonical.is_file() {
            return Ok(None);
        }

        let relative = relative.to_path_buf();
        Ok(Some((canonical, relative)))
    }

    fn url_for(&self, relative: &Path) -> String {
        let path = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

impl FileLookup for FsFileLookup {
    type File = FsFile;
    type Error = FsLookupError;

    fn lookup(&self, locator: &str) -> Result<Option<FsFile>, FsLookupError> {
        if locator.is_empty() || is_url(locator) {
            return Ok(None);
        }
        let Some((path, relative)) = self.resolve(locator)? else {
            return Ok(None);
        };

        let sidecar = sidecar_path(&path);
        let fields = match std::fs::read_to_string(&sidecar) {
            Ok(content) => {
                parse_sidecar(&content).map_err(|message| FsLookupError::Metadata {
                    path: sidecar.clone(),
                    message,
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => yaml::SidecarFields::default(),
            Err(e) => return Err(FsLookupError::io(&sidecar, e)),
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let url = self.url_for(&relative);
        tracing::debug!(locator, url = %url, "Resolved image file");

        Ok(Some(FsFile {
            url,
            filename,
            alt: fields.alt.unwrap_or_default(),
            title: fields.title.unwrap_or_default(),
            path,
        }))
    }
}
