//! YAML sidecar metadata.
//!
//! Each media file may have a `<file>.yml` next to it, e.g. `photo.jpg.yml`:
//!
//! ```yaml
//! alt: A red bicycle
//! title: Amsterdam, 2019
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Fields read from a sidecar file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub(crate) struct SidecarFields {
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Path of the sidecar file for `file`.
pub(crate) fn sidecar_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(".yml");
    PathBuf::from(name)
}

/// Parse sidecar YAML content.
///
/// Empty content yields empty fields.
///
/// # Errors
///
/// Returns the parser message if the YAML is malformed.
pub(crate) fn parse_sidecar(content: &str) -> Result<SidecarFields, String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(SidecarFields::default());
    }

    serde_yaml::from_str(trimmed).map_err(|e| format!("Invalid YAML: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/content/photo.jpg")),
            PathBuf::from("/content/photo.jpg.yml")
        );
    }

    #[test]
    fn test_parse_all_fields() {
        let fields = parse_sidecar("alt: A bicycle\ntitle: \"Amsterdam, 2019\"").unwrap();
        assert_eq!(fields.alt, Some("A bicycle".to_owned()));
        assert_eq!(fields.title, Some("Amsterdam, 2019".to_owned()));
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let fields = parse_sidecar("alt: A bicycle\ncredit: Jane").unwrap();
        assert_eq!(fields.alt, Some("A bicycle".to_owned()));
        assert!(fields.title.is_none());
    }

    #[test]
    fn test_parse_block_scalar() {
        let fields = parse_sidecar("alt: |\n  Two\n  lines").unwrap();
        assert_eq!(fields.alt, Some("Two\nlines".to_owned()));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_sidecar("").unwrap(), SidecarFields::default());
        assert_eq!(parse_sidecar("  \n\t ").unwrap(), SidecarFields::default());
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_sidecar("alt: [unclosed").unwrap_err();
        assert!(err.starts_with("Invalid YAML"), "{err}");
    }
}
