//! Configuration management for imageset.
//!
//! Parses `imageset.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.url`
//! - `thumbs.url`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site base URL.
    pub site_url: Option<String>,
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override figure wrapping.
    pub figure: Option<bool>,
    /// Override default size spec.
    pub default_size: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "imageset.toml";

/// Default thumbnail URL template.
const DEFAULT_THUMB_URL: &str = "{url}?width={width}";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Image tag behavior.
    pub tag: TagConfig,
    /// Thumbnail URL settings.
    pub thumbs: ThumbsConfig,
    /// Named size presets.
    pub sizes: BTreeMap<String, SizeConfig>,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    url: Option<String>,
    content_dir: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Base URL that relative image and link locators are joined onto.
    pub url: String,
    /// Root directory that image files are looked up under.
    pub content_dir: PathBuf,
}

/// Image tag configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Wrap every image in a `<figure>`.
    pub figure: bool,
    /// Size spec used when a tag has no `size` attribute.
    pub default_size: Option<String>,
}

/// Thumbnail URL configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThumbsConfig {
    /// URL template with `{url}` and `{width}` placeholders.
    pub url: String,
}

impl Default for ThumbsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_THUMB_URL.to_owned(),
        }
    }
}

/// A named responsive size preset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SizeConfig {
    /// Candidate widths in pixels.
    pub widths: Vec<u32>,
    /// Value for the `sizes` attribute.
    #[serde(default)]
    pub sizes: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a URL field to be empty or use http:// or https://.
fn require_http_url_or_empty(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Whether a size spec is an explicit width list such as `320,640`.
fn is_width_list(spec: &str) -> bool {
    spec.split(',')
        .all(|part| part.trim().parse::<u32>().is_ok_and(|w| w > 0))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `imageset.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated again once they are applied.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.site_url {
            self.site_resolved.url.clone_from(url);
        }
        if let Some(content_dir) = &settings.content_dir {
            self.site_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(figure) = settings.figure {
            self.tag.figure = figure;
        }
        if let Some(size) = &settings.default_size {
            self.tag.default_size = Some(size.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            tag: TagConfig::default(),
            thumbs: ThumbsConfig::default(),
            sizes: BTreeMap::new(),
            site_resolved: SiteConfig {
                url: String::new(),
                content_dir: base.join("content"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http_url_or_empty(&self.site_resolved.url, "site.url")?;
        self.validate_thumbs()?;
        self.validate_sizes()?;
        Ok(())
    }

    /// Validate the thumbnail URL template.
    fn validate_thumbs(&self) -> Result<(), ConfigError> {
        for placeholder in ["{url}", "{width}"] {
            if !self.thumbs.url.contains(placeholder) {
                return Err(ConfigError::Validation(format!(
                    "thumbs.url must contain {placeholder}"
                )));
            }
        }
        Ok(())
    }

    /// Validate size presets and the default size.
    fn validate_sizes(&self) -> Result<(), ConfigError> {
        for (name, size) in &self.sizes {
            if size.widths.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "sizes.{name}.widths cannot be empty"
                )));
            }
            if size.widths.contains(&0) {
                return Err(ConfigError::Validation(format!(
                    "sizes.{name}.widths must be greater than 0"
                )));
            }
        }

        if let Some(default) = &self.tag.default_size
            && !default.is_empty()
            && !self.sizes.contains_key(default)
            && !is_width_list(default)
        {
            return Err(ConfigError::Validation(format!(
                "tag.default_size '{default}' is not a preset or width list"
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.site.url {
            self.site.url = Some(expand::expand_env(url, "site.url")?);
        }
        self.thumbs.url = expand::expand_env(&self.thumbs.url, "thumbs.url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.site_resolved = SiteConfig {
            url: self.site.url.clone().unwrap_or_default(),
            content_dir: config_dir.join(self.site.content_dir.as_deref().unwrap_or("content")),
        };
    }
}
