//! CLI error types.

use imageset_config::ConfigError;
use imageset_fs::FsLookupError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Lookup(#[from] FsLookupError),
}
