//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::env::VarError;

use crate::ConfigError;

/// Expand environment variable references in a config field.
///
/// Values without `${` are returned as is, so bare `$VAR` and the
/// `{url}`/`{width}` thumbnail placeholders pass through.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context(value, |var| {
        std::env::var(var).map(Some).map_err(|e| match e {
            VarError::NotPresent => format!("${{{var}}} not set"),
            VarError::NotUnicode(_) => format!("${{{var}}} is not valid UTF-8"),
        })
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: e.cause,
    })?;

    Ok(expanded.into_owned())
}
