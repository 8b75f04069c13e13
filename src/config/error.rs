//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid regex pattern.
    #[error("Invalid regex pattern for {field} '{pattern}': {source}")]
    InvalidRegex {
        /// Name of the field
        field: &'static str,
        /// The invalid pattern
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Invalid duration value (zero).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// The product alias is empty or blank.
    #[error("Product alias must not be empty")]
    EmptyAlias,

    /// The product alias contains a character not allowed in a connection name.
    #[error("Product alias '{alias}' must not contain '{character}'")]
    InvalidAlias {
        /// The rejected alias
        alias: String,
        /// The first forbidden character found
        character: char,
    },
}

/// Well-known field names used in error messages.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The adapter class pattern.
    pub const ADAPTER_CLASS: &str = "adapter_class";
    /// The product signature pattern.
    pub const SIGNATURE: &str = "signature";
    /// The installer timeout.
    pub const INSTALL_TIMEOUT: &str = "install_timeout";
}

impl ConfigError {
    /// Creates an `InvalidRegex` error for a field.
    #[must_use]
    pub fn invalid_regex(field: &'static str, pattern: &str, source: regex::Error) -> Self {
        Self::InvalidRegex {
            field,
            pattern: pattern.to_string(),
            source,
        }
    }
}
