//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Adapter class section
    #[serde(default)]
    pub adapter: AdapterSection,

    /// Product naming section
    #[serde(default)]
    pub product: ProductSection,

    /// Installer supervision section
    #[serde(default)]
    pub install: InstallSection,
}

/// Adapter class configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterSection {
    /// Regex over the device description
    pub class: Option<String>,
}

/// Product naming configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSection {
    /// Alias given to the product's adapter
    pub alias: Option<String>,

    /// Regex over the alias recognising product-owned adapters
    pub signature: Option<String>,
}

/// Installer supervision configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallSection {
    /// Installer timeout in seconds
    pub timeout: Option<u64>,

    /// Rename the new adapter to the product alias
    pub rename: Option<bool>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# driverlogic Configuration File

[adapter]
# Regex over the OS device description selecting the virtual adapter class
# (case-insensitive, default: "^TAP-Windows Adapter V9")
# class = "^TAP-Windows Adapter V9"

[product]
# Alias given to the product's adapter after installation (default: "Mullvad")
alias = "Mullvad"

# Regex over the alias recognising product-owned adapters
# (case-insensitive, default: exactly the alias above)
# signature = "^Mullvad$"

[install]
# Seconds to wait for the driver installer (default: 300)
# timeout = 300

# Rename the new adapter to the product alias (default: true)
# rename = true
"#
    .to_string()
}
