//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::adapter::{AdapterClass, AliasSignature};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// The virtual adapter class
    pub class: AdapterClass,

    /// Recognises product-owned adapters
    pub signature: AliasSignature,

    /// Alias given to the product's adapter
    pub product_alias: String,

    /// How long the driver installer may run
    pub install_timeout: Duration,

    /// Rename the new adapter to the product alias after installation
    pub rename_new_adapter: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ class: {}, product_alias: {}, signature: {}, install_timeout: {}s, rename: {} }}",
            self.class.as_str(),
            self.product_alias,
            self.signature.as_str(),
            self.install_timeout.as_secs(),
            self.rename_new_adapter,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over [`defaults`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A regex pattern is invalid
    /// - The product alias is blank or contains a character Windows rejects
    ///   in connection names
    /// - The installer timeout is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let class = Self::resolve_class(cli, toml)?;

        let product_alias = Self::resolve_product_alias(cli, toml)?;

        // Signature defaults to the product alias itself
        let signature = Self::resolve_signature(cli, toml, &product_alias)?;

        let install_timeout = Self::resolve_install_timeout(cli, toml)?;

        // --no-rename wins over TOML
        let rename_new_adapter = !cli.no_rename()
            && toml
                .and_then(|t| t.install.rename)
                .unwrap_or(defaults::RENAME_NEW_ADAPTER);

        Ok(Self {
            class,
            signature,
            product_alias,
            install_timeout,
            rename_new_adapter,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_class(cli: &Cli, toml: Option<&TomlConfig>) -> Result<AdapterClass, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let pattern = cli
            .adapter_class
            .as_deref()
            .or_else(|| toml.and_then(|t| t.adapter.class.as_deref()))
            .unwrap_or(defaults::ADAPTER_CLASS);

        AdapterClass::new(pattern)
            .map_err(|e| ConfigError::invalid_regex(field::ADAPTER_CLASS, pattern, e))
    }

    fn resolve_product_alias(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let alias = cli
            .product_alias
            .as_deref()
            .or_else(|| toml.and_then(|t| t.product.alias.as_deref()))
            .unwrap_or(defaults::PRODUCT_ALIAS)
            .trim();

        if alias.is_empty() {
            return Err(ConfigError::EmptyAlias);
        }

        let forbidden = alias
            .chars()
            .find(|c| defaults::FORBIDDEN_ALIAS_CHARS.contains(c));
        if let Some(character) = forbidden {
            return Err(ConfigError::InvalidAlias {
                alias: alias.to_string(),
                character,
            });
        }

        Ok(alias.to_string())
    }

    fn resolve_signature(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        product_alias: &str,
    ) -> Result<AliasSignature, ConfigError> {
        let explicit = cli
            .signature
            .as_deref()
            .or_else(|| toml.and_then(|t| t.product.signature.as_deref()));

        match explicit {
            Some(pattern) => AliasSignature::new(pattern)
                .map_err(|e| ConfigError::invalid_regex(field::SIGNATURE, pattern, e)),
            None => AliasSignature::for_alias(product_alias)
                .map_err(|e| ConfigError::invalid_regex(field::SIGNATURE, product_alias, e)),
        }
    }

    fn resolve_install_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        let seconds = cli
            .install_timeout()
            .or_else(|| toml.and_then(|t| t.install.timeout))
            .unwrap_or(defaults::INSTALL_TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: field::INSTALL_TIMEOUT,
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
