//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// driverlogic: identify the TAP adapter created by a driver installation
///
/// Snapshots the virtual adapter class before and after the driver installer
/// runs, and reports the single adapter that appeared.
#[derive(Debug, Parser)]
#[command(name = "driverlogic")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Regex over the device description selecting the virtual adapter class
    #[arg(long = "adapter-class", value_name = "PATTERN", global = true)]
    pub adapter_class: Option<String>,

    /// Alias given to the product's adapter
    #[arg(long = "product-alias", value_name = "NAME", global = true)]
    pub product_alias: Option<String>,

    /// Regex over the alias recognising product-owned adapters
    /// (default: exactly the product alias)
    #[arg(long, value_name = "PATTERN", global = true)]
    pub signature: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for driverlogic
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "driverlogic.toml")]
        output: PathBuf,
    },

    /// List the adapters of the virtual adapter class
    List {
        /// Print adapters as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify the adapters present right now
    Baseline,

    /// Run a driver installer and identify the adapter it created
    Install {
        /// Seconds to wait for the installer before giving up
        #[arg(long = "install-timeout", value_name = "SECS")]
        install_timeout: Option<u64>,

        /// Keep the OS-assigned alias instead of renaming the new adapter
        #[arg(long = "no-rename")]
        no_rename: bool,

        /// Installer program and its arguments, after `--`
        #[arg(required = true, last = true, num_args = 1.., value_name = "INSTALLER")]
        installer: Vec<String>,
    },

    /// Remove the product's adapter and report what remains
    Remove,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }

    /// Returns the `--install-timeout` value if the install command set one.
    #[must_use]
    pub const fn install_timeout(&self) -> Option<u64> {
        match self.command {
            Command::Install {
                install_timeout, ..
            } => install_timeout,
            _ => None,
        }
    }

    /// Returns true if the install command was given `--no-rename`.
    #[must_use]
    pub const fn no_rename(&self) -> bool {
        matches!(
            self.command,
            Command::Install {
                no_rename: true,
                ..
            }
        )
    }
}
