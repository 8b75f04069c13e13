//! Command execution logic.
//!
//! This module drives the tracker through the installer workflow: listing and
//! classifying adapters, supervising the driver installer process, naming the
//! adapter it created, and removing the product's adapter.

use std::fmt;
use std::process::ExitStatus;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use driverlogic::adapter::platform::PlatformAdapters;
use driverlogic::adapter::{
    AdapterEnumerator, AdapterRemover, AdapterRenamer, AdapterSet, ProductSignature,
    RenameError, TapAdapter, capture,
};
use driverlogic::config::{Command, ValidatedConfig};
use driverlogic::tracker::{
    BaselineStatus, BaselineTracker, DeletionResult, TrackerError, delete_mullvad_adapter,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The tracker failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// No installer command line was given.
    #[error("No installer command given")]
    MissingInstaller,

    /// The installer process could not be started or waited on.
    #[error("Failed to run installer '{program}': {source}")]
    InstallerIo {
        /// Installer program
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The installer exited unsuccessfully.
    #[error("Installer '{program}' exited with {status}")]
    InstallerFailed {
        /// Installer program
        program: String,
        /// Exit status of the installer
        status: ExitStatus,
    },

    /// The installer did not finish in time.
    #[error("Installer '{program}' did not finish within {}s", timeout.as_secs())]
    InstallerTimedOut {
        /// Installer program
        program: String,
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// The new adapter could not be renamed.
    #[error("Failed to rename adapter {identifier}: {source}")]
    Rename {
        /// Identifier of the new adapter
        identifier: String,
        /// Underlying rename error
        #[source]
        source: RenameError,
    },

    /// Failed to serialize output.
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

impl RunError {
    /// Returns true if the tracker's contract was broken, for example when
    /// the installation created no adapter or several.
    #[must_use]
    pub const fn is_precondition_violation(&self) -> bool {
        match self {
            Self::Tracker(e) => e.is_precondition_violation(),
            _ => false,
        }
    }
}

/// Runs the driver installer.
pub trait Installer {
    /// Runs the installation to completion.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] if the installation did not succeed.
    async fn install(&self) -> Result<(), RunError>;
}

/// Installer that runs an external program with a timeout.
#[derive(Debug, Clone)]
pub struct ProcessInstaller {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessInstaller {
    /// Creates an installer from a command line whose first element is the program.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::MissingInstaller`] if the command line is empty.
    pub fn new(command_line: &[String], timeout: Duration) -> Result<Self, RunError> {
        let (program, args) = command_line
            .split_first()
            .ok_or(RunError::MissingInstaller)?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }
}

impl Installer for ProcessInstaller {
    async fn install(&self) -> Result<(), RunError> {
        let io_error = |source| RunError::InstallerIo {
            program: self.program.clone(),
            source,
        };

        tracing::info!("Running installer: {} {}", self.program, self.args.join(" "));

        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .spawn()
            .map_err(io_error)?;

        let Ok(waited) = tokio::time::timeout(self.timeout, child.wait()).await else {
            if let Err(e) = child.kill().await {
                tracing::warn!("Failed to kill installer after timeout: {e}");
            }
            return Err(RunError::InstallerTimedOut {
                program: self.program.clone(),
                timeout: self.timeout,
            });
        };

        let status = waited.map_err(io_error)?;
        if status.success() {
            Ok(())
        } else {
            Err(RunError::InstallerFailed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

/// Result of an install cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The product's adapter already existed; the installer was not run.
    AlreadyPresent(TapAdapter),
    /// The installer created this adapter.
    Created(TapAdapter),
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyPresent(adapter) => write!(f, "ALREADY_PRESENT {}", adapter.identifier),
            Self::Created(adapter) => write!(f, "CREATED {}", adapter.identifier),
        }
    }
}

/// One adapter in `list --json` output.
#[derive(Debug, Serialize)]
struct ListedAdapter<'a> {
    #[serde(flatten)]
    adapter: &'a TapAdapter,
    product_owned: bool,
}

/// Executes the selected command.
///
/// # Errors
///
/// Returns an error if an OS operation fails, the installer fails, or the
/// installation did not create exactly one adapter.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires the
/// platform adapter APIs.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    let platform = PlatformAdapters::default();

    match command {
        Command::List { json } => {
            let adapters = capture(&platform, &config.class).map_err(TrackerError::from)?;
            println!("{}", render_list(&adapters, &config.signature, json)?);
        }
        Command::Baseline => {
            let mut tracker = BaselineTracker::new(&platform, &config.class, &config.signature);
            println!("{}", tracker.establish_baseline()?);
        }
        Command::Install { installer, .. } => {
            let installer = ProcessInstaller::new(&installer, config.install_timeout)?;
            println!("{}", install_cycle(&platform, &config, &installer).await?);
        }
        Command::Remove => println!("{}", remove(&platform, &config)?),
        Command::Init { .. } => {}
    }

    Ok(())
}

/// Formats captured adapters for `list`.
fn render_list<S>(adapters: &AdapterSet, signature: &S, json: bool) -> Result<String, RunError>
where
    S: ProductSignature + ?Sized,
{
    if json {
        let listed: Vec<_> = adapters
            .iter()
            .map(|adapter| ListedAdapter {
                adapter,
                product_owned: signature.matches(adapter),
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&listed)?);
    }

    let lines: Vec<_> = adapters
        .iter()
        .map(|adapter| {
            let marker = if signature.matches(adapter) { "*" } else { " " };
            format!("{marker} {adapter}")
        })
        .collect();

    Ok(lines.join("\n"))
}

/// Runs one baseline, install, identify cycle.
///
/// 1. Establish the baseline
/// 2. If the product's adapter already exists, stop and report it
/// 3. Run the installer and capture the current state
/// 4. Identify the single new adapter and, if configured, give it the product alias
async fn install_cycle<P, I>(
    platform: &P,
    config: &ValidatedConfig,
    installer: &I,
) -> Result<InstallOutcome, RunError>
where
    P: AdapterEnumerator + AdapterRenamer,
    I: Installer,
{
    let mut tracker = BaselineTracker::new(platform, &config.class, &config.signature);

    let status = tracker.establish_baseline()?;
    tracing::info!("Baseline: {status}");

    let existing = tracker
        .baseline()
        .filter(|_| status == BaselineStatus::MullvadAdapterPresent)
        .and_then(|b| b.find_product_adapter(&config.signature));
    if let Some(existing) = existing {
        tracing::info!("Product adapter already present: {existing}");
        return Ok(InstallOutcome::AlreadyPresent(existing.clone()));
    }

    installer.install().await?;

    tracker.record_current_state()?;
    let mut adapter = tracker.new_adapter()?.clone();
    tracing::info!("New adapter: {adapter}");

    if config.rename_new_adapter && adapter.alias != config.product_alias {
        platform
            .rename(&adapter, &config.product_alias)
            .map_err(|source| RunError::Rename {
                identifier: adapter.identifier.clone(),
                source,
            })?;
        tracing::info!("Renamed \"{}\" to \"{}\"", adapter.alias, config.product_alias);
        adapter.alias.clone_from(&config.product_alias);
    }

    Ok(InstallOutcome::Created(adapter))
}

/// Removes the product's adapter.
fn remove<P>(platform: &P, config: &ValidatedConfig) -> Result<DeletionResult, RunError>
where
    P: AdapterEnumerator + AdapterRemover,
{
    let result = delete_mullvad_adapter(platform, platform, &config.class, &config.signature)?;
    tracing::info!("Product adapter removal finished: {result}");
    Ok(result)
}
