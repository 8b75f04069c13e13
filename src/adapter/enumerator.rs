//! Collaborator traits for the OS device facilities, and their error types.

use std::process::ExitStatus;

use thiserror::Error;

use super::{AdapterClass, TapAdapter};

/// Error type for adapter enumeration.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },

    /// Adapter enumeration is not available on this platform.
    #[error("Adapter enumeration is not supported on this platform")]
    Unsupported,
}

/// Error type for adapter removal.
#[derive(Debug, Error)]
pub enum RemoveError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// No device with the identifier exists.
    #[error("No device found for adapter {identifier}")]
    NotFound {
        /// The identifier that was looked up.
        identifier: String,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },

    /// Adapter removal is not available on this platform.
    #[error("Adapter removal is not supported on this platform")]
    Unsupported,
}

/// Error type for renaming an adapter's alias.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The rename tool could not be started.
    #[error("Failed to run rename tool: {0}")]
    Spawn(#[source] std::io::Error),

    /// The rename tool ran but reported failure.
    #[error("Rename tool exited with {status}")]
    Failed {
        /// Exit status of the tool.
        status: ExitStatus,
    },

    /// Renaming is not available on this platform.
    #[error("Adapter renaming is not supported on this platform")]
    Unsupported,
}

/// Lists the adapters of a virtual adapter class.
///
/// # Design
///
/// - Enables dependency injection for testing with mock implementations
/// - Platform-specific implementations live in [`super::platform`]
///
/// # Implementation Notes
///
/// - Implementations return every adapter of `class` known to the OS at call
///   time, without omissions or duplicates
/// - An empty result is valid
pub trait AdapterEnumerator {
    /// Enumerates all adapters belonging to `class`.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerateError`] when the OS query fails.
    fn enumerate(&self, class: &AdapterClass) -> Result<Vec<TapAdapter>, EnumerateError>;
}

/// Removes an adapter at the OS level.
pub trait AdapterRemover {
    /// Requests removal of the adapter with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RemoveError`] if the OS refuses or fails the removal.
    fn remove(&self, identifier: &str) -> Result<(), RemoveError>;
}

/// Changes the alias the OS shows for an adapter.
pub trait AdapterRenamer {
    /// Renames `adapter` to `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`RenameError`] if the rename fails.
    fn rename(&self, adapter: &TapAdapter, alias: &str) -> Result<(), RenameError>;
}
