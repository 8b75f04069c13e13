//! Error types for the tracker layer.

use std::fmt;

use thiserror::Error;

use crate::adapter::{EnumerateError, RemoveError};

/// Which of the tracker's two snapshots is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    /// Captured before installation.
    Baseline,
    /// Captured after installation.
    CurrentState,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::CurrentState => write!(f, "current state"),
        }
    }
}

/// Error type for tracker operations.
///
/// Two kinds of failure exist: OS operations that failed
/// ([`Self::Enumerate`], [`Self::Remove`]) and broken caller contracts
/// (everything else). Neither is retried or recovered here.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Failed to enumerate adapters.
    #[error("Failed to enumerate adapters: {0}")]
    Enumerate(#[from] EnumerateError),

    /// Failed to remove a located adapter.
    #[error("Failed to remove adapter {identifier}: {source}")]
    Remove {
        /// Identifier of the adapter that could not be removed.
        identifier: String,
        /// Underlying OS error.
        #[source]
        source: RemoveError,
    },

    /// A snapshot required by the operation has not been captured.
    #[error("The {0} snapshot has not been captured")]
    MissingSnapshot(Snapshot),

    /// No adapter appeared between the two snapshots.
    #[error("No new adapter appeared after installation")]
    NoNewAdapter,

    /// More than one adapter appeared between the two snapshots.
    #[error("Expected one new adapter, found {}: {}", identifiers.len(), identifiers.join(", "))]
    MultipleNewAdapters {
        /// Identifiers of every new adapter, in canonical order.
        identifiers: Vec<String>,
    },
}

impl TrackerError {
    /// Returns true if the error is a broken caller contract rather than an OS failure.
    #[must_use]
    pub const fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingSnapshot(_) | Self::NoNewAdapter | Self::MultipleNewAdapters { .. }
        )
    }
}
