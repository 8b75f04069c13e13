//! Tracker layer: identifying the adapter an installation created.
//!
//! This module provides:
//! - The before/after snapshot tracker ([`BaselineTracker`], [`BaselineStatus`])
//! - Removal of the product's adapter ([`delete_mullvad_adapter`], [`DeletionResult`])
//! - Error handling ([`TrackerError`], [`Snapshot`])
//!
//! # Concurrency
//!
//! Everything here is synchronous and single-threaded. Callers sequence
//! baseline, installation, current-state capture and diff themselves, and
//! must not run [`delete_mullvad_adapter`] while a tracker cycle is capturing
//! the same adapter class.

mod baseline;
mod deletion;
mod error;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use baseline::{BaselineStatus, BaselineTracker};
pub use deletion::{DeletionResult, delete_mullvad_adapter};
pub use error::{Snapshot, TrackerError};
