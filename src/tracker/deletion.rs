//! Removal of the product's adapter, independent of any tracker.

use std::fmt;

use crate::adapter::{
    AdapterClass, AdapterEnumerator, AdapterRemover, ProductSignature, capture,
};

use super::error::TrackerError;

/// What is left of the adapter class after [`delete_mullvad_adapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionResult {
    /// The adapter class is now empty.
    NoRemainingTapAdapters,
    /// Other adapters of the class remain.
    SomeRemainingTapAdapters,
}

impl fmt::Display for DeletionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRemainingTapAdapters => write!(f, "NO_REMAINING_TAP_ADAPTERS"),
            Self::SomeRemainingTapAdapters => write!(f, "SOME_REMAINING_TAP_ADAPTERS"),
        }
    }
}

/// Removes the adapter carrying the product signature, then reports what remains.
///
/// # Algorithm
///
/// 1. Enumerate `class`
/// 2. Find the adapter matching `signature`; at most one is expected, and
///    the first in canonical order is taken if several match
/// 3. Remove it, if found
/// 4. Enumerate `class` again and classify the remainder
///
/// Finding no product adapter is not an error: the second enumeration still
/// runs and the result reflects the foreign adapters.
///
/// # Errors
///
/// - [`TrackerError::Enumerate`] if either enumeration fails
/// - [`TrackerError::Remove`] if the located adapter cannot be removed; no
///   retry is attempted
pub fn delete_mullvad_adapter<E, R, S>(
    enumerator: &E,
    remover: &R,
    class: &AdapterClass,
    signature: &S,
) -> Result<DeletionResult, TrackerError>
where
    E: AdapterEnumerator + ?Sized,
    R: AdapterRemover + ?Sized,
    S: ProductSignature + ?Sized,
{
    let adapters = capture(enumerator, class)?;

    match adapters.find_product_adapter(signature) {
        Some(adapter) => {
            tracing::debug!("Removing product adapter {adapter}");
            remover
                .remove(&adapter.identifier)
                .map_err(|source| TrackerError::Remove {
                    identifier: adapter.identifier.clone(),
                    source,
                })?;
        }
        None => tracing::debug!("No product adapter present, nothing to remove"),
    }

    let remaining = capture(enumerator, class)?;

    Ok(if remaining.is_empty() {
        DeletionResult::NoRemainingTapAdapters
    } else {
        DeletionResult::SomeRemainingTapAdapters
    })
}

#[cfg(test)]
#[path = "deletion_tests.rs"]
mod tests;
