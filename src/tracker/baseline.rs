//! The baseline/diff tracker.

use std::fmt;

use crate::adapter::{
    AdapterClass, AdapterEnumerator, AdapterSet, ProductSignature, TapAdapter, capture,
};

use super::error::{Snapshot, TrackerError};

/// Classification of the adapters present before installation.
///
/// Determined solely by whether the baseline is empty and whether any member
/// carries the product signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaselineStatus {
    /// The adapter class has no members.
    NoTapAdaptersPresent,
    /// Adapters of the class exist, but none is owned by the product.
    SomeTapAdaptersPresent,
    /// At least one adapter carries the product signature.
    MullvadAdapterPresent,
}

impl BaselineStatus {
    /// Classifies a captured snapshot.
    #[must_use]
    pub fn classify<S>(snapshot: &AdapterSet, signature: &S) -> Self
    where
        S: ProductSignature + ?Sized,
    {
        if snapshot.is_empty() {
            Self::NoTapAdaptersPresent
        } else if snapshot.has_product_adapter(signature) {
            Self::MullvadAdapterPresent
        } else {
            Self::SomeTapAdaptersPresent
        }
    }
}

impl fmt::Display for BaselineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTapAdaptersPresent => write!(f, "NO_TAP_ADAPTERS_PRESENT"),
            Self::SomeTapAdaptersPresent => write!(f, "SOME_TAP_ADAPTERS_PRESENT"),
            Self::MullvadAdapterPresent => write!(f, "MULLVAD_ADAPTER_PRESENT"),
        }
    }
}

/// Identifies the single adapter created by one driver installation.
///
/// # Lifecycle
///
/// 1. [`establish_baseline`](Self::establish_baseline) before installing
/// 2. the caller installs the driver
/// 3. [`record_current_state`](Self::record_current_state)
/// 4. [`new_adapter`](Self::new_adapter)
///
/// A tracker serves one cycle and is then discarded. Captures are not
/// guarded against repetition: calling a capture twice replaces the earlier
/// snapshot.
///
/// # Example
///
/// ```
/// use driverlogic::adapter::{
///     AdapterClass, AdapterEnumerator, AliasSignature, EnumerateError, TapAdapter,
/// };
/// use driverlogic::tracker::{BaselineStatus, BaselineTracker};
/// use std::cell::Cell;
///
/// // Pretend the installer creates one adapter between the two enumerations.
/// struct Installing(Cell<bool>);
///
/// impl AdapterEnumerator for Installing {
///     fn enumerate(&self, _: &AdapterClass) -> Result<Vec<TapAdapter>, EnumerateError> {
///         if self.0.replace(true) {
///             Ok(vec![TapAdapter::new("{AAAA-1}", "TAP-Windows Adapter V9", "Ethernet 2")])
///         } else {
///             Ok(vec![])
///         }
///     }
/// }
///
/// let enumerator = Installing(Cell::new(false));
/// let class = AdapterClass::new("^TAP-Windows Adapter V9").unwrap();
/// let signature = AliasSignature::for_alias("Mullvad").unwrap();
/// let mut tracker = BaselineTracker::new(&enumerator, &class, &signature);
///
/// assert_eq!(tracker.establish_baseline().unwrap(), BaselineStatus::NoTapAdaptersPresent);
/// tracker.record_current_state().unwrap();
/// assert_eq!(tracker.new_adapter().unwrap().identifier, "{AAAA-1}");
/// ```
pub struct BaselineTracker<'a, E: ?Sized, S: ?Sized> {
    enumerator: &'a E,
    class: &'a AdapterClass,
    signature: &'a S,
    baseline: Option<AdapterSet>,
    current_state: Option<AdapterSet>,
}

impl<'a, E, S> BaselineTracker<'a, E, S>
where
    E: AdapterEnumerator + ?Sized,
    S: ProductSignature + ?Sized,
{
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new(enumerator: &'a E, class: &'a AdapterClass, signature: &'a S) -> Self {
        Self {
            enumerator,
            class,
            signature,
            baseline: None,
            current_state: None,
        }
    }

    /// Captures the baseline snapshot and classifies it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Enumerate`] if the OS query fails; the
    /// previous baseline, if any, is then left untouched.
    pub fn establish_baseline(&mut self) -> Result<BaselineStatus, TrackerError> {
        let baseline = capture(self.enumerator, self.class)?;
        let status = BaselineStatus::classify(&baseline, self.signature);

        tracing::debug!("Baseline holds {} adapter(s): {status}", baseline.len());
        self.baseline = Some(baseline);

        Ok(status)
    }

    /// Captures the post-installation snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Enumerate`] if the OS query fails.
    pub fn record_current_state(&mut self) -> Result<(), TrackerError> {
        let current_state = capture(self.enumerator, self.class)?;

        tracing::debug!("Current state holds {} adapter(s)", current_state.len());
        self.current_state = Some(current_state);

        Ok(())
    }

    /// Returns the one adapter present now that was absent from the baseline.
    ///
    /// Identity is the identifier alone, so an adapter renamed between the
    /// snapshots is not new.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::MissingSnapshot`] if either snapshot was not captured
    /// - [`TrackerError::NoNewAdapter`] if nothing appeared
    /// - [`TrackerError::MultipleNewAdapters`] if more than one appeared;
    ///   no candidate is ever picked among several
    pub fn new_adapter(&self) -> Result<&TapAdapter, TrackerError> {
        let baseline = self
            .baseline
            .as_ref()
            .ok_or(TrackerError::MissingSnapshot(Snapshot::Baseline))?;
        let current_state = self
            .current_state
            .as_ref()
            .ok_or(TrackerError::MissingSnapshot(Snapshot::CurrentState))?;

        let mut added = current_state.difference(baseline);

        match (added.next(), added.next()) {
            (None, _) => Err(TrackerError::NoNewAdapter),
            (Some(adapter), None) => Ok(adapter),
            (Some(first), Some(second)) => {
                let identifiers = [first, second]
                    .into_iter()
                    .chain(added)
                    .map(|a| a.identifier.clone())
                    .collect();
                Err(TrackerError::MultipleNewAdapters { identifiers })
            }
        }
    }

    /// Returns the baseline snapshot, if captured.
    #[must_use]
    pub const fn baseline(&self) -> Option<&AdapterSet> {
        self.baseline.as_ref()
    }

    /// Returns the post-installation snapshot, if captured.
    #[must_use]
    pub const fn current_state(&self) -> Option<&AdapterSet> {
        self.current_state.as_ref()
    }
}

impl<E: ?Sized, S: ?Sized> fmt::Debug for BaselineTracker<'_, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaselineTracker")
            .field("class", &self.class.as_str())
            .field("baseline", &self.baseline)
            .field("current_state", &self.current_state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "baseline_tests.rs"]
mod tests;
