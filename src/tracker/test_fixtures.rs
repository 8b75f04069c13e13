//! Shared mock collaborators for tracker tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::adapter::{
    AdapterClass, AdapterEnumerator, AdapterRemover, EnumerateError, RemoveError, TapAdapter,
};

/// Creates a TAP adapter record with a generic device name.
pub fn tap(identifier: &str, alias: &str) -> TapAdapter {
    TapAdapter::new(identifier, "TAP-Windows Adapter V9", alias)
}

/// The class used throughout the tests.
pub fn tap_class() -> AdapterClass {
    AdapterClass::new("^TAP-Windows Adapter V9").unwrap()
}

/// Product signature used throughout the tests.
pub fn is_mullvad(adapter: &TapAdapter) -> bool {
    adapter.alias.eq_ignore_ascii_case("Mullvad")
}

/// An enumerator returning predefined results, one per call.
///
/// Uses `Mutex<VecDeque>` to avoid requiring `Clone` on `EnumerateError`.
pub struct MockEnumerator {
    results: Mutex<VecDeque<Result<Vec<TapAdapter>, EnumerateError>>>,
    calls: Mutex<usize>,
}

impl MockEnumerator {
    pub fn new(results: Vec<Result<Vec<TapAdapter>, EnumerateError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn returning(snapshots: Vec<Vec<TapAdapter>>) -> Self {
        Self::new(snapshots.into_iter().map(Ok).collect())
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl AdapterEnumerator for MockEnumerator {
    fn enumerate(&self, _class: &AdapterClass) -> Result<Vec<TapAdapter>, EnumerateError> {
        *self.calls.lock().unwrap() += 1;
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![]))
    }
}

/// A remover that records requested identifiers and optionally fails.
#[derive(Default)]
pub struct RecordingRemover {
    removed: Mutex<Vec<String>>,
    fail_with: Mutex<Option<RemoveError>>,
}

impl RecordingRemover {
    pub fn failing(error: RemoveError) -> Self {
        Self {
            removed: Mutex::default(),
            fail_with: Mutex::new(Some(error)),
        }
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

impl AdapterRemover for RecordingRemover {
    fn remove(&self, identifier: &str) -> Result<(), RemoveError> {
        self.removed.lock().unwrap().push(identifier.to_string());
        self.fail_with.lock().unwrap().take().map_or(Ok(()), Err)
    }
}
