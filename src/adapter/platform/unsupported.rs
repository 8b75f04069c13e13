//! Fallback for platforms without a TAP driver stack.

use crate::adapter::{
    AdapterClass, AdapterEnumerator, AdapterRemover, AdapterRenamer, EnumerateError, RemoveError,
    RenameError, TapAdapter,
};

/// Collaborator implementation that rejects every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl UnsupportedPlatform {
    /// Creates the stub.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AdapterEnumerator for UnsupportedPlatform {
    fn enumerate(&self, _class: &AdapterClass) -> Result<Vec<TapAdapter>, EnumerateError> {
        Err(EnumerateError::Unsupported)
    }
}

impl AdapterRemover for UnsupportedPlatform {
    fn remove(&self, _identifier: &str) -> Result<(), RemoveError> {
        Err(RemoveError::Unsupported)
    }
}

impl AdapterRenamer for UnsupportedPlatform {
    fn rename(&self, _adapter: &TapAdapter, _alias: &str) -> Result<(), RenameError> {
        Err(RenameError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_is_unsupported() {
        let class = AdapterClass::new("^TAP").unwrap();
        let result = UnsupportedPlatform::new().enumerate(&class);

        assert!(matches!(result, Err(EnumerateError::Unsupported)));
    }

    #[test]
    fn remove_is_unsupported() {
        let result = UnsupportedPlatform::new().remove("{AAAA-1}");

        assert!(matches!(result, Err(RemoveError::Unsupported)));
    }

    #[test]
    fn rename_is_unsupported() {
        let adapter = TapAdapter::new("{AAAA-1}", "dev", "Ethernet 2");
        let result = UnsupportedPlatform::new().rename(&adapter, "Mullvad");

        assert!(matches!(result, Err(RenameError::Unsupported)));
    }
}
