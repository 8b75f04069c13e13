//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

use std::time::Duration;

/// Device description pattern of the TAP-Windows V9 adapter class.
pub const ADAPTER_CLASS: &str = "^TAP-Windows Adapter V9";

/// Alias given to the product's adapter after installation.
pub const PRODUCT_ALIAS: &str = "Mullvad";

/// Characters Windows does not accept in a network connection name.
pub const FORBIDDEN_ALIAS_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Default installer timeout in seconds.
pub const INSTALL_TIMEOUT_SECS: u64 = 300;

/// Whether a newly created adapter is renamed to the product alias.
pub const RENAME_NEW_ADAPTER: bool = true;

/// Default installer timeout as Duration.
#[must_use]
pub const fn install_timeout() -> Duration {
    Duration::from_secs(INSTALL_TIMEOUT_SECS)
}
