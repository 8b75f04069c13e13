//! Platform-specific implementations of the adapter collaborators.
//!
//! # Platform Support
//!
//! - **Windows**: `GetAdaptersAddresses` for enumeration, SetupAPI for
//!   removal, `netsh` for renaming.
//! - **Other**: [`UnsupportedPlatform`], which fails every operation with an
//!   `Unsupported` error so the tooling still builds and reports cleanly.

#[cfg(windows)]
mod windows;

#[cfg(not(windows))]
mod unsupported;

#[cfg(windows)]
pub use windows::WindowsTapAdapters;

#[cfg(not(windows))]
pub use unsupported::UnsupportedPlatform;

// Re-export the platform implementation as PlatformAdapters for convenience
#[cfg(windows)]
pub use windows::WindowsTapAdapters as PlatformAdapters;

#[cfg(not(windows))]
pub use unsupported::UnsupportedPlatform as PlatformAdapters;
