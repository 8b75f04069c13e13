//! Adapter layer: records, snapshot sets and OS collaborators.
//!
//! This module provides types and traits for:
//! - Representing one virtual adapter ([`TapAdapter`])
//! - Point-in-time snapshots of a whole adapter class ([`AdapterSet`], [`capture`])
//! - Recognising the adapter class and product-owned adapters
//!   ([`AdapterClass`], [`ProductSignature`], [`AliasSignature`])
//! - OS enumeration, removal and renaming
//!   ([`AdapterEnumerator`], [`AdapterRemover`], [`AdapterRenamer`])
//! - Platform-specific implementations ([`platform`])

mod enumerator;
pub mod platform;
mod record;
mod set;
mod signature;

pub use enumerator::{
    AdapterEnumerator, AdapterRemover, AdapterRenamer, EnumerateError, RemoveError, RenameError,
};
pub use record::TapAdapter;
pub use set::{AdapterSet, capture};
pub use signature::{AdapterClass, AliasSignature, ProductSignature};
