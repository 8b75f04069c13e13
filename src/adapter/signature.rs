//! Matchers for the adapter class and the product's naming convention.
//!
//! # Design
//!
//! - [`AdapterClass`] decides which OS adapters belong to the virtual adapter
//!   class at all. Enumerators apply it before returning records.
//! - [`ProductSignature`] decides which records of that class are owned by
//!   the product. It never takes part in adapter identity.

use regex::{Regex, RegexBuilder};

use super::TapAdapter;

/// The virtual adapter hardware class, matched against the OS device description.
///
/// # Examples
///
/// ```
/// use driverlogic::adapter::AdapterClass;
///
/// let class = AdapterClass::new(r"^TAP-Windows Adapter V9").unwrap();
///
/// assert!(class.matches("TAP-Windows Adapter V9"));
/// assert!(class.matches("tap-windows adapter v9 #2"));
/// assert!(!class.matches("Intel(R) Ethernet Connection"));
/// ```
#[derive(Debug, Clone)]
pub struct AdapterClass {
    pattern: Regex,
}

impl AdapterClass {
    /// Creates an adapter class from a case-insensitive description pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: case_insensitive(pattern)?,
        })
    }

    /// Returns true if an adapter with this device description belongs to the class.
    #[must_use]
    pub fn matches(&self, description: &str) -> bool {
        self.pattern.is_match(description)
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Predicate deciding whether an adapter record belongs to the product.
///
/// # Thread Safety
///
/// Signatures must be `Send + Sync` so they can be shared with the platform layer.
pub trait ProductSignature: Send + Sync {
    /// Returns `true` if the adapter carries the product's naming signature.
    fn matches(&self, adapter: &TapAdapter) -> bool;
}

impl<F> ProductSignature for F
where
    F: Fn(&TapAdapter) -> bool + Send + Sync,
{
    fn matches(&self, adapter: &TapAdapter) -> bool {
        self(adapter)
    }
}

/// Matches the adapter alias against a case-insensitive pattern.
///
/// # Examples
///
/// ```
/// use driverlogic::adapter::{AliasSignature, ProductSignature, TapAdapter};
///
/// let signature = AliasSignature::for_alias("Mullvad").unwrap();
///
/// let owned = TapAdapter::new("{A}", "TAP-Windows Adapter V9", "mullvad");
/// let foreign = TapAdapter::new("{B}", "TAP-Windows Adapter V9", "Ethernet 2");
///
/// assert!(signature.matches(&owned));
/// assert!(!signature.matches(&foreign));
/// ```
#[derive(Debug, Clone)]
pub struct AliasSignature {
    pattern: Regex,
}

impl AliasSignature {
    /// Creates a signature from a case-insensitive alias pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: case_insensitive(pattern)?,
        })
    }

    /// Creates a signature matching exactly the given alias, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error only if the escaped alias exceeds the regex size limit.
    pub fn for_alias(alias: &str) -> Result<Self, regex::Error> {
        Self::new(&format!("^{}$", regex::escape(alias)))
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl ProductSignature for AliasSignature {
    fn matches(&self, adapter: &TapAdapter) -> bool {
        self.pattern.is_match(&adapter.alias)
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
