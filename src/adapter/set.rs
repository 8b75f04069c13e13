//! Snapshot sets of adapters and snapshot capture.

use std::collections::BTreeSet;
use std::collections::btree_set;

use super::{AdapterClass, AdapterEnumerator, EnumerateError, ProductSignature, TapAdapter};

/// All adapters of the virtual adapter class visible at one point in time.
///
/// Ordered by case-insensitive identifier. The ordering only gives the set a
/// canonical iteration order; identity is the identifier alone, so inserting a
/// record whose identifier is already present keeps the existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterSet {
    adapters: BTreeSet<TapAdapter>,
}

impl AdapterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record. Returns `false` if an adapter with the same
    /// identifier was already present.
    pub fn insert(&mut self, adapter: TapAdapter) -> bool {
        self.adapters.insert(adapter)
    }

    /// Returns the number of adapters in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if the set holds no adapters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Iterates the adapters in canonical order.
    pub fn iter(&self) -> btree_set::Iter<'_, TapAdapter> {
        self.adapters.iter()
    }

    /// Returns true if an adapter with this identifier is in the set.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.adapters.iter().any(|a| a.has_identifier(identifier))
    }

    /// Returns the adapters in `self` whose identifier is absent from `other`.
    ///
    /// Name and alias changes between the two snapshots are irrelevant.
    pub fn difference<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a TapAdapter> {
        self.adapters.difference(&other.adapters)
    }

    /// Finds the first adapter carrying the product signature, in canonical order.
    #[must_use]
    pub fn find_product_adapter<S>(&self, signature: &S) -> Option<&TapAdapter>
    where
        S: ProductSignature + ?Sized,
    {
        self.adapters.iter().find(|a| signature.matches(a))
    }

    /// Returns true if any adapter carries the product signature.
    #[must_use]
    pub fn has_product_adapter<S>(&self, signature: &S) -> bool
    where
        S: ProductSignature + ?Sized,
    {
        self.find_product_adapter(signature).is_some()
    }
}

impl FromIterator<TapAdapter> for AdapterSet {
    /// Keeps the first record of each identifier, like [`AdapterSet::insert`].
    fn from_iter<I: IntoIterator<Item = TapAdapter>>(iter: I) -> Self {
        let mut set = Self::new();
        for adapter in iter {
            set.insert(adapter);
        }
        set
    }
}

impl IntoIterator for AdapterSet {
    type Item = TapAdapter;
    type IntoIter = btree_set::IntoIter<TapAdapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.adapters.into_iter()
    }
}

impl<'a> IntoIterator for &'a AdapterSet {
    type Item = &'a TapAdapter;
    type IntoIter = btree_set::Iter<'a, TapAdapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.adapters.iter()
    }
}

/// Captures the adapters of `class` currently present on the system.
///
/// Issues exactly one enumeration call. Zero matches yield an empty set.
///
/// # Errors
///
/// Propagates the enumerator's [`EnumerateError`].
pub fn capture<E>(enumerator: &E, class: &AdapterClass) -> Result<AdapterSet, EnumerateError>
where
    E: AdapterEnumerator + ?Sized,
{
    let adapters = enumerator.enumerate(class)?;
    Ok(adapters.into_iter().collect())
}
