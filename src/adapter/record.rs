//! The adapter record type.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A virtual network adapter visible to the OS at a point in time.
///
/// # Identity
///
/// Two records are the same adapter iff their identifiers are equal under
/// case-insensitive comparison. `device_name` and `alias` are informational
/// and never take part in equality or ordering.
#[derive(Debug, Clone, Serialize)]
pub struct TapAdapter {
    /// GUID-shaped name of the adapter instance (e.g. `{3F1A...}`).
    pub identifier: String,
    /// OS-assigned device name.
    pub device_name: String,
    /// Name the OS currently shows for the adapter. May be renamed at any time.
    pub alias: String,
}

impl TapAdapter {
    /// Creates a new adapter record.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        device_name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            device_name: device_name.into(),
            alias: alias.into(),
        }
    }

    /// Returns true if `identifier` names this adapter (case-insensitive).
    #[must_use]
    pub fn has_identifier(&self, identifier: &str) -> bool {
        compare_identifiers(&self.identifier, identifier) == Ordering::Equal
    }
}

/// Orders two identifiers case-insensitively without allocating.
fn compare_identifiers(lhs: &str, rhs: &str) -> Ordering {
    lhs.chars()
        .flat_map(char::to_lowercase)
        .cmp(rhs.chars().flat_map(char::to_lowercase))
}

impl PartialEq for TapAdapter {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TapAdapter {}

impl PartialOrd for TapAdapter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TapAdapter {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_identifiers(&self.identifier, &other.identifier)
    }
}

impl fmt::Display for TapAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (alias: \"{}\", device: \"{}\")",
            self.identifier, self.alias, self.device_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_record_with_correct_fields() {
        let adapter = TapAdapter::new("{AAAA-1}", "TAP-Windows Adapter V9", "Ethernet 2");

        assert_eq!(adapter.identifier, "{AAAA-1}");
        assert_eq!(adapter.device_name, "TAP-Windows Adapter V9");
        assert_eq!(adapter.alias, "Ethernet 2");
    }

    #[test]
    fn equality_ignores_identifier_case() {
        let upper = TapAdapter::new("{ABCD-EF01}", "dev", "alias");
        let lower = TapAdapter::new("{abcd-ef01}", "dev", "alias");

        assert_eq!(upper, lower);
        assert_eq!(upper.cmp(&lower), Ordering::Equal);
    }

    #[test]
    fn equality_ignores_device_name_and_alias() {
        let before = TapAdapter::new("{AAAA-1}", "TAP-Windows Adapter V9", "Ethernet 3");
        let after = TapAdapter::new("{AAAA-1}", "TAP-Windows Adapter V9 #2", "Mullvad");

        assert_eq!(before, after);
    }

    #[test]
    fn different_identifiers_are_not_equal() {
        let first = TapAdapter::new("{AAAA-1}", "dev", "same");
        let second = TapAdapter::new("{AAAA-2}", "dev", "same");

        assert_ne!(first, second);
    }

    #[test]
    fn ordering_is_case_insensitive() {
        let a = TapAdapter::new("{a}", "", "");
        let b = TapAdapter::new("{B}", "", "");

        // Byte order would put 'B' before 'a'.
        assert!(a < b);
    }

    #[test]
    fn has_identifier_ignores_case() {
        let adapter = TapAdapter::new("{DEAD-BEEF}", "dev", "alias");

        assert!(adapter.has_identifier("{dead-beef}"));
        assert!(!adapter.has_identifier("{dead-bee0}"));
    }

    #[test]
    fn display_includes_identifier_and_alias() {
        let adapter = TapAdapter::new("{AAAA-1}", "TAP-Windows Adapter V9", "Mullvad");
        let rendered = adapter.to_string();

        assert!(rendered.contains("{AAAA-1}"));
        assert!(rendered.contains("Mullvad"));
    }

    #[test]
    fn serializes_all_fields() {
        let adapter = TapAdapter::new("{AAAA-1}", "dev", "Mullvad");
        let json = serde_json::to_value(&adapter).unwrap();

        assert_eq!(json["identifier"], "{AAAA-1}");
        assert_eq!(json["device_name"], "dev");
        assert_eq!(json["alias"], "Mullvad");
    }
}
