//! Per-owner message accumulation.
//!
//! During a run, each compliant device produces one formatted fragment which
//! is filed under the owning user. The [`MessageBook`] keeps owners in the
//! order they were first seen so delivery order is deterministic.

use crate::device::{DeviceComplianceStatus, Policy};

/// Format the message fragment for one compliant device.
///
/// The format is fixed:
/// `"1. {description} \n\n Device Name {name}, Model {model}\n"`.
#[must_use]
pub fn format_fragment(policy: &Policy, status: &DeviceComplianceStatus) -> String {
    format!(
        "1. {} \n\n Device Name {}, Model {}\n",
        policy.description, status.device_display_name, status.device_model
    )
}

/// Insertion-ordered mapping from owner to message fragments.
///
/// Invariants:
/// - a key exists iff at least one fragment was recorded for that owner
/// - the fragment list under a key is never empty
/// - iteration yields owners in first-seen order, fragments in record order
#[derive(Clone, Debug, Default)]
pub struct MessageBook {
    entries: Vec<(String, Vec<String>)>,
}

impl MessageBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fragment under `owner`, creating the entry on first use.
    pub fn record(&mut self, owner: &str, fragment: String) {
        if let Some((_, fragments)) = self.entries.iter_mut().find(|(o, _)| o == owner) {
            fragments.push(fragment);
        } else {
            self.entries.push((owner.to_string(), vec![fragment]));
        }
    }

    /// Number of owners with at least one fragment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no fragments were recorded at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fragments recorded for `owner`, if any.
    #[must_use]
    pub fn fragments(&self, owner: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(o, _)| o == owner)
            .map(|(_, fragments)| fragments.as_slice())
    }

    /// Iterate `(owner, fragments)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(owner, fragments)| (owner.as_str(), fragments.as_slice()))
    }
}

impl<'a> IntoIterator for &'a MessageBook {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a [String])> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ComplianceState;

    fn policy(desc: &str) -> Policy {
        Policy {
            id: "p-1".to_string(),
            description: desc.to_string(),
            display_name: "Baseline".to_string(),
        }
    }

    fn status(name: &str, model: &str, owner: &str) -> DeviceComplianceStatus {
        DeviceComplianceStatus {
            status: ComplianceState::Compliant,
            device_display_name: name.to_string(),
            device_model: model.to_string(),
            user_name: owner.to_string(),
        }
    }

    // ── format_fragment ─────────────────────────────────────────────

    #[test]
    fn fragment_format_is_exact() {
        let fragment = format_fragment(
            &policy("Disk encryption required"),
            &status("alice-mbp", "MacBookPro18,3", "alice@example.com"),
        );
        assert_eq!(
            fragment,
            "1. Disk encryption required \n\n Device Name alice-mbp, Model MacBookPro18,3\n"
        );
    }

    #[test]
    fn fragment_format_empty_fields() {
        let fragment = format_fragment(&policy(""), &status("", "", "a@x.com"));
        assert_eq!(fragment, "1.  \n\n Device Name , Model \n");
    }

    // ── MessageBook ─────────────────────────────────────────────────

    #[test]
    fn empty_book() {
        let book = MessageBook::new();
        assert!(book.is_empty());
        assert_eq!(book.len(), 0);
        assert!(book.fragments("a@x.com").is_none());
    }

    #[test]
    fn record_creates_entry() {
        let mut book = MessageBook::new();
        book.record("a@x.com", "f1".to_string());
        assert_eq!(book.len(), 1);
        assert_eq!(book.fragments("a@x.com").unwrap(), &["f1"]);
    }

    #[test]
    fn record_appends_in_order() {
        let mut book = MessageBook::new();
        book.record("a@x.com", "f1".to_string());
        book.record("a@x.com", "f2".to_string());
        book.record("a@x.com", "f3".to_string());
        assert_eq!(book.len(), 1);
        assert_eq!(book.fragments("a@x.com").unwrap(), &["f1", "f2", "f3"]);
    }

    #[test]
    fn owners_iterate_in_first_seen_order() {
        let mut book = MessageBook::new();
        book.record("c@x.com", "f1".to_string());
        book.record("a@x.com", "f2".to_string());
        book.record("c@x.com", "f3".to_string());
        book.record("b@x.com", "f4".to_string());

        let owners: Vec<&str> = book.iter().map(|(owner, _)| owner).collect();
        assert_eq!(owners, ["c@x.com", "a@x.com", "b@x.com"]);
    }

    #[test]
    fn no_owner_has_empty_fragments() {
        let mut book = MessageBook::new();
        book.record("a@x.com", "f1".to_string());
        book.record("b@x.com", "f2".to_string());
        for (_, fragments) in &book {
            assert!(!fragments.is_empty());
        }
    }
}
