// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Typed child factories and identifier generation.
// Author: Lukas Bower

//! Typed child factories and identifier generation.

use crate::entity::EntityKind;

/// Factory manufacturing children of a single entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    kind: EntityKind,
    next_id: u64,
}

impl Factory {
    /// Construct a factory for `kind` with the counter at zero.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self { kind, next_id: 0 }
    }

    /// Kind of entity produced by this factory.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Identifier the next unlabelled `create` will receive.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Resolve the label for a new child, advancing the counter as required.
    ///
    /// Omitted ids take the counter. A canonical integer at or above the
    /// counter is accepted and moves the counter past it. Anything else is
    /// used verbatim and leaves the counter alone; collisions surface later as
    /// duplicate symbols when the child is registered.
    pub fn issue_label(&mut self, requested: Option<&str>) -> String {
        let Some(requested) = requested else {
            let id = self.next_id;
            self.next_id = self.next_id.saturating_add(1);
            return id.to_string();
        };
        if let Some(value) = canonical_id(requested) {
            if value >= self.next_id {
                if let Some(next) = value.checked_add(1) {
                    self.next_id = next;
                }
            }
        }
        requested.to_owned()
    }
}

/// Parse `0` or a non-zero digit followed by digits; no sign, no leading zero.
fn canonical_id(text: &str) -> Option<u64> {
    let bytes = text.as_bytes();
    let canonical = match bytes {
        [] => false,
        [b'0'] => true,
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if canonical {
        text.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_follows_highest_numeric_id() {
        let mut factory = Factory::new(EntityKind::Vm);
        assert_eq!(factory.issue_label(None), "0");
        assert_eq!(factory.issue_label(None), "1");
        assert_eq!(factory.issue_label(Some("5")), "5");
        assert_eq!(factory.next_id(), 6);
        assert_eq!(factory.issue_label(None), "6");
        assert_eq!(factory.issue_label(Some("3")), "3");
        assert_eq!(factory.next_id(), 7);
    }

    #[test]
    fn non_canonical_ids_are_verbatim() {
        let mut factory = Factory::new(EntityKind::Nic);
        for label in ["web1", "007", "-1", "+4", "1e3", " 9"] {
            assert_eq!(factory.issue_label(Some(label)), label);
        }
        assert_eq!(factory.next_id(), 0);
    }

    #[test]
    fn zero_is_canonical() {
        let mut factory = Factory::new(EntityKind::Port);
        assert_eq!(factory.issue_label(Some("0")), "0");
        assert_eq!(factory.next_id(), 1);
    }

    #[test]
    fn oversized_ids_leave_counter_alone() {
        let mut factory = Factory::new(EntityKind::Disk);
        let huge = "184467440737095516150";
        assert_eq!(factory.issue_label(Some(huge)), huge);
        assert_eq!(factory.next_id(), 0);
        let max = u64::MAX.to_string();
        assert_eq!(factory.issue_label(Some(max.as_str())), max);
        assert_eq!(factory.next_id(), 0);
    }

    #[test]
    fn canonical_id_rules() {
        assert_eq!(canonical_id("0"), Some(0));
        assert_eq!(canonical_id("42"), Some(42));
        assert_eq!(canonical_id("7"), Some(7));
        assert_eq!(canonical_id("00"), None);
        assert_eq!(canonical_id("01"), None);
        assert_eq!(canonical_id(""), None);
    }
}
