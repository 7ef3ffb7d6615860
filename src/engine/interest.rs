//! Interested set
//!
//! Students can bookmark events without claiming a seat. Interest has no
//! effect on capacity.

use std::collections::{BTreeMap, BTreeSet};

/// Student id to the set of event ids they marked as interesting
pub type InterestMap = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, Default)]
pub struct InterestRegistry {
    by_student: InterestMap,
}

impl InterestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(by_student: InterestMap) -> Self {
        Self { by_student }
    }

    /// Flip interest for a pair, returning the new state
    pub fn toggle(&mut self, event_id: &str, student_id: &str) -> bool {
        let events = self.by_student.entry(student_id.to_string()).or_default();
        let interested = if events.remove(event_id) {
            false
        } else {
            events.insert(event_id.to_string());
            true
        };

        if events.is_empty() {
            self.by_student.remove(student_id);
        }
        interested
    }

    pub fn is_interested(&self, event_id: &str, student_id: &str) -> bool {
        self.by_student
            .get(student_id)
            .map_or(false, |events| events.contains(event_id))
    }

    pub fn event_ids(&self, student_id: &str) -> Vec<&str> {
        self.by_student
            .get(student_id)
            .map(|events| events.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &InterestMap {
        &self.by_student
    }
}
