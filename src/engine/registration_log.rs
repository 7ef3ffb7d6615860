//! Registration log
//!
//! Append-only record of seat claims. Removal flips a record to `removed`
//! and stamps `removed_at`; records are never erased.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::capacity;
use super::event_store::EventStore;
use crate::models::{Registration, RegistrationStatus};
use crate::utils::errors::{CampusHubError, Result};
use crate::utils::helpers::generate_id;

#[derive(Debug, Clone, Default)]
pub struct RegistrationLog {
    records: Vec<Registration>,
}

impl RegistrationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records
    ///
    /// Returns the log and the number of extra active records that were
    /// demoted to `removed` because their (event, student) pair was already
    /// active earlier in the log.
    pub fn from_records(mut records: Vec<Registration>) -> (Self, usize) {
        let mut seen = HashSet::new();
        let mut demoted = 0;

        for record in records.iter_mut().filter(|r| r.is_active()) {
            let pair = (record.event_id.clone(), record.student_id.clone());
            if !seen.insert(pair) {
                warn!(
                    event_id = %record.event_id,
                    student_id = %record.student_id,
                    registration_id = %record.id,
                    "Demoting duplicate active registration on load"
                );
                record.status = RegistrationStatus::Removed;
                demoted += 1;
            }
        }

        (Self { records }, demoted)
    }

    /// Claim a seat for a student
    ///
    /// On success the event's remaining seats are re-derived from the log.
    pub fn register(
        &mut self,
        events: &mut EventStore,
        event_id: &str,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Registration> {
        let event = events.get(event_id).ok_or_else(|| CampusHubError::EventNotFound {
            event_id: event_id.to_string(),
        })?;

        if event.is_cancelled() {
            return Err(CampusHubError::EventCancelled {
                event_id: event_id.to_string(),
            });
        }

        if self.find_active(event_id, student_id).is_some() {
            return Err(CampusHubError::DuplicateRegistration {
                event_id: event_id.to_string(),
                student_id: student_id.to_string(),
            });
        }

        let active = self.active_count(event_id);
        if capacity::recompute(event, active) == 0 {
            return Err(CampusHubError::EventFull {
                event_id: event_id.to_string(),
            });
        }

        let registration = Registration {
            id: generate_id(),
            event_id: event_id.to_string(),
            student_id: student_id.to_string(),
            status: RegistrationStatus::Active,
            registered_at: now,
            removed_at: None,
        };
        self.records.push(registration.clone());

        let remaining = events.refresh_seats(event_id, active + 1);
        debug!(event_id = event_id, student_id = student_id, remaining_seats = ?remaining, "Registration appended");
        Ok(registration)
    }

    /// Release a student's seat
    pub fn remove(
        &mut self,
        events: &mut EventStore,
        event_id: &str,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Registration> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.is_active() && r.matches(event_id, student_id))
            .ok_or_else(|| CampusHubError::NotRegistered {
                event_id: event_id.to_string(),
                student_id: student_id.to_string(),
            })?;

        record.status = RegistrationStatus::Removed;
        record.removed_at = Some(now);
        let removed = record.clone();

        let active = self.active_count(event_id);
        if events.refresh_seats(event_id, active).is_none() {
            warn!(event_id = event_id, "Removed registration references an unknown event");
        }

        debug!(event_id = event_id, student_id = student_id, "Registration marked removed");
        Ok(removed)
    }

    /// Number of active registrations for an event
    pub fn active_count(&self, event_id: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.is_active() && r.event_id == event_id)
            .count()
    }

    /// Active registrations for an event, oldest first
    pub fn list_active(&self, event_id: &str) -> Vec<&Registration> {
        let mut active: Vec<&Registration> = self
            .records
            .iter()
            .filter(|r| r.is_active() && r.event_id == event_id)
            .collect();
        active.sort_by_key(|r| r.registered_at);
        active
    }

    pub fn find_active(&self, event_id: &str, student_id: &str) -> Option<&Registration> {
        self.records
            .iter()
            .find(|r| r.is_active() && r.matches(event_id, student_id))
    }

    /// Event ids a student currently holds a seat in, in registration order
    pub fn active_event_ids(&self, student_id: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.is_active() && r.student_id == student_id)
            .map(|r| r.event_id.as_str())
            .collect()
    }

    /// Every record, removed ones included
    pub fn records(&self) -> &[Registration] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
