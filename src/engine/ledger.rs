//! The combined snapshot
//!
//! Events, registrations, students and interests move together: every
//! operation here either fully applies or leaves the ledger untouched, and
//! the lifecycle manager holds the whole ledger under one lock.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::capacity;
use super::event_store::EventStore;
use super::interest::{InterestMap, InterestRegistry};
use super::lifecycle::{self, LifecycleAction};
use super::registration_log::RegistrationLog;
use super::students::StudentDirectory;
use crate::models::{CreateEventRequest, Event, Registration, Student, UpdateEventRequest};
use crate::persistence::{EVENTS_KEY, INTERESTED_KEY, REGISTRATIONS_KEY, STUDENTS_KEY};
use crate::utils::errors::{CampusHubError, Result};
use crate::utils::helpers::{parse_event_date, parse_event_time, split_date_time};

/// Raw documents as read from the persistence gateway
#[derive(Debug, Clone, Default)]
pub struct SnapshotDocuments {
    pub events: Option<Value>,
    pub registrations: Option<Value>,
    pub students: Option<Value>,
    pub interested: Option<Value>,
}

/// What reconciliation found and fixed while loading a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub events_loaded: usize,
    pub registrations_loaded: usize,
    /// Events whose stored remaining seats disagreed with the log
    pub seats_corrected: usize,
    /// Extra active registrations for an already active pair
    pub duplicates_demoted: usize,
    /// Active registrations whose event no longer exists (kept as-is)
    pub orphaned_registrations: usize,
    /// Events holding more active registrations than their capacity
    pub over_capacity_events: usize,
}

impl ReconcileReport {
    /// Whether the corrected snapshot differs from what is stored
    pub fn needs_rewrite(&self) -> bool {
        self.seats_corrected > 0 || self.duplicates_demoted > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    events: EventStore,
    registrations: RegistrationLog,
    students: StudentDirectory,
    interests: InterestRegistry,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored documents and reconcile it
    pub fn from_documents(documents: SnapshotDocuments) -> Result<(Self, ReconcileReport)> {
        let events: Vec<Event> = decode(documents.events)?;
        let registrations: Vec<Registration> = decode(documents.registrations)?;
        let students: Vec<Student> = decode(documents.students)?;
        let interested: InterestMap = decode(documents.interested)?;

        let (registrations, duplicates_demoted) = RegistrationLog::from_records(registrations);
        let mut ledger = Self {
            events: EventStore::from_events(events),
            registrations,
            students: StudentDirectory::from_students(students),
            interests: InterestRegistry::from_map(interested),
        };

        let mut report = ledger.reconcile();
        report.duplicates_demoted = duplicates_demoted;

        info!(
            events = report.events_loaded,
            registrations = report.registrations_loaded,
            seats_corrected = report.seats_corrected,
            duplicates_demoted = report.duplicates_demoted,
            orphaned = report.orphaned_registrations,
            "Snapshot loaded and reconciled"
        );
        Ok((ledger, report))
    }

    /// Re-derive every event's remaining seats from the registration log
    fn reconcile(&mut self) -> ReconcileReport {
        let mut report = ReconcileReport {
            events_loaded: self.events.len(),
            registrations_loaded: self.registrations.len(),
            ..Default::default()
        };

        let ids: Vec<String> = self.events.list().iter().map(|e| e.id.clone()).collect();
        for id in &ids {
            let active = self.registrations.active_count(id);
            let Some(event) = self.events.get_mut(id) else {
                continue;
            };

            if !capacity::fits(event.total_capacity, active) {
                warn!(event_id = %id, total_capacity = event.total_capacity, active = active, "Event holds more registrations than seats");
                report.over_capacity_events += 1;
            }

            let derived = capacity::recompute(event, active);
            if event.remaining_seats != derived {
                warn!(event_id = %id, stored = event.remaining_seats, derived = derived, "Correcting stored remaining seats");
                event.remaining_seats = derived;
                report.seats_corrected += 1;
            }
        }

        report.orphaned_registrations = self
            .registrations
            .records()
            .iter()
            .filter(|r| r.is_active() && !self.events.contains(&r.event_id))
            .count();
        if report.orphaned_registrations > 0 {
            warn!(count = report.orphaned_registrations, "Active registrations reference unknown events");
        }

        report
    }

    /// Serialize every snapshot document, keyed for the gateway
    pub fn to_documents(&self) -> Result<Vec<(&'static str, Value)>> {
        Ok(vec![
            (EVENTS_KEY, serde_json::to_value(self.events.list())?),
            (REGISTRATIONS_KEY, serde_json::to_value(self.registrations.records())?),
            (STUDENTS_KEY, serde_json::to_value(self.students.list())?),
            (INTERESTED_KEY, serde_json::to_value(self.interests.as_map())?),
        ])
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn registrations(&self) -> &RegistrationLog {
        &self.registrations
    }

    pub fn students(&self) -> &StudentDirectory {
        &self.students
    }

    pub fn interests(&self) -> &InterestRegistry {
        &self.interests
    }

    fn event(&self, id: &str) -> Result<&Event> {
        self.events.get(id).ok_or_else(|| CampusHubError::EventNotFound {
            event_id: id.to_string(),
        })
    }

    pub fn create_event(&mut self, request: CreateEventRequest, now: DateTime<Utc>) -> Result<Event> {
        self.events.create(request, now)
    }

    pub fn update_event(&mut self, id: &str, request: UpdateEventRequest, now: DateTime<Utc>) -> Result<Event> {
        self.events.update(id, request, &self.registrations, now)
    }

    /// Postpone to a combined "YYYY-MM-DD HH:MM" value
    ///
    /// The event is looked up and its status checked before the input is
    /// parsed, so a missing or cancelled event reports that first.
    pub fn postpone_event_at(&mut self, id: &str, date_time: &str, now: DateTime<Utc>) -> Result<Event> {
        lifecycle::next_status(self.event(id)?, LifecycleAction::Postpone)?;
        let (date, time) = split_date_time(date_time).ok_or_else(|| {
            CampusHubError::invalid("dateTime", "New date and time must look like YYYY-MM-DD HH:MM")
        })?;
        self.postpone_event(id, &date, &time, now)
    }

    /// Move an event to a new date and time; seats are untouched
    pub fn postpone_event(&mut self, id: &str, date: &str, time: &str, now: DateTime<Utc>) -> Result<Event> {
        let status = lifecycle::next_status(self.event(id)?, LifecycleAction::Postpone)?;

        let date = date.trim();
        let time = time.trim();
        if date.is_empty() || time.is_empty() {
            return Err(CampusHubError::invalid("dateTime", "A new date and time are required to postpone"));
        }
        if parse_event_date(date).is_none() {
            return Err(CampusHubError::invalid("date", "Date must be in YYYY-MM-DD format"));
        }
        if parse_event_time(time).is_none() {
            return Err(CampusHubError::invalid("time", "Time must be in HH:MM format"));
        }

        let event = self.events.get_mut(id).ok_or_else(|| CampusHubError::EventNotFound {
            event_id: id.to_string(),
        })?;
        event.status = status;
        event.date = date.to_string();
        event.time = time.to_string();
        event.updated_at = now;
        Ok(event.clone())
    }

    /// Cancel an event; cancelled is terminal
    pub fn cancel_event(&mut self, id: &str, now: DateTime<Utc>) -> Result<Event> {
        let status = lifecycle::next_status(self.event(id)?, LifecycleAction::Cancel)?;

        let event = self.events.get_mut(id).ok_or_else(|| CampusHubError::EventNotFound {
            event_id: id.to_string(),
        })?;
        event.status = status;
        event.updated_at = now;
        Ok(event.clone())
    }

    pub fn register(&mut self, event_id: &str, student_id: &str, now: DateTime<Utc>) -> Result<Registration> {
        self.registrations.register(&mut self.events, event_id, student_id, now)
    }

    pub fn unregister(&mut self, event_id: &str, student_id: &str, now: DateTime<Utc>) -> Result<Registration> {
        self.registrations.remove(&mut self.events, event_id, student_id, now)
    }

    pub fn toggle_interest(&mut self, event_id: &str, student_id: &str) -> Result<bool> {
        self.event(event_id)?;
        Ok(self.interests.toggle(event_id, student_id))
    }

    pub fn upsert_student(&mut self, student: Student) {
        self.students.upsert(student);
    }

    /// Remaining seats derived from the log, never from the stored field
    pub fn remaining_seats(&self, event_id: &str) -> Result<u32> {
        let event = self.event(event_id)?;
        Ok(capacity::recompute(event, self.registrations.active_count(event_id)))
    }

    pub fn registered_count(&self, event_id: &str) -> Result<usize> {
        self.event(event_id)?;
        Ok(self.registrations.active_count(event_id))
    }

    /// Events a student holds an active seat in
    pub fn registered_events(&self, student_id: &str) -> Vec<Event> {
        self.registrations
            .active_event_ids(student_id)
            .into_iter()
            .filter_map(|id| self.events.get(id).cloned())
            .collect()
    }

    /// Events a student marked as interesting, in event insertion order
    pub fn interested_events(&self, student_id: &str) -> Vec<Event> {
        self.events
            .list()
            .iter()
            .filter(|e| self.interests.is_interested(&e.id, student_id))
            .cloned()
            .collect()
    }

    /// Describe every broken capacity or uniqueness invariant
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for event in self.events.list() {
            let active = self.registrations.active_count(&event.id);
            if event.remaining_seats > event.total_capacity {
                violations.push(format!("{}: remaining {} > capacity {}", event.id, event.remaining_seats, event.total_capacity));
            }
            if !capacity::fits(event.total_capacity, active) {
                violations.push(format!("{}: {} active > capacity {}", event.id, active, event.total_capacity));
            }
            if event.remaining_seats != capacity::recompute(event, active) {
                violations.push(format!("{}: stale remaining seats {}", event.id, event.remaining_seats));
            }
        }

        let mut pairs = std::collections::HashSet::new();
        for record in self.registrations.records().iter().filter(|r| r.is_active()) {
            if !pairs.insert((record.event_id.as_str(), record.student_id.as_str())) {
                violations.push(format!("{}: duplicate active registration for {}", record.event_id, record.student_id));
            }
        }

        violations
    }
}

fn decode<T: DeserializeOwned + Default>(value: Option<Value>) -> Result<T> {
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}
