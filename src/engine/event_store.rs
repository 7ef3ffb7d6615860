//! Event store
//!
//! Authoritative id to event mapping. Events keep insertion order; any
//! date ordering is done by callers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::capacity;
use super::lifecycle::{self, LifecycleAction};
use super::registration_log::RegistrationLog;
use crate::models::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
use crate::utils::errors::{CampusHubError, Result};
use crate::utils::helpers::{generate_id, non_blank};

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
    index: HashMap<String, usize>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records. A repeated id keeps its first record.
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut store = Self::new();
        for event in events {
            if store.index.contains_key(&event.id) {
                warn!(event_id = %event.id, "Dropping duplicate event record on load");
                continue;
            }
            store.insert(event);
        }
        store
    }

    fn insert(&mut self, event: Event) {
        self.index.insert(event.id.clone(), self.events.len());
        self.events.push(event);
    }

    /// Create an event in `upcoming` with every seat free
    pub fn create(&mut self, request: CreateEventRequest, now: DateTime<Utc>) -> Result<Event> {
        let total_capacity = checked_capacity(request.total_capacity)?;

        let event = Event {
            id: generate_id(),
            title: request.title,
            description: request.description,
            date: request.date,
            time: request.time,
            venue: request.venue,
            event_type: request.event_type,
            cover_image_url: request.cover_image_url,
            total_capacity,
            remaining_seats: total_capacity,
            status: EventStatus::Upcoming,
            contact_name: request.contact_name,
            contact_email: request.contact_email,
            contact_phone: request.contact_phone,
            created_at: now,
            updated_at: now,
        };

        debug!(event_id = %event.id, total_capacity = total_capacity, "Event created in store");
        self.insert(event.clone());
        Ok(event)
    }

    /// Merge fields into an existing event
    ///
    /// Every check runs before the record is touched, so a rejected update
    /// leaves the event exactly as it was.
    pub fn update(
        &mut self,
        id: &str,
        request: UpdateEventRequest,
        log: &RegistrationLog,
        now: DateTime<Utc>,
    ) -> Result<Event> {
        let current = self.get(id).ok_or_else(|| CampusHubError::EventNotFound {
            event_id: id.to_string(),
        })?;
        lifecycle::next_status(current, LifecycleAction::Update)?;

        let active = log.active_count(id);
        let total_capacity = match request.total_capacity {
            Some(requested) => {
                let requested = checked_capacity(requested)?;
                if !capacity::fits(requested, active) {
                    return Err(CampusHubError::CapacityViolation {
                        event_id: id.to_string(),
                        requested,
                        active,
                    });
                }
                requested
            }
            None => current.total_capacity,
        };

        let event = self.get_mut(id).ok_or_else(|| CampusHubError::EventNotFound {
            event_id: id.to_string(),
        })?;

        if let Some(title) = request.title {
            event.title = title;
        }
        if let Some(description) = request.description {
            event.description = description;
        }
        if let Some(date) = request.date {
            event.date = date;
        }
        if let Some(time) = request.time {
            event.time = time;
        }
        if let Some(venue) = request.venue {
            event.venue = venue;
        }
        if let Some(event_type) = request.event_type {
            event.event_type = event_type;
        }
        // Optional fields: a blank value clears
        if let Some(url) = request.cover_image_url {
            event.cover_image_url = non_blank(&url);
        }
        if let Some(name) = request.contact_name {
            event.contact_name = non_blank(&name);
        }
        if let Some(email) = request.contact_email {
            event.contact_email = non_blank(&email);
        }
        if let Some(phone) = request.contact_phone {
            event.contact_phone = non_blank(&phone);
        }

        event.total_capacity = total_capacity;
        event.remaining_seats = capacity::remaining(total_capacity, active);
        event.updated_at = now;

        Ok(event.clone())
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.index.get(id).and_then(|&i| self.events.get(i))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Event> {
        match self.index.get(id) {
            Some(&i) => self.events.get_mut(i),
            None => None,
        }
    }

    /// All events in insertion order
    pub fn list(&self) -> &[Event] {
        &self.events
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Re-derive the remaining seats of one event from its active count
    pub fn refresh_seats(&mut self, id: &str, active_count: usize) -> Option<u32> {
        let event = self.get_mut(id)?;
        event.remaining_seats = capacity::recompute(event, active_count);
        Some(event.remaining_seats)
    }
}

fn checked_capacity(total_capacity: i64) -> Result<u32> {
    if total_capacity <= 0 {
        return Err(CampusHubError::invalid(
            "totalCapacity",
            "Total capacity must be a number greater than 0",
        ));
    }
    u32::try_from(total_capacity)
        .map_err(|_| CampusHubError::invalid("totalCapacity", "Total capacity is too large"))
}
