//! Event lifecycle and the single writer
//!
//! `next_status` is the event state machine. `LifecycleManager` owns the
//! ledger behind one mutex: each mutation runs validate, apply, persist and
//! notify while holding the lock, so two requests against the same event can
//! never interleave their read-validate-write steps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use super::ledger::{Ledger, ReconcileReport, SnapshotDocuments};
use crate::models::{CreateEventRequest, Event, EventStatus, Registration, Student, UpdateEventRequest};
use crate::persistence::{
    PersistenceGateway, CURRENT_USER_KEY, EVENTS_KEY, INTERESTED_KEY, REGISTRATIONS_KEY, STUDENTS_KEY,
};
use crate::utils::errors::{CampusHubError, PersistenceError, Result};
use crate::utils::logging::{log_event_action, log_persistence_failure, log_persistence_write, log_registration_action};

/// Status-affecting requests an event can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Update,
    Postpone,
    Cancel,
}

/// Status an event moves to under an action
///
/// | from               | action   | to        |
/// |--------------------|----------|-----------|
/// | upcoming/postponed | update   | unchanged |
/// | upcoming/postponed | postpone | postponed |
/// | upcoming/postponed | cancel   | cancelled |
/// | cancelled          | any      | rejected  |
pub fn next_status(event: &Event, action: LifecycleAction) -> Result<EventStatus> {
    if event.status.is_terminal() {
        return Err(CampusHubError::EventCancelled {
            event_id: event.id.clone(),
        });
    }

    Ok(match action {
        LifecycleAction::Update => event.status,
        LifecycleAction::Postpone => EventStatus::Postponed,
        LifecycleAction::Cancel => EventStatus::Cancelled,
    })
}

/// Published after every committed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StoreChange {
    EventCreated { event_id: String },
    EventUpdated { event_id: String },
    EventPostponed { event_id: String },
    EventCancelled { event_id: String },
    Registered { event_id: String, student_id: String, remaining_seats: u32 },
    Unregistered { event_id: String, student_id: String, remaining_seats: u32 },
    InterestToggled { event_id: String, student_id: String, interested: bool },
    StudentSaved { student_id: String },
}

/// Result of a best-effort bulk cancellation
#[derive(Debug, Default)]
pub struct BulkCancelOutcome {
    pub cancelled: Vec<String>,
    pub failed: Vec<(String, CampusHubError)>,
}

impl BulkCancelOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

const CHANGE_CHANNEL_CAPACITY: usize = 64;

pub struct LifecycleManager {
    ledger: Mutex<Ledger>,
    gateway: Arc<dyn PersistenceGateway>,
    /// Set when the last snapshot write failed
    dirty: AtomicBool,
    changes: broadcast::Sender<StoreChange>,
    report: ReconcileReport,
}

impl LifecycleManager {
    /// Load the snapshot from the gateway, reconcile it and take ownership
    ///
    /// A snapshot that needed correcting is written back immediately.
    pub async fn open(gateway: Arc<dyn PersistenceGateway>) -> Result<Self> {
        let documents = SnapshotDocuments {
            events: gateway.load(EVENTS_KEY).await?,
            registrations: gateway.load(REGISTRATIONS_KEY).await?,
            students: gateway.load(STUDENTS_KEY).await?,
            interested: gateway.load(INTERESTED_KEY).await?,
        };

        let (ledger, report) = Ledger::from_documents(documents)?;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        let manager = Self {
            ledger: Mutex::new(ledger),
            gateway,
            dirty: AtomicBool::new(report.needs_rewrite()),
            changes,
            report,
        };

        if manager.is_dirty() {
            info!("Writing back reconciled snapshot");
            let ledger = manager.ledger.lock().await;
            manager.persist(&ledger).await;
        }

        info!(backend = manager.gateway.backend(), "Lifecycle manager opened");
        Ok(manager)
    }

    /// Flush any pending write and release the store
    pub async fn shutdown(self) -> Result<()> {
        self.flush().await?;
        info!("Lifecycle manager shut down");
        Ok(())
    }

    /// What reconciliation found when the store was opened
    pub fn reconcile_report(&self) -> &ReconcileReport {
        &self.report
    }

    /// Whether the in-memory state is ahead of storage
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Retry a failed snapshot write, reporting the failure this time
    pub async fn flush(&self) -> Result<()> {
        let ledger = self.ledger.lock().await;
        if !self.is_dirty() {
            return Ok(());
        }

        match self.persist(&ledger).await {
            None => Ok(()),
            Some(e) => Err(CampusHubError::Persistence(e)),
        }
    }

    /// Run a read against the current snapshot
    pub async fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        let ledger = self.ledger.lock().await;
        f(&ledger)
    }

    /// Apply one mutation as a transaction
    ///
    /// `apply` must leave the ledger untouched when it returns an error.
    /// On success the snapshot is persisted before the lock is released; a
    /// failed write is logged and retried later but does not fail the call.
    async fn transact<R>(&self, apply: impl FnOnce(&mut Ledger) -> Result<(R, StoreChange)>) -> Result<R> {
        let mut ledger = self.ledger.lock().await;
        let (value, change) = apply(&mut ledger)?;

        if let Some(e) = self.persist(&ledger).await {
            debug!(error = %e, "Mutation kept in memory after failed write");
        }
        drop(ledger);

        // No subscribers is fine.
        let _ = self.changes.send(change);
        Ok(value)
    }

    /// Write every snapshot document, returning the first failure
    async fn persist(&self, ledger: &Ledger) -> Option<PersistenceError> {
        let documents = match ledger.to_documents() {
            Ok(documents) => documents,
            Err(e) => {
                warn!(error = %e, "Failed to serialize snapshot");
                self.dirty.store(true, Ordering::SeqCst);
                return Some(PersistenceError::Unavailable(e.to_string()));
            }
        };

        let mut failure = None;
        for (key, value) in documents {
            let started = Instant::now();
            match self.gateway.save(key, &value).await {
                Ok(()) => log_persistence_write(key, started.elapsed().as_millis() as u64),
                Err(e) => {
                    log_persistence_failure(key, &e.to_string());
                    failure.get_or_insert(e);
                }
            }
        }

        self.dirty.store(failure.is_some(), Ordering::SeqCst);
        failure
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        let event = self
            .transact(|ledger| {
                let event = ledger.create_event(request, Utc::now())?;
                let change = StoreChange::EventCreated { event_id: event.id.clone() };
                Ok((event, change))
            })
            .await?;

        log_event_action(&event.id, "create", Some(&event.title));
        Ok(event)
    }

    pub async fn update_event(&self, id: &str, request: UpdateEventRequest) -> Result<Event> {
        let event = self
            .transact(|ledger| {
                let event = ledger.update_event(id, request, Utc::now())?;
                let change = StoreChange::EventUpdated { event_id: event.id.clone() };
                Ok((event, change))
            })
            .await?;

        log_event_action(&event.id, "update", None);
        Ok(event)
    }

    /// Postpone to a combined "YYYY-MM-DD HH:MM" value
    pub async fn postpone_event(&self, id: &str, date_time: &str) -> Result<Event> {
        let event = self
            .transact(|ledger| {
                let event = ledger.postpone_event_at(id, date_time, Utc::now())?;
                let change = StoreChange::EventPostponed { event_id: event.id.clone() };
                Ok((event, change))
            })
            .await?;

        let details = format!("{} {}", event.date, event.time);
        log_event_action(&event.id, "postpone", Some(&details));
        Ok(event)
    }

    pub async fn cancel_event(&self, id: &str) -> Result<Event> {
        let event = self
            .transact(|ledger| {
                let event = ledger.cancel_event(id, Utc::now())?;
                let change = StoreChange::EventCancelled { event_id: event.id.clone() };
                Ok((event, change))
            })
            .await?;

        log_event_action(&event.id, "cancel", None);
        Ok(event)
    }

    /// Cancel several events, each in its own transaction
    ///
    /// A failure does not stop the remaining cancellations and nothing is
    /// rolled back.
    pub async fn cancel_events(&self, ids: &[String]) -> BulkCancelOutcome {
        let mut outcome = BulkCancelOutcome::default();

        for id in ids {
            match self.cancel_event(id).await {
                Ok(event) => outcome.cancelled.push(event.id),
                Err(e) => {
                    warn!(event_id = %id, error = %e, "Bulk cancel skipped event");
                    outcome.failed.push((id.clone(), e));
                }
            }
        }

        info!(cancelled = outcome.cancelled.len(), failed = outcome.failed.len(), "Bulk cancel finished");
        outcome
    }

    pub async fn register(&self, event_id: &str, student_id: &str) -> Result<Registration> {
        let (registration, remaining) = self
            .transact(|ledger| {
                let registration = ledger.register(event_id, student_id, Utc::now())?;
                let remaining = ledger.remaining_seats(event_id)?;
                let change = StoreChange::Registered {
                    event_id: event_id.to_string(),
                    student_id: student_id.to_string(),
                    remaining_seats: remaining,
                };
                Ok(((registration, remaining), change))
            })
            .await?;

        log_registration_action(event_id, student_id, "register", remaining);
        Ok(registration)
    }

    /// Release a seat, for both self-unregister and admin removal
    pub async fn unregister(&self, event_id: &str, student_id: &str) -> Result<Registration> {
        let (registration, remaining) = self
            .transact(|ledger| {
                let registration = ledger.unregister(event_id, student_id, Utc::now())?;
                let remaining = ledger.remaining_seats(event_id).unwrap_or(0);
                let change = StoreChange::Unregistered {
                    event_id: event_id.to_string(),
                    student_id: student_id.to_string(),
                    remaining_seats: remaining,
                };
                Ok(((registration, remaining), change))
            })
            .await?;

        log_registration_action(event_id, student_id, "unregister", remaining);
        Ok(registration)
    }

    pub async fn toggle_interest(&self, event_id: &str, student_id: &str) -> Result<bool> {
        self.transact(|ledger| {
            let interested = ledger.toggle_interest(event_id, student_id)?;
            let change = StoreChange::InterestToggled {
                event_id: event_id.to_string(),
                student_id: student_id.to_string(),
                interested,
            };
            Ok((interested, change))
        })
        .await
    }

    pub async fn save_student(&self, student: Student) -> Result<Student> {
        self.transact(|ledger| {
            let change = StoreChange::StudentSaved { student_id: student.id.clone() };
            ledger.upsert_student(student.clone());
            Ok((student, change))
        })
        .await
    }

    pub async fn get_event(&self, id: &str) -> Result<Event> {
        self.read(|ledger| {
            ledger.events().get(id).cloned().ok_or_else(|| CampusHubError::EventNotFound {
                event_id: id.to_string(),
            })
        })
        .await
    }

    /// Every event in insertion order
    pub async fn list_events(&self) -> Vec<Event> {
        self.read(|ledger| ledger.events().list().to_vec()).await
    }

    pub async fn registered_count(&self, event_id: &str) -> Result<usize> {
        self.read(|ledger| ledger.registered_count(event_id)).await
    }

    pub async fn is_registered(&self, event_id: &str, student_id: &str) -> bool {
        self.read(|ledger| ledger.registrations().find_active(event_id, student_id).is_some())
            .await
    }

    pub async fn registered_events(&self, student_id: &str) -> Vec<Event> {
        self.read(|ledger| ledger.registered_events(student_id)).await
    }

    pub async fn interested_events(&self, student_id: &str) -> Vec<Event> {
        self.read(|ledger| ledger.interested_events(student_id)).await
    }

    pub async fn student(&self, student_id: &str) -> Option<Student> {
        self.read(|ledger| ledger.students().get(student_id).cloned()).await
    }

    /// Remember the signed-in user. Stored outside the snapshot.
    pub async fn set_current_user(&self, student: &Student) -> Result<()> {
        let value = serde_json::to_value(student)?;
        self.gateway.save(CURRENT_USER_KEY, &value).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<Option<Student>> {
        match self.gateway.load(CURRENT_USER_KEY).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    pub async fn clear_current_user(&self) -> Result<()> {
        self.gateway.save(CURRENT_USER_KEY, &Value::Null).await?;
        Ok(())
    }
}
