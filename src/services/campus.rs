//! Campus service
//!
//! The surface screens call. Forms are validated here and only valid input
//! reaches the lifecycle manager. Every call returns a `Result`; expected
//! failures come back as typed `CampusHubError` variants.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::Settings;
use crate::engine::schedule::{events_on, sort_by_schedule};
use crate::engine::{BulkCancelOutcome, LifecycleManager, ParticipantRoster, ReconcileReport, StoreChange};
use crate::models::{Event, Participant, Registration, Student, StudentForm, UpdateEventRequest};
use crate::persistence::{build_gateway, PersistenceGateway};
use crate::utils::errors::{CampusHubError, Result};
use crate::utils::helpers::{generate_id, non_blank};
use crate::validation::{validate_event_form, validate_student_form, EventForm};

/// Explicitly owned store: create with [`CampusHub::open`], release with
/// [`CampusHub::shutdown`]
pub struct CampusHub {
    manager: LifecycleManager,
    settings: Settings,
}

impl CampusHub {
    /// Open the store on the gateway selected by `settings`
    pub async fn open(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let gateway = build_gateway(&settings.storage).await?;
        Self::open_with_gateway(settings, gateway).await
    }

    /// Open the store on an existing gateway
    pub async fn open_with_gateway(settings: Settings, gateway: Arc<dyn PersistenceGateway>) -> Result<Self> {
        let manager = LifecycleManager::open(gateway).await?;
        info!(events = manager.reconcile_report().events_loaded, "CampusHub opened");
        Ok(Self { manager, settings })
    }

    /// Flush pending writes and close the store
    pub async fn shutdown(self) -> Result<()> {
        self.manager.shutdown().await
    }

    pub fn manager(&self) -> &LifecycleManager {
        &self.manager
    }

    pub fn roster(&self) -> ParticipantRoster<'_> {
        ParticipantRoster::new(&self.manager)
    }

    pub fn reconcile_report(&self) -> &ReconcileReport {
        self.manager.reconcile_report()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.manager.subscribe()
    }

    pub async fn flush(&self) -> Result<()> {
        self.manager.flush().await
    }

    // Admin: events

    pub async fn create_event(&self, form: &EventForm) -> Result<Event> {
        validate_event_form(form, &self.settings.events).into_result()?;
        self.manager.create_event(form.to_create_request()).await
    }

    /// Apply a resubmitted edit form
    pub async fn update_event(&self, id: &str, form: &EventForm) -> Result<Event> {
        validate_event_form(form, &self.settings.events).into_result()?;
        self.manager.update_event(id, form.to_update_request()).await
    }

    /// Apply individual field changes without a full form
    pub async fn patch_event(&self, id: &str, request: UpdateEventRequest) -> Result<Event> {
        self.manager.update_event(id, request).await
    }

    pub async fn postpone_event(&self, id: &str, date_time: &str) -> Result<Event> {
        self.manager.postpone_event(id, date_time).await
    }

    pub async fn cancel_event(&self, id: &str) -> Result<Event> {
        self.manager.cancel_event(id).await
    }

    pub async fn cancel_events(&self, ids: &[String]) -> BulkCancelOutcome {
        self.manager.cancel_events(ids).await
    }

    pub async fn get_event(&self, id: &str) -> Result<Event> {
        self.manager.get_event(id).await
    }

    /// Events in insertion order
    pub async fn list_events(&self) -> Vec<Event> {
        self.manager.list_events().await
    }

    /// Events ordered by date and time
    pub async fn list_events_by_schedule(&self) -> Vec<Event> {
        let mut events = self.manager.list_events().await;
        sort_by_schedule(&mut events);
        events
    }

    pub async fn get_registered_count(&self, event_id: &str) -> Result<usize> {
        self.manager.registered_count(event_id).await
    }

    pub async fn get_participants(&self, event_id: &str) -> Result<Vec<Participant>> {
        self.roster().participants(event_id).await
    }

    pub async fn remove_participant(&self, event_id: &str, student_id: &str) -> Result<Registration> {
        self.roster().remove_participant(event_id, student_id).await
    }

    // Students

    /// Validate and store a student's profile, then remember them as the
    /// current user
    pub async fn sign_in(&self, form: &StudentForm) -> Result<Student> {
        validate_student_form(form).into_result()?;

        let student = Student {
            id: form.id.as_deref().and_then(non_blank).unwrap_or_else(generate_id),
            name: form.name.trim().to_string(),
            roll_number: form.roll_number.trim().to_string(),
            branch: form.branch.trim().to_string(),
            year: form.year.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: non_blank(&form.phone),
            is_admin: false,
        };

        let student = self.manager.save_student(student).await?;
        self.manager.set_current_user(&student).await?;
        debug!(student_id = %student.id, "Student signed in");
        Ok(student)
    }

    /// Sign in an administrator
    ///
    /// Admins skip student profile validation and are not added to the
    /// student directory, so they never show up in a roster.
    pub async fn sign_in_admin(&self, name: &str, email: &str) -> Result<Student> {
        if email.trim().is_empty() {
            return Err(CampusHubError::invalid("email", "Email is required"));
        }

        let admin = Student {
            id: generate_id(),
            name: name.trim().to_string(),
            roll_number: String::new(),
            branch: String::new(),
            year: String::new(),
            email: email.trim().to_string(),
            phone: None,
            is_admin: true,
        };

        self.manager.set_current_user(&admin).await?;
        info!(admin_id = %admin.id, "Admin signed in");
        Ok(admin)
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.manager.clear_current_user().await
    }

    pub async fn get_student(&self, student_id: &str) -> Result<Student> {
        self.manager
            .student(student_id)
            .await
            .ok_or_else(|| CampusHubError::StudentNotFound {
                student_id: student_id.to_string(),
            })
    }

    pub async fn current_user(&self) -> Result<Option<Student>> {
        self.manager.current_user().await
    }

    pub async fn register_for_event(&self, event_id: &str, student_id: &str) -> Result<Registration> {
        self.manager.register(event_id, student_id).await
    }

    pub async fn unregister(&self, event_id: &str, student_id: &str) -> Result<Registration> {
        self.manager.unregister(event_id, student_id).await
    }

    pub async fn is_registered(&self, event_id: &str, student_id: &str) -> bool {
        self.manager.is_registered(event_id, student_id).await
    }

    pub async fn registered_events(&self, student_id: &str) -> Vec<Event> {
        self.manager.registered_events(student_id).await
    }

    pub async fn toggle_interest(&self, event_id: &str, student_id: &str) -> Result<bool> {
        self.manager.toggle_interest(event_id, student_id).await
    }

    pub async fn interested_events(&self, student_id: &str) -> Vec<Event> {
        self.manager.interested_events(student_id).await
    }

    /// A student's registered and interested events on one day
    pub async fn my_day(&self, student_id: &str, day: NaiveDate) -> Vec<Event> {
        let (registered, interested) = self
            .manager
            .read(|ledger| (ledger.registered_events(student_id), ledger.interested_events(student_id)))
            .await;

        let mut combined = registered;
        for event in interested {
            if !combined.iter().any(|e| e.id == event.id) {
                combined.push(event);
            }
        }
        events_on(&combined, day)
    }
}
