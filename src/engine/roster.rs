//! Participant roster
//!
//! Admin view of who holds a seat. Each entry is built from an allow-list
//! of identity fields; contact details and anything else on the student
//! record never leave the engine through here.

use super::ledger::Ledger;
use super::lifecycle::LifecycleManager;
use crate::models::{Participant, Registration, Student};
use crate::utils::errors::{CampusHubError, Result};
use crate::utils::logging::log_admin_action;

/// Build the redacted roster entry for one registration
pub fn to_participant(registration: &Registration, student: Option<&Student>) -> Participant {
    Participant {
        id: registration.id.clone(),
        student_id: registration.student_id.clone(),
        name: student.map(|s| s.name.clone()),
        roll_number: student.map(|s| s.roll_number.clone()),
        branch: student.map(|s| s.branch.clone()),
        year: student.map(|s| s.year.clone()),
        registered_at: registration.registered_at,
    }
}

/// Active participants of an event, oldest registration first
pub fn participants(ledger: &Ledger, event_id: &str) -> Result<Vec<Participant>> {
    if !ledger.events().contains(event_id) {
        return Err(CampusHubError::EventNotFound {
            event_id: event_id.to_string(),
        });
    }

    Ok(ledger
        .registrations()
        .list_active(event_id)
        .into_iter()
        .map(|registration| to_participant(registration, ledger.students().get(&registration.student_id)))
        .collect())
}

pub struct ParticipantRoster<'a> {
    manager: &'a LifecycleManager,
}

impl<'a> ParticipantRoster<'a> {
    pub fn new(manager: &'a LifecycleManager) -> Self {
        Self { manager }
    }

    pub async fn participants(&self, event_id: &str) -> Result<Vec<Participant>> {
        self.manager.read(|ledger| participants(ledger, event_id)).await
    }

    /// Admin-initiated removal; frees the seat like a self-unregister
    pub async fn remove_participant(&self, event_id: &str, student_id: &str) -> Result<Registration> {
        let registration = self.manager.unregister(event_id, student_id).await?;
        log_admin_action("remove_participant", Some(event_id), Some(student_id));
        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateEventRequest, RegistrationStatus};
    use crate::persistence::MemoryGateway;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use std::sync::Arc;

    fn student(id: &str) -> Student {
        Student {
            id: id.to_string(),
            name: format!("Student {}", id),
            roll_number: format!("ROLL-{}", id),
            branch: "ECE".to_string(),
            year: "2".to_string(),
            email: format!("{}@campus.edu", id),
            phone: Some("+91 98765 43210".to_string()),
            is_admin: false,
        }
    }

    #[test]
    fn test_participant_exposes_only_allow_listed_fields() {
        let registration = Registration {
            id: "r1".to_string(),
            event_id: "e1".to_string(),
            student_id: "s1".to_string(),
            status: RegistrationStatus::Active,
            registered_at: Utc::now(),
            removed_at: None,
        };

        let participant = to_participant(&registration, Some(&student("s1")));
        let value = serde_json::to_value(&participant).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["branch", "id", "name", "registeredAt", "rollNumber", "studentId", "year"]
        );
        assert!(!value.to_string().contains("campus.edu"));
    }

    #[test]
    fn test_unknown_student_yields_empty_identity() {
        let registration = Registration {
            id: "r1".to_string(),
            event_id: "e1".to_string(),
            student_id: "ghost".to_string(),
            status: RegistrationStatus::Active,
            registered_at: Utc::now(),
            removed_at: None,
        };

        let participant = to_participant(&registration, None);
        assert_eq!(participant.student_id, "ghost");
        assert_eq!(participant.name, None);
    }

    #[tokio::test]
    async fn test_remove_participant_frees_seat() {
        let manager = LifecycleManager::open(Arc::new(MemoryGateway::new())).await.unwrap();
        let event = manager
            .create_event(CreateEventRequest {
                title: "Coding Contest".to_string(),
                description: String::new(),
                date: "2025-11-15".to_string(),
                time: "09:00".to_string(),
                venue: "Lab 1".to_string(),
                event_type: "Technical".to_string(),
                cover_image_url: None,
                total_capacity: 2,
                contact_name: None,
                contact_email: None,
                contact_phone: None,
            })
            .await
            .unwrap();
        manager.save_student(student("s1")).await.unwrap();
        manager.register(&event.id, "s1").await.unwrap();
        manager.register(&event.id, "s2").await.unwrap();

        let roster = ParticipantRoster::new(&manager);
        let listed = roster.participants(&event.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name.as_deref(), Some("Student s1"));
        assert_eq!(listed[1].name, None);

        roster.remove_participant(&event.id, "s1").await.unwrap();
        let listed = roster.participants(&event.id).await.unwrap();
        assert_eq!(listed.iter().map(|p| p.student_id.as_str()).collect::<Vec<_>>(), vec!["s2"]);
        assert_eq!(manager.get_event(&event.id).await.unwrap().remaining_seats, 1);

        assert_matches!(
            roster.remove_participant(&event.id, "s1").await,
            Err(CampusHubError::NotRegistered { .. })
        );
        assert_matches!(roster.participants("missing").await, Err(CampusHubError::EventNotFound { .. }));
    }
}
