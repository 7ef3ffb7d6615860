//! Event lifecycle integration tests
//!
//! Admin-side flows through the hub: create, edit, postpone, cancel.

mod helpers;

use assert_matches::assert_matches;
use campus_hub::models::{EventStatus, UpdateEventRequest};
use campus_hub::{CampusHubError, StoreChange};
use helpers::*;

#[tokio::test]
async fn test_create_event_starts_upcoming_with_full_capacity() {
    let ctx = TestContext::new().await;

    let event = ctx.hub.create_event(&event_form("Robotics Workshop", 40)).await.unwrap();
    assert_eq!(event.status, EventStatus::Upcoming);
    assert_eq!(event.total_capacity, 40);
    assert_eq!(event.remaining_seats, 40);
    assert_eq!(event.contact_email.as_deref(), Some("events@campus.edu"));
    assert_eq!(event.contact_phone, None);

    let listed = ctx.hub.list_events().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, event.id);
}

#[tokio::test]
async fn test_invalid_form_never_reaches_the_store() {
    let ctx = TestContext::new().await;

    let mut form = event_form("Quiz Night", 10);
    form.title = "   ".to_string();
    form.total_capacity = "ten".to_string();
    form.date = "20/11/2025".to_string();

    let err = ctx.hub.create_event(&form).await.unwrap_err();
    let CampusHubError::Validation(errors) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert!(errors.contains("title"));
    assert!(errors.contains("totalCapacity"));
    assert!(errors.contains("date"));

    assert!(ctx.hub.list_events().await.is_empty());
    assert_eq!(ctx.gateway.write_count(), 0);
}

#[tokio::test]
async fn test_capacity_above_configured_ceiling_is_rejected() {
    let ctx = TestContext::new().await;

    let err = ctx.hub.create_event(&event_form("Convocation", 501)).await.unwrap_err();
    assert_matches!(err, CampusHubError::Validation(ref errors) if errors.contains("totalCapacity"));
}

#[tokio::test]
async fn test_capacity_update_guarded_by_active_registrations() {
    let ctx = TestContext::new().await;
    let event = ctx.hub.create_event(&event_form("Hackathon", 10)).await.unwrap();
    for student in [STUDENT_A, STUDENT_B, STUDENT_C] {
        ctx.hub.register_for_event(&event.id, student).await.unwrap();
    }

    let err = ctx.hub.update_event(&event.id, &event_form("Hackathon", 2)).await.unwrap_err();
    assert_matches!(
        err,
        CampusHubError::CapacityViolation { requested: 2, active: 3, .. }
    );
    let unchanged = ctx.hub.get_event(&event.id).await.unwrap();
    assert_eq!(unchanged.total_capacity, 10);
    assert_eq!(unchanged.remaining_seats, 7);

    let updated = ctx.hub.update_event(&event.id, &event_form("Hackathon", 5)).await.unwrap();
    assert_eq!(updated.total_capacity, 5);
    assert_eq!(updated.remaining_seats, 2);
}

#[tokio::test]
async fn test_patch_merges_only_given_fields() {
    let ctx = TestContext::new().await;
    let event = ctx.hub.create_event(&event_form("Film Club", 30)).await.unwrap();

    let patched = ctx
        .hub
        .patch_event(
            &event.id,
            UpdateEventRequest {
                venue: Some("Seminar Hall 2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.venue, "Seminar Hall 2");
    assert_eq!(patched.title, "Film Club");
    assert_eq!(patched.total_capacity, 30);
    assert_eq!(patched.status, EventStatus::Upcoming);
}

#[tokio::test]
async fn test_edit_form_clears_blanked_contact_fields() {
    let ctx = TestContext::new().await;
    let event = ctx.hub.create_event(&event_form("Robotics Expo", 40)).await.unwrap();
    assert_eq!(event.contact_email.as_deref(), Some("events@campus.edu"));

    let mut form = event_form("Robotics Expo", 40);
    form.contact_name = "   ".to_string();
    form.contact_email = String::new();
    let updated = ctx.hub.update_event(&event.id, &form).await.unwrap();

    assert_eq!(updated.contact_name, None);
    assert_eq!(updated.contact_email, None);
    assert_eq!(ctx.hub.get_event(&event.id).await.unwrap().contact_email, None);
}

#[tokio::test]
async fn test_postpone_keeps_seats_and_can_repeat() {
    let ctx = TestContext::new().await;
    let event = ctx.hub.create_event(&event_form("Alumni Talk", 3)).await.unwrap();
    ctx.hub.register_for_event(&event.id, STUDENT_A).await.unwrap();

    let postponed = ctx.hub.postpone_event(&event.id, "2025-12-01 15:00").await.unwrap();
    assert_eq!(postponed.status, EventStatus::Postponed);
    assert_eq!(postponed.date, "2025-12-01");
    assert_eq!(postponed.time, "15:00");
    assert_eq!(postponed.remaining_seats, 2);

    let again = ctx.hub.postpone_event(&event.id, "2025-12-08 11:30").await.unwrap();
    assert_eq!(again.status, EventStatus::Postponed);
    assert_eq!(again.date, "2025-12-08");

    // Registration stays open while postponed
    ctx.hub.register_for_event(&event.id, STUDENT_B).await.unwrap();
    assert_eq!(ctx.hub.get_event(&event.id).await.unwrap().remaining_seats, 1);
}

#[tokio::test]
async fn test_postpone_rejects_malformed_date_time() {
    let ctx = TestContext::new().await;
    let event = ctx.hub.create_event(&event_form("Blood Drive", 50)).await.unwrap();

    for bad in ["", "2025-12-01", "tomorrow 15:00", "2025-12-01 3pm"] {
        let err = ctx.hub.postpone_event(&event.id, bad).await.unwrap_err();
        assert_matches!(err, CampusHubError::Validation(_), "input {:?}", bad);
    }

    let unchanged = ctx.hub.get_event(&event.id).await.unwrap();
    assert_eq!(unchanged.status, EventStatus::Upcoming);
    assert_eq!(unchanged.date, "2025-11-20");
}

#[tokio::test]
async fn test_postpone_reports_missing_or_cancelled_before_bad_input() {
    let ctx = TestContext::new().await;
    let event = ctx.hub.create_event(&event_form("Quiz Night", 20)).await.unwrap();
    ctx.hub.cancel_event(&event.id).await.unwrap();

    assert_matches!(
        ctx.hub.postpone_event(&event.id, "").await,
        Err(CampusHubError::EventCancelled { .. })
    );
    assert_matches!(
        ctx.hub.postpone_event("missing", "tomorrow").await,
        Err(CampusHubError::EventNotFound { .. })
    );
}

#[tokio::test]
async fn test_cancelled_event_is_terminal() {
    let ctx = TestContext::new().await;
    let event = ctx.hub.create_event(&event_form("Cultural Fest", 100)).await.unwrap();

    let cancelled = ctx.hub.cancel_event(&event.id).await.unwrap();
    assert_eq!(cancelled.status, EventStatus::Cancelled);

    assert_matches!(
        ctx.hub.register_for_event(&event.id, STUDENT_A).await,
        Err(CampusHubError::EventCancelled { .. })
    );
    assert_matches!(
        ctx.hub.update_event(&event.id, &event_form("Cultural Fest", 120)).await,
        Err(CampusHubError::EventCancelled { .. })
    );
    assert_matches!(
        ctx.hub.postpone_event(&event.id, "2025-12-01 15:00").await,
        Err(CampusHubError::EventCancelled { .. })
    );
    // A second cancel is rejected, not silently accepted
    assert_matches!(
        ctx.hub.cancel_event(&event.id).await,
        Err(CampusHubError::EventCancelled { .. })
    );

    assert_eq!(ctx.hub.get_event(&event.id).await.unwrap().status, EventStatus::Cancelled);
}

#[tokio::test]
async fn test_unknown_event_is_reported() {
    let ctx = TestContext::new().await;

    assert_matches!(ctx.hub.get_event("nope").await, Err(CampusHubError::EventNotFound { .. }));
    assert_matches!(ctx.hub.cancel_event("nope").await, Err(CampusHubError::EventNotFound { .. }));
    assert_matches!(
        ctx.hub.update_event("nope", &event_form("Ghost", 5)).await,
        Err(CampusHubError::EventNotFound { .. })
    );
    assert_matches!(ctx.hub.get_registered_count("nope").await, Err(CampusHubError::EventNotFound { .. }));
}

#[tokio::test]
async fn test_bulk_cancel_is_best_effort() {
    let ctx = TestContext::new().await;
    let first = ctx.hub.create_event(&event_form("Seminar A", 10)).await.unwrap();
    let second = ctx.hub.create_event(&event_form("Seminar B", 10)).await.unwrap();
    ctx.hub.cancel_event(&second.id).await.unwrap();
    let third = ctx.hub.create_event(&event_form("Seminar C", 10)).await.unwrap();

    let ids = vec![first.id.clone(), second.id.clone(), "missing".to_string(), third.id.clone()];
    let outcome = ctx.hub.cancel_events(&ids).await;

    assert!(!outcome.all_succeeded());
    assert_eq!(outcome.cancelled, vec![first.id.clone(), third.id.clone()]);
    assert_eq!(outcome.failed.len(), 2);
    assert_eq!(outcome.failed[0].0, second.id);
    assert_matches!(outcome.failed[0].1, CampusHubError::EventCancelled { .. });
    assert_matches!(outcome.failed[1].1, CampusHubError::EventNotFound { .. });

    for event in ctx.hub.list_events().await {
        assert_eq!(event.status, EventStatus::Cancelled);
    }
}

#[tokio::test]
async fn test_list_events_keeps_insertion_order_and_schedule_view_sorts() {
    let ctx = TestContext::new().await;

    let mut late = event_form("Late", 5);
    late.date = "2025-12-10".to_string();
    let mut early = event_form("Early", 5);
    early.date = "2025-11-01".to_string();
    let mut same_day_morning = event_form("Morning", 5);
    same_day_morning.date = "2025-12-10".to_string();
    same_day_morning.time = "08:00".to_string();

    for form in [&late, &early, &same_day_morning] {
        ctx.hub.create_event(form).await.unwrap();
    }

    let inserted: Vec<String> = ctx.hub.list_events().await.into_iter().map(|e| e.title).collect();
    assert_eq!(inserted, vec!["Late", "Early", "Morning"]);

    let scheduled: Vec<String> = ctx.hub.list_events_by_schedule().await.into_iter().map(|e| e.title).collect();
    assert_eq!(scheduled, vec!["Early", "Morning", "Late"]);
}

#[tokio::test]
async fn test_committed_mutations_are_published() {
    let ctx = TestContext::new().await;
    let mut changes = ctx.hub.subscribe();

    let event = ctx.hub.create_event(&event_form("Startup Pitch", 1)).await.unwrap();
    ctx.hub.register_for_event(&event.id, STUDENT_A).await.unwrap();
    // Rejected mutations publish nothing
    assert!(ctx.hub.register_for_event(&event.id, STUDENT_B).await.is_err());
    ctx.hub.cancel_event(&event.id).await.unwrap();

    assert_eq!(
        changes.recv().await.unwrap(),
        StoreChange::EventCreated { event_id: event.id.clone() }
    );
    assert_eq!(
        changes.recv().await.unwrap(),
        StoreChange::Registered {
            event_id: event.id.clone(),
            student_id: STUDENT_A.to_string(),
            remaining_seats: 0,
        }
    );
    assert_eq!(
        changes.recv().await.unwrap(),
        StoreChange::EventCancelled { event_id: event.id.clone() }
    );
    assert!(changes.try_recv().is_err());
}
