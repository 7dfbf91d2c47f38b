//! Audit history integration tests against an on-disk database.
//!
//! - record then query, newest first, with paging counts
//! - history survives reopening the database file
//! - auto-completion changes only past-due appointments and audits them
//! - string entry points reject unknown tags

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use osseo_core::entities::NewAuditEntry;
use osseo_core::enums::{AppointmentStatus, AuditAction, EntityType};
use osseo_core::identity::Actor;
use osseo_core::responses::UNKNOWN_USER_LABEL;
use osseo_db::repos::audit::AuditFilter;
use osseo_db::service::ClinicService;

async fn open(dir: &TempDir) -> ClinicService {
    let path = dir.path().join("osseo.db");
    ClinicService::new_local(path.to_str().unwrap(), None)
        .await
        .unwrap()
}

#[tokio::test]
async fn five_entries_paged_by_three() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir).await;

    let actions = [
        AuditAction::Create,
        AuditAction::View,
        AuditAction::Update,
        AuditAction::View,
        AuditAction::Archive,
    ];
    for action in actions {
        svc.record_audit(NewAuditEntry::new(EntityType::Patient, "pat-42", action))
            .await
            .unwrap();
    }
    svc.record_audit(NewAuditEntry::new(EntityType::Patient, "pat-other", AuditAction::View))
        .await
        .unwrap();

    let page = svc
        .query_audit(EntityType::Patient, "pat-42", Some(3))
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.entries.len(), 3);
    assert_eq!(page.remaining, 2);
    assert!(page.has_more);

    let got: Vec<_> = page.entries.iter().map(|v| v.entry.action).collect();
    assert_eq!(
        got,
        vec![AuditAction::Archive, AuditAction::View, AuditAction::Update]
    );
    for view in &page.entries {
        assert_eq!(view.actor_display_name, UNKNOWN_USER_LABEL);
    }
}

#[tokio::test]
async fn history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let svc = open(&dir).await;
        let user = svc.create_user("Dr. Vidal").await.unwrap();
        let svc = svc.with_actor(Some(Actor::new(user.id)));
        svc.record_audit(
            NewAuditEntry::new(EntityType::Implant, "imp-7", AuditAction::Create)
                .with_details("Straumann BLT 4.1x10"),
        )
        .await
        .unwrap();
    }

    let svc = open(&dir).await;
    let page = svc
        .query_audit(EntityType::Implant, "imp-7", None)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.entries[0].actor_display_name, "Dr. Vidal");
    assert_eq!(
        page.entries[0].entry.details.as_deref(),
        Some("Straumann BLT 4.1x10")
    );
}

#[tokio::test]
async fn auto_complete_two_appointments() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir).await;
    let now = Utc::now();

    let past = svc
        .create_appointment(
            "pat-1",
            "Healing abutment",
            now - Duration::days(1) - Duration::hours(1),
            now - Duration::days(1),
        )
        .await
        .unwrap();
    let future = svc
        .create_appointment(
            "pat-2",
            "Final crown",
            now + Duration::days(1),
            now + Duration::days(1) + Duration::hours(1),
        )
        .await
        .unwrap();

    let completed = svc.complete_past_due_appointments(now).await.unwrap();
    assert_eq!(completed, vec![past.id.clone()]);

    assert_eq!(
        svc.get_appointment(&past.id).await.unwrap().status,
        AppointmentStatus::Completed
    );
    assert_eq!(
        svc.get_appointment(&future.id).await.unwrap().status,
        AppointmentStatus::Upcoming
    );

    let updates = svc
        .list_audit(&AuditFilter {
            entity_type: Some(EntityType::Appointment),
            action: Some(AuditAction::Update),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].entry.entity_id, past.id);
}

#[tokio::test]
async fn raw_tags_are_validated() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir).await;

    let err = svc
        .record_audit_raw("patient", "pat-1", "TELEPORT", None, None)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    let err = svc.query_audit_raw("SPACESHIP", "x", None).await.unwrap_err();
    assert!(err.is_validation());

    let entry = svc
        .record_audit_raw("radio", "rad-3", "view", None, None)
        .await
        .unwrap();
    assert_eq!(entry.entity_type, EntityType::Radio);

    let page = svc.query_audit_raw("RADIO", "rad-3", None).await.unwrap();
    assert_eq!(page.total, 1);
}
