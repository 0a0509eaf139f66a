use super::*;
use crate::FixedClock;
use chrono::{DateTime, Utc};
use shared::error::Field;

fn clock() -> Arc<dyn Clock> {
    let now = DateTime::parse_from_rfc3339("2026-02-13T09:15:00Z")
        .expect("timestamp")
        .with_timezone(&Utc);
    Arc::new(FixedClock::new(now))
}

fn input(site: &str, progress: i64) -> ReportInput {
    ReportInput {
        site: site.into(),
        work_completed: "Installed check dams".into(),
        progress_percent: progress,
        work_remaining: "Replant gully banks".into(),
        engineer: None,
        date: None,
        notes: None,
    }
}

#[test]
fn submit_creates_pending_report_dated_today() {
    let mut store = ReportStore::new(clock());
    let report = store
        .submit(&ReportInput {
            engineer: Some("E".into()),
            ..input("Gully Rehabilitation - Keffi", 50)
        })
        .expect("submit");

    assert_eq!(store.len(), 1);
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.engineer, "E");
    assert_eq!(report.site, Site::GullyRehabilitationKeffi);
    assert_eq!(report.date, NaiveDate::from_ymd_opt(2026, 2, 13).expect("date"));
    assert!(!report.id.to_string().is_empty());
    assert_eq!(store.list(), vec![report]);
}

#[test]
fn caller_supplied_date_is_kept() {
    let mut store = ReportStore::new(clock());
    let date = NaiveDate::from_ymd_opt(2026, 1, 30).expect("date");
    let report = store
        .submit(&ReportInput {
            date: Some(date),
            ..input("Soil Conservation - Lafia", 10)
        })
        .expect("submit");
    assert_eq!(report.date, date);
}

#[test]
fn missing_engineer_uses_configured_default() {
    let mut store = ReportStore::new(clock());
    let report = store
        .submit(&input("Soil Conservation - Lafia", 10))
        .expect("submit");
    assert_eq!(report.engineer, CURRENT_USER);

    let mut store = ReportStore::new(clock()).with_default_engineer("Field Engineer");
    let report = store
        .submit(&input("Soil Conservation - Lafia", 10))
        .expect("submit");
    assert_eq!(report.engineer, "Field Engineer");
}

#[test]
fn ids_stay_unique_across_many_submissions() {
    let mut store = ReportStore::new(clock());
    let mut ids = HashSet::new();
    for progress in 0..=100 {
        let report = store
            .submit(&input("Water Management - Akwanga", progress))
            .expect("submit");
        assert!(ids.insert(report.id), "duplicate id {}", report.id);
    }
    assert_eq!(store.len(), 101);
}

#[test]
fn newest_report_is_listed_first() {
    let mut store = ReportStore::new(clock());
    let a = store
        .submit(&input("Vegetation Recovery - Obi", 20))
        .expect("a");
    let b = store
        .submit(&input("Slope Stabilization - Wamba", 30))
        .expect("b");
    assert_eq!(store.list(), vec![b, a]);
}

#[test]
fn rejects_every_invalid_field_and_leaves_store_unchanged() {
    let mut store = ReportStore::seeded(clock());
    let before = store.list();
    let err = store
        .submit(&ReportInput {
            site: String::new(),
            work_completed: String::new(),
            progress_percent: 150,
            work_remaining: String::new(),
            engineer: None,
            date: None,
            notes: None,
        })
        .expect_err("should fail");

    for field in [
        Field::Site,
        Field::WorkCompleted,
        Field::ProgressPercent,
        Field::WorkRemaining,
    ] {
        assert!(err.contains(field), "missing {field}");
    }
    assert_eq!(err.fields.len(), 4);
    assert_eq!(store.list(), before);
}

#[test]
fn progress_bounds_are_inclusive() {
    let mut store = ReportStore::new(clock());
    for bad in [-1, 101] {
        let err = store
            .submit(&input("Terracing Project - Nasarawa", bad))
            .expect_err("out of range");
        assert_eq!(err, ValidationError::single(Field::ProgressPercent));
    }
    assert!(store.is_empty());

    for good in [0, 100] {
        store
            .submit(&input("Terracing Project - Nasarawa", good))
            .expect("in range");
    }
    assert_eq!(store.len(), 2);
}

#[test]
fn rejected_submission_does_not_consume_an_id() {
    let mut store = ReportStore::new(clock());
    store
        .submit(&input("Nowhere", 10))
        .expect_err("unknown site");
    let report = store
        .submit(&input("Soil Conservation - Lafia", 10))
        .expect("submit");
    assert_eq!(report.id, ReportId(1));
}

#[test]
fn status_moves_forward_and_only_status_changes() {
    let mut store = ReportStore::new(clock());
    let created = store
        .submit(&input("Soil Conservation - Lafia", 45))
        .expect("submit");

    let submitted = store
        .set_status(created.id, ReportStatus::Submitted)
        .expect("submitted");
    assert_eq!(submitted.status, ReportStatus::Submitted);
    assert_eq!(
        Report {
            status: ReportStatus::Pending,
            ..submitted.clone()
        },
        created
    );

    let approved = store
        .set_status(created.id, ReportStatus::Approved)
        .expect("approved");
    assert_eq!(approved.status, ReportStatus::Approved);
    assert_eq!(store.get(created.id), Some(&approved));
}

#[test]
fn approved_report_cannot_move_back_to_pending() {
    let mut store = ReportStore::seeded(clock());
    let err = store
        .set_status(ReportId(1), ReportStatus::Pending)
        .expect_err("terminal");
    assert!(matches!(
        err,
        StatusError::InvalidTransition {
            from: ReportStatus::Approved,
            to: ReportStatus::Pending,
            ..
        }
    ));
    assert_eq!(
        store.get(ReportId(1)).map(|r| r.status),
        Some(ReportStatus::Approved)
    );
}

#[test]
fn status_change_for_unknown_report_is_not_found() {
    let mut store = ReportStore::new(clock());
    let err = store
        .set_status(ReportId(42), ReportStatus::Approved)
        .expect_err("missing");
    assert_eq!(err, StatusError::NotFound(NotFoundError { id: ReportId(42) }));
}

#[test]
fn remove_drops_only_the_target() {
    let mut store = ReportStore::seeded(clock());
    let removed = store.remove(ReportId(2)).expect("remove");
    assert_eq!(removed.site, Site::SoilConservationLafia);
    assert_eq!(
        store.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![ReportId(1), ReportId(3)]
    );
    assert_eq!(
        store.remove(ReportId(2)).expect_err("already removed"),
        NotFoundError { id: ReportId(2) }
    );
}

#[test]
fn filters_by_site_and_status() {
    let mut store = ReportStore::seeded(clock());
    store
        .submit(&input("Gully Rehabilitation - Keffi", 80))
        .expect("submit");

    let keffi = store.for_site(Site::GullyRehabilitationKeffi);
    assert_eq!(keffi.len(), 2);
    assert_eq!(keffi[0].progress_percent, 80);

    assert_eq!(store.with_status(ReportStatus::Pending).len(), 1);
    assert_eq!(store.with_status(ReportStatus::Approved).len(), 3);
}

#[test]
fn restored_records_keep_order_and_continue_ids() {
    let seeded = ReportStore::seeded(clock()).list();
    let mut store = ReportStore::from_records(clock(), seeded.clone()).expect("restore");
    assert_eq!(store.list(), seeded);

    let next = store
        .submit(&input("Vegetation Recovery - Obi", 5))
        .expect("submit");
    assert_eq!(next.id, ReportId(4));
}

#[test]
fn restore_rejects_duplicate_ids() {
    let mut records = ReportStore::seeded(clock()).list();
    records[1].id = records[0].id;
    let err = ReportStore::from_records(clock(), records)
        .err()
        .expect("duplicate id");
    assert!(err.to_string().contains("duplicate report id rep-001"));
}

#[test]
fn submitted_notes_are_kept_trimmed() {
    let mut store = ReportStore::new(clock());
    let report = store
        .submit(&ReportInput {
            notes: Some("  Access road flooded ".into()),
            ..input("Erosion Control - Nasarawa", 30)
        })
        .expect("submit");
    assert_eq!(report.notes.as_deref(), Some("Access road flooded"));

    let bare = store
        .submit(&ReportInput {
            notes: Some("   ".into()),
            ..input("Erosion Control - Nasarawa", 31)
        })
        .expect("submit");
    assert_eq!(bare.notes, None);
}

fn restore_error(records: Vec<Report>) -> String {
    let err = ReportStore::from_records(clock(), records)
        .err()
        .expect("restore should fail");
    format!("{err:#}")
}

#[test]
fn restore_rejects_progress_out_of_range() {
    let mut records = ReportStore::seeded(clock()).list();
    records[1].progress_percent = 250;
    let err = restore_error(records);
    assert!(err.contains("restored report rep-002 is invalid"), "{err}");
    assert!(err.contains("progress_percent"), "{err}");
}

#[test]
fn restore_rejects_blank_work_descriptions() {
    let mut records = ReportStore::seeded(clock()).list();
    records[0].work_completed = String::new();
    let err = restore_error(records);
    assert!(err.contains("restored report rep-001 is invalid"), "{err}");
    assert!(err.contains("work_completed"), "{err}");

    let mut records = ReportStore::seeded(clock()).list();
    records[2].work_remaining = "   ".into();
    let err = restore_error(records);
    assert!(err.contains("restored report rep-003 is invalid"), "{err}");
}

#[test]
fn restore_rejects_non_positive_ids() {
    let mut records = ReportStore::seeded(clock()).list();
    records[0].id = ReportId(0);
    assert!(restore_error(records).contains("id 0 is not positive"));

    let mut records = ReportStore::seeded(clock()).list();
    records[0].id = ReportId(-4);
    assert!(restore_error(records).contains("id -4 is not positive"));
}

#[test]
fn restore_rejects_ids_that_leave_no_room() {
    let mut records = ReportStore::seeded(clock()).list();
    records[0].id = ReportId(i64::MAX);
    assert!(restore_error(records).contains("no room"));
}
