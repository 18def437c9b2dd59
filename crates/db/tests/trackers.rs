mod support;

use ledger_core::{ExpenseQueryFilter, MessageRole, TimeRange, TrackerType};
use ledger_db::DEFAULT_RETENTION_DAYS;
use support::{log, make_event, make_expense, make_snapshot, make_tracker, setup_db};

fn all_time(user_id: &str) -> ExpenseQueryFilter {
    ExpenseQueryFilter {
        user_id: user_id.to_string(),
        range: TimeRange {
            start: "2000-01-01T00:00:00.000Z".to_string(),
            end: "2100-01-01T00:00:00.000Z".to_string(),
        },
        category_id: None,
        tracker_id: None,
    }
}

#[test]
fn trackers_are_scoped_to_their_owner() {
    let test_db = setup_db();
    let db = &test_db.db;
    db.insert_tracker(&make_tracker("t1", "u1", "Groceries", TrackerType::Personal))
        .expect("insert");

    assert!(db.get_tracker("u1", "t1").expect("owner").is_some());
    assert!(db.get_tracker("u2", "t1").expect("stranger").is_none());
    assert!(
        db.update_tracker_identity("u2", "t1", "Mine", TrackerType::Business, "2025-02-01T00:00:00.000Z")
            .expect("update")
            .is_none()
    );
}

#[test]
fn update_tracker_identity_returns_the_new_row() {
    let test_db = setup_db();
    let db = &test_db.db;
    db.insert_tracker(&make_tracker("t1", "u1", "Groceries", TrackerType::Personal))
        .expect("insert");

    let updated = db
        .update_tracker_identity("u1", "t1", "Food", TrackerType::Business, "2025-02-01T00:00:00.000Z")
        .expect("update")
        .expect("row");

    assert_eq!(updated.name, "Food");
    assert_eq!(updated.tracker_type, TrackerType::Business);
    assert_eq!(updated.updated_at, "2025-02-01T00:00:00.000Z");
    assert_eq!(updated.created_at, "2025-01-01T00:00:00.000Z");
}

#[test]
fn delete_tracker_drops_expenses_but_not_usage_history() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    db.insert_tracker(&make_tracker("t1", "u1", "Groceries", TrackerType::Personal))
        .expect("insert");
    db.insert_expenses(&[
        make_expense("x1", "t1", "Food", 10.0, "2025-03-10T09:00:00.000Z"),
        make_expense("x2", "t2", "Food", 20.0, "2025-03-10T09:00:00.000Z"),
    ])
    .expect("expenses");
    let snapshot = make_snapshot("t1", "Groceries");
    log(
        db,
        &make_event("e1", "u1", &snapshot, MessageRole::User, 5, "2025-03-10T09:00:00.000Z"),
    );

    assert!(db.delete_tracker("u1", "t1").expect("delete"));
    assert!(!db.delete_tracker("u1", "t1").expect("second delete"));

    let remaining = db.list_expenses(&all_time("u1")).expect("expenses");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].tracker_id, "t2");
    assert_eq!(db.count_usage_events("u1", Some("t1")).expect("count"), 1);
}

#[test]
fn retention_setting_defaults_and_persists() {
    let test_db = setup_db();
    let db = &test_db.db;
    assert_eq!(
        db.get_usage_retention_days().expect("default"),
        DEFAULT_RETENTION_DAYS
    );

    db.set_usage_retention_days(30).expect("set");
    assert_eq!(db.get_usage_retention_days().expect("stored"), 30);

    db.set_setting("usage_retention_days", "soon").expect("garbage");
    assert_eq!(
        db.get_usage_retention_days().expect("fallback"),
        DEFAULT_RETENTION_DAYS
    );
}
