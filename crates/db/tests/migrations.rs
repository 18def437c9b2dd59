mod support;

use ledger_core::MessageRole;
use rusqlite::Connection;
use support::{log, make_event, make_snapshot, setup_db};

#[test]
fn migrate_is_repeatable_and_keeps_rows() {
    let mut test_db = setup_db();
    let snapshot = make_snapshot("t1", "Groceries");
    log(
        &mut test_db.db,
        &make_event("e1", "u1", &snapshot, MessageRole::User, 5, "2025-03-10T09:00:00.000Z"),
    );

    test_db.db.migrate().expect("second migrate");

    assert_eq!(test_db.db.count_usage_events("u1", None).expect("count"), 1);
}

#[test]
fn migrate_creates_every_table() {
    let test_db = setup_db();
    let conn = Connection::open(&test_db.path).expect("open conn");
    for table in [
        "tracker",
        "usage_event",
        "daily_usage_summary",
        "app_setting",
        "expense",
    ] {
        let found: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .expect("lookup table");
        assert_eq!(found, 1, "missing table {table}");
    }
}

#[test]
fn negative_token_counts_are_rejected_by_the_schema() {
    let test_db = setup_db();
    let conn = Connection::open(&test_db.path).expect("open conn");
    let result = conn.execute(
        r#"
        INSERT INTO usage_event (
          id, user_id, tracker_id, tracker_name, tracker_type, tracker_is_deleted,
          tracker_deleted_at, tracker_modified_at, message_role, message_content,
          token_count, ts
        ) VALUES (
          'e1', 'u1', 't1', 'Groceries', 'personal', 0, NULL,
          '2025-01-01T00:00:00.000Z', 'user', 'hi', -1, '2025-03-10T09:00:00.000Z'
        )
        "#,
        [],
    );
    assert!(result.is_err());
}
