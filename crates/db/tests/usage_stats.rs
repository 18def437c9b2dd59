mod support;

use ledger_core::MessageRole;
use support::{log, make_event, make_snapshot, setup_db};

#[test]
fn usage_by_tracker_sorts_busiest_first_and_keeps_first_seen_identity() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let groceries = make_snapshot("t1", "Groceries");
    let renamed = make_snapshot("t1", "Food");
    let travel = make_snapshot("t2", "Travel");
    db.increment_daily_summary("u1", "2025-03-10", &groceries, MessageRole::User, 10)
        .expect("a");
    db.increment_daily_summary("u1", "2025-03-11", &renamed, MessageRole::User, 10)
        .expect("b");
    for _ in 0..3 {
        db.increment_daily_summary("u1", "2025-03-11", &travel, MessageRole::Assistant, 1)
            .expect("c");
    }

    let by_tracker = db.usage_by_tracker("u1").expect("by tracker");

    assert_eq!(by_tracker.len(), 2);
    assert_eq!(by_tracker[0].tracker_id, "t2");
    assert_eq!(by_tracker[0].message_count, 3);
    assert_eq!(by_tracker[0].token_count, 3);
    assert_eq!(by_tracker[1].tracker_id, "t1");
    assert_eq!(by_tracker[1].tracker_name, "Groceries");
    assert_eq!(by_tracker[1].message_count, 2);
    assert_eq!(by_tracker[1].token_count, 20);
}

#[test]
fn usage_totals_span_trackers_and_respect_the_filter() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let groceries = make_snapshot("t1", "Groceries");
    let travel = make_snapshot("t2", "Travel");
    log(
        db,
        &make_event("e1", "u1", &groceries, MessageRole::User, 5, "2025-03-10T09:00:00.000Z"),
    );
    log(
        db,
        &make_event("e2", "u1", &travel, MessageRole::Assistant, 7, "2025-03-11T09:00:00.000Z"),
    );

    let overall = db.usage_totals("u1", None).expect("overall");
    assert_eq!(overall.total_messages, 2);
    assert_eq!(overall.total_tokens, 12);
    assert_eq!(overall.user_messages, 1);
    assert_eq!(overall.ai_messages, 1);

    let travel_only = db.usage_totals("u1", Some("t2")).expect("travel");
    assert_eq!(travel_only.total_messages, 1);
    assert_eq!(travel_only.ai_messages, 1);

    let nobody = db.usage_totals("u9", None).expect("empty");
    assert_eq!(nobody.total_messages, 0);
}

#[test]
fn daily_activity_groups_days_across_trackers() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let groceries = make_snapshot("t1", "Groceries");
    let travel = make_snapshot("t2", "Travel");
    db.increment_daily_summary("u1", "2025-02-01", &groceries, MessageRole::User, 9)
        .expect("old");
    db.increment_daily_summary("u1", "2025-03-11", &groceries, MessageRole::User, 2)
        .expect("a");
    db.increment_daily_summary("u1", "2025-03-11", &travel, MessageRole::User, 3)
        .expect("b");
    db.increment_daily_summary("u1", "2025-03-10", &travel, MessageRole::User, 4)
        .expect("c");

    let activity = db
        .daily_activity_since("u1", "2025-03-01")
        .expect("activity");

    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].date, "2025-03-10");
    assert_eq!(activity[0].message_count, 1);
    assert_eq!(activity[1].date, "2025-03-11");
    assert_eq!(activity[1].message_count, 2);
    assert_eq!(activity[1].token_count, 5);
}

#[test]
fn summarized_tracker_is_none_without_rows() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    assert!(db.summarized_tracker("u1", "t1").expect("lookup").is_none());

    let snapshot = make_snapshot("t1", "Groceries");
    db.increment_daily_summary("u1", "2025-03-10", &snapshot, MessageRole::User, 1)
        .expect("increment");
    let identity = db
        .summarized_tracker("u1", "t1")
        .expect("lookup")
        .expect("identity");
    assert_eq!(identity.tracker_name, "Groceries");
    assert!(!identity.is_deleted);
}
