mod support;

use std::thread;

use ledger_core::MessageRole;
use ledger_db::Db;
use support::{make_snapshot, setup_db};

#[test]
fn concurrent_increments_do_not_lose_updates() {
    let test_db = setup_db();
    let snapshot = make_snapshot("t1", "Groceries");
    let threads = 8u64;
    let per_thread = 25u64;

    thread::scope(|scope| {
        for worker in 0..threads {
            let path = test_db.path.clone();
            let snapshot = snapshot.clone();
            scope.spawn(move || {
                let db = Db::open(&path).expect("open db");
                for step in 0..per_thread {
                    let role = if step % 2 == 0 {
                        MessageRole::User
                    } else {
                        MessageRole::Assistant
                    };
                    db.increment_daily_summary("u1", "2025-03-10", &snapshot, role, worker + 1)
                        .expect("increment");
                }
            });
        }
    });

    let summary = test_db
        .db
        .get_daily_summary("u1", "2025-03-10", "t1")
        .expect("summary")
        .expect("row");
    let expected_tokens: u64 = (1..=threads).map(|tokens| tokens * per_thread).sum();
    assert_eq!(summary.total_messages, threads * per_thread);
    assert_eq!(summary.total_tokens, expected_tokens);
    assert_eq!(
        summary.user_messages + summary.ai_messages,
        summary.total_messages
    );
}

#[test]
fn increment_keeps_the_snapshot_seeded_on_insert() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let first = make_snapshot("t1", "Groceries");
    let later = make_snapshot("t1", "Food");
    db.increment_daily_summary("u1", "2025-03-10", &first, MessageRole::User, 2)
        .expect("first");
    db.increment_daily_summary("u1", "2025-03-10", &later, MessageRole::Assistant, 3)
        .expect("second");

    let summary = db
        .get_daily_summary("u1", "2025-03-10", "t1")
        .expect("summary")
        .expect("row");
    assert_eq!(summary.tracker_snapshot.tracker_name, "Groceries");
    assert_eq!(summary.total_messages, 2);
    assert_eq!(summary.user_messages, 1);
    assert_eq!(summary.ai_messages, 1);
}

#[test]
fn rows_are_keyed_by_user_day_and_tracker() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let groceries = make_snapshot("t1", "Groceries");
    let travel = make_snapshot("t2", "Travel");
    db.increment_daily_summary("u1", "2025-03-10", &groceries, MessageRole::User, 1)
        .expect("a");
    db.increment_daily_summary("u1", "2025-03-11", &groceries, MessageRole::User, 1)
        .expect("b");
    db.increment_daily_summary("u1", "2025-03-11", &travel, MessageRole::User, 1)
        .expect("c");
    db.increment_daily_summary("u2", "2025-03-11", &groceries, MessageRole::User, 1)
        .expect("d");

    let rows = db.list_daily_summaries("u1", "t1", 30).expect("rows");
    let days: Vec<&str> = rows.iter().map(|row| row.date.as_str()).collect();
    assert_eq!(days, vec!["2025-03-11", "2025-03-10"]);
    assert!(rows.iter().all(|row| row.total_messages == 1));
}
