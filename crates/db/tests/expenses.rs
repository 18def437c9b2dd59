mod support;

use chrono::Utc;
use ledger_core::{ExpenseQueryFilter, TimeRange};
use support::{make_expense, setup_db};

fn march_filter() -> ExpenseQueryFilter {
    ExpenseQueryFilter {
        user_id: "u1".to_string(),
        range: TimeRange {
            start: "2025-03-01T00:00:00.000Z".to_string(),
            end: "2025-03-31T23:59:59.999Z".to_string(),
        },
        category_id: None,
        tracker_id: None,
    }
}

fn seed(db: &mut ledger_db::Db) {
    let mut other_user = make_expense("x1", "t1", "Food", 999.0, "2025-03-05T10:00:00.000Z");
    other_user.user_id = "u2".to_string();
    db.insert_expenses(&[
        make_expense("x2", "t1", "Food", 50.0, "2025-03-01T00:00:00.000Z"),
        make_expense("x3", "t1", "Food", 150.0, "2025-03-15T12:00:00.000Z"),
        make_expense("x4", "t2", "Travel", 400.0, "2025-03-31T23:59:59.999Z"),
        make_expense("x5", "t1", "Bills", 25.0, "2025-04-01T00:00:00.000Z"),
        other_user,
    ])
    .expect("insert expenses");
}

#[test]
fn summary_stats_on_empty_window_are_zero() {
    let test_db = setup_db();
    let stats = test_db.db.summary_stats(&march_filter()).expect("stats");

    assert_eq!(stats.count, 0);
    assert_eq!(stats.total, 0.0);
    assert_eq!(stats.average, 0.0);
    assert!(!stats.average.is_nan());
    assert_eq!(test_db.db.total_expenses(&march_filter()).expect("total"), 0.0);
}

#[test]
fn summary_stats_include_both_window_endpoints() {
    let mut test_db = setup_db();
    seed(&mut test_db.db);

    let stats = test_db.db.summary_stats(&march_filter()).expect("stats");

    assert_eq!(stats.count, 3);
    assert!((stats.total - 600.0).abs() < 1e-9);
    assert!((stats.average - 200.0).abs() < 1e-9);
}

#[test]
fn filters_are_conjunctive() {
    let mut test_db = setup_db();
    seed(&mut test_db.db);

    let mut filter = march_filter();
    filter.tracker_id = Some("t1".to_string());
    assert!((test_db.db.total_expenses(&filter).expect("t1") - 200.0).abs() < 1e-9);

    filter.category_id = Some("cat-travel".to_string());
    let stats = test_db.db.summary_stats(&filter).expect("none");
    assert_eq!(stats.count, 0);

    filter.tracker_id = None;
    assert!((test_db.db.total_expenses(&filter).expect("travel") - 400.0).abs() < 1e-9);
}

#[test]
fn expenses_by_category_is_sorted_by_total() {
    let mut test_db = setup_db();
    seed(&mut test_db.db);

    let breakdown = test_db
        .db
        .expenses_by_category(&march_filter())
        .expect("breakdown");

    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].category, "Travel");
    assert_eq!(breakdown[0].category_id, "cat-travel");
    assert_eq!(breakdown[0].count, 1);
    assert_eq!(breakdown[1].category, "Food");
    assert!((breakdown[1].total - 200.0).abs() < 1e-9);
    assert_eq!(breakdown[1].count, 2);
}

#[test]
fn expenses_by_month_always_returns_twelve_buckets() {
    let mut test_db = setup_db();
    seed(&mut test_db.db);
    test_db
        .db
        .insert_expenses(&[make_expense(
            "x6",
            "t1",
            "Food",
            70.0,
            "2024-12-31T23:00:00.000Z",
        )])
        .expect("insert");

    let months = test_db
        .db
        .expenses_by_month_in("u1", 2025, None, &Utc)
        .expect("months");

    assert_eq!(months.len(), 12);
    assert_eq!(
        months.iter().map(|month| month.month).collect::<Vec<_>>(),
        (1..=12).collect::<Vec<_>>()
    );
    assert_eq!(months[2].count, 3);
    assert!((months[2].total - 600.0).abs() < 1e-9);
    assert_eq!(months[3].count, 1);
    assert_eq!(months[0].count, 0);
    assert_eq!(months[11].total, 0.0);

    let tracker_two = test_db
        .db
        .expenses_by_month_in("u1", 2025, Some("t2"), &Utc)
        .expect("t2 months");
    assert_eq!(tracker_two[2].count, 1);
    assert_eq!(tracker_two[3].count, 0);
}
