#![allow(dead_code)]

use std::path::PathBuf;

use ledger_core::{Expense, MessageRole, Tracker, TrackerSnapshot, TrackerType, UsageEvent};
use ledger_db::Db;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn make_tracker(id: &str, user_id: &str, name: &str, tracker_type: TrackerType) -> Tracker {
    Tracker {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        tracker_type,
        currency: "INR".to_string(),
        description: None,
        created_at: "2025-01-01T00:00:00.000Z".to_string(),
        updated_at: "2025-01-01T00:00:00.000Z".to_string(),
    }
}

pub fn make_snapshot(tracker_id: &str, name: &str) -> TrackerSnapshot {
    TrackerSnapshot {
        tracker_id: tracker_id.to_string(),
        tracker_name: name.to_string(),
        tracker_type: TrackerType::Personal,
        is_deleted: false,
        deleted_at: None,
        modified_at: "2025-01-01T00:00:00.000Z".to_string(),
    }
}

pub fn make_event(
    id: &str,
    user_id: &str,
    snapshot: &TrackerSnapshot,
    role: MessageRole,
    token_count: u64,
    ts: &str,
) -> UsageEvent {
    UsageEvent {
        id: id.to_string(),
        user_id: user_id.to_string(),
        tracker_snapshot: snapshot.clone(),
        message_role: role,
        message_content: format!("message {}", id),
        token_count,
        timestamp: ts.to_string(),
    }
}

pub fn make_expense(
    id: &str,
    tracker_id: &str,
    category: &str,
    amount: f64,
    ts: &str,
) -> Expense {
    Expense {
        id: id.to_string(),
        user_id: "u1".to_string(),
        tracker_id: tracker_id.to_string(),
        amount,
        category: category.to_string(),
        subcategory: format!("{} misc", category),
        category_id: format!("cat-{}", category.to_ascii_lowercase()),
        payment_method: "UPI".to_string(),
        description: None,
        timestamp: ts.to_string(),
    }
}

/// Logs `event` against the day taken from its own timestamp.
pub fn log(db: &mut Db, event: &UsageEvent) {
    let day = &event.timestamp[..10];
    db.log_usage(event, day).expect("log usage");
}
