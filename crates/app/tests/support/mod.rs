#![allow(dead_code)]

use ledger_app::{AppState, NewTracker, RangeFallback};
use ledger_core::{Tracker, TrackerType};
use tempfile::TempDir;

pub struct TestApp {
    pub _dir: TempDir,
    pub app: AppState,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = AppState::new(dir.path().join("app.sqlite"), RangeFallback::ThisMonth);
    app.setup_db().expect("setup db");
    TestApp { _dir: dir, app }
}

pub fn create_tracker(app: &AppState, user_id: &str, name: &str) -> Tracker {
    app.services
        .trackers
        .create(
            user_id,
            NewTracker {
                name: name.to_string(),
                tracker_type: TrackerType::Personal,
                currency: None,
                description: None,
            },
        )
        .expect("create tracker")
}

/// Counts whitespace-separated words.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
