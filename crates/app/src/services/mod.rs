mod analytics;
mod chat;
mod settings;
mod snapshots;
mod trackers;
mod usage;

use std::sync::Arc;

use serde::Serialize;

use crate::app::AppConfig;
use crate::error::Result;
use ledger_db::Db;

pub use analytics::AnalyticsService;
pub use chat::{
    ChatReply, ChatResponder, ChatService, ExpenseParser, ParseOutcome, ParsedExpense,
    ParserError, TokenCounter,
};
pub use settings::{SettingsService, SettingsSnapshot};
pub use snapshots::SnapshotService;
pub use trackers::{NewTracker, TrackerService, TrackerUpdate};
pub use usage::UsageService;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub usage: UsageService,
    pub snapshots: SnapshotService,
    pub analytics: AnalyticsService,
    pub trackers: TrackerService,
    pub chat: ChatService,
    pub settings: SettingsService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        let usage = UsageService::new(shared.clone());
        let snapshots = SnapshotService::new(shared.clone());
        Self {
            analytics: AnalyticsService::new(shared.clone()),
            trackers: TrackerService::new(shared.clone(), snapshots.clone()),
            chat: ChatService::new(shared.clone(), usage.clone()),
            settings: SettingsService::new(shared),
            usage,
            snapshots,
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}

/// Result of a best-effort step that must not fail the primary operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AuxiliaryOutcome {
    Completed,
    Failed { reason: String },
}

impl AuxiliaryOutcome {
    /// Swallows `result`, reporting a failure through `tracing`.
    pub(crate) fn record<T>(step: &str, result: Result<T>) -> Self {
        match result {
            Ok(_) => AuxiliaryOutcome::Completed,
            Err(err) => {
                tracing::warn!(step, error = %err, "auxiliary step failed");
                AuxiliaryOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AuxiliaryOutcome::Completed)
    }
}

/// Primary result paired with the outcome of its follow-up bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    pub auxiliary: AuxiliaryOutcome,
}
