use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result, require};
use crate::services::{SharedConfig, open_db};
use crate::util::time::local_day;
use ledger_core::{
    DailyActivity, MessageRole, OverallUsage, TrackerSnapshot, TrackerUsage, UsageEvent,
    UsageLogPage, UsageMessage, UsageTotals,
};
use ledger_db::{Db, format_ts};

const RECENT_ACTIVITY_DAYS: i64 = 30;
const TRACKER_DAILY_ROWS: u32 = 30;
const TRACKER_MESSAGES: u32 = 100;

#[derive(Clone)]
pub struct UsageService {
    config: SharedConfig,
}

impl UsageService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Appends one message and bumps its daily summary atomically.
    pub fn log_usage(
        &self,
        user_id: &str,
        snapshot: &TrackerSnapshot,
        role: MessageRole,
        content: &str,
        token_count: u64,
    ) -> Result<UsageEvent> {
        require(user_id, "user id")?;
        require(&snapshot.tracker_id, "tracker id")?;
        require(content, "message content")?;
        let now = Utc::now();
        let event = UsageEvent {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            tracker_snapshot: snapshot.clone(),
            message_role: role,
            message_content: content.to_string(),
            token_count,
            timestamp: format_ts(now),
        };
        let mut db = self.db()?;
        db.log_usage(&event, &local_day(now))?;
        tracing::debug!(
            user_id,
            tracker_id = %snapshot.tracker_id,
            role = role.as_str(),
            token_count,
            "usage logged"
        );
        Ok(event)
    }

    pub fn list_events(
        &self,
        user_id: &str,
        tracker_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<UsageLogPage> {
        require(user_id, "user id")?;
        let db = self.db()?;
        let total_count = db.count_usage_events(user_id, tracker_id)?;
        let logs = db.list_usage_events(user_id, tracker_id, limit, offset)?;
        Ok(UsageLogPage::new(total_count, limit, offset, logs))
    }

    /// Deletes events older than `days`. Daily summaries are kept.
    /// A window reaching past the earliest representable instant deletes nothing.
    pub fn delete_older_than(&self, days: u32) -> Result<usize> {
        let Some(cutoff) = Utc::now().checked_sub_signed(Duration::days(i64::from(days))) else {
            return Ok(0);
        };
        let db = self.db()?;
        Ok(db.delete_usage_events_before(&format_ts(cutoff))?)
    }

    /// Retention cleanup; `None` uses the stored retention setting.
    pub fn cleanup(&self, days: Option<u32>) -> Result<usize> {
        let days = match days {
            Some(days) => days,
            None => self.db()?.get_usage_retention_days()?,
        };
        let deleted = self.delete_older_than(days)?;
        tracing::info!(days, deleted, "usage retention cleanup");
        Ok(deleted)
    }

    pub fn overall_usage(&self, user_id: &str) -> Result<OverallUsage> {
        require(user_id, "user id")?;
        let db = self.db()?;
        let since = local_day(Utc::now() - Duration::days(RECENT_ACTIVITY_DAYS));
        Ok(OverallUsage {
            overall: db.usage_totals(user_id, None)?,
            by_tracker: db.usage_by_tracker(user_id)?,
            recent_activity: db.daily_activity_since(user_id, &since)?,
        })
    }

    /// Usage of one tracker. A live tracker without activity reports zeros.
    pub fn tracker_usage(&self, user_id: &str, tracker_id: &str) -> Result<TrackerUsage> {
        require(user_id, "user id")?;
        require(tracker_id, "tracker id")?;
        let db = self.db()?;
        let Some(identity) = db.summarized_tracker(user_id, tracker_id)? else {
            let tracker = db
                .get_tracker(user_id, tracker_id)?
                .ok_or_else(|| AppError::NotFound("tracker not found".to_string()))?;
            let snapshot = TrackerSnapshot::capture(&tracker, &tracker.updated_at);
            return Ok(TrackerUsage {
                tracker: snapshot.identity(),
                usage: UsageTotals::default(),
                daily_usage: Vec::new(),
                messages: Vec::new(),
            });
        };
        let usage = db.usage_totals(user_id, Some(tracker_id))?;
        let daily_usage = db
            .list_daily_summaries(user_id, tracker_id, TRACKER_DAILY_ROWS)?
            .into_iter()
            .map(|row| DailyActivity {
                date: row.date,
                message_count: row.total_messages,
                token_count: row.total_tokens,
            })
            .collect();
        let messages = db
            .list_usage_events(user_id, Some(tracker_id), TRACKER_MESSAGES, 0)?
            .into_iter()
            .map(UsageMessage::from)
            .collect();
        Ok(TrackerUsage {
            tracker: identity,
            usage,
            daily_usage,
            messages,
        })
    }

    pub fn tracker_logs(
        &self,
        user_id: &str,
        tracker_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<UsageLogPage> {
        require(tracker_id, "tracker id")?;
        self.list_events(user_id, Some(tracker_id), limit, offset)
    }
}
