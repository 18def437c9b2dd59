use chrono::{DateTime, SecondsFormat, Utc};
use ledger_core::{
    DailyUsageSummary, Expense, MessageRole, Tracker, TrackerSnapshot, TrackerType, UsageEvent,
};
use rusqlite::Row;
use rusqlite::types::Type;

use crate::error::{DbError, Result};

pub(crate) const USAGE_EVENT_COLUMNS: &str = "id, user_id, tracker_id, tracker_name, \
     tracker_type, tracker_is_deleted, tracker_deleted_at, tracker_modified_at, message_role, \
     message_content, token_count, ts";

pub(crate) const SUMMARY_COLUMNS: &str = "user_id, day, tracker_id, tracker_name, tracker_type, \
     tracker_is_deleted, tracker_deleted_at, tracker_modified_at, total_messages, total_tokens, \
     user_messages, ai_messages";

pub(crate) const TRACKER_COLUMNS: &str =
    "id, user_id, name, tracker_type, currency, description, created_at, updated_at";

pub(crate) const EXPENSE_COLUMNS: &str = "id, user_id, tracker_id, amount, category, subcategory, \
     category_id, payment_method, description, ts";

/// Canonical stored form: UTC, millisecond precision, `Z` suffix.
pub fn format_ts(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn normalize_ts(value: &str) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(value)?;
    Ok(format_ts(parsed.with_timezone(&Utc)))
}

fn invalid(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(DbError::InvalidValue(message)))
}

fn tracker_type_at(row: &Row<'_>, idx: usize) -> std::result::Result<TrackerType, rusqlite::Error> {
    let value: String = row.get(idx)?;
    TrackerType::parse(&value).ok_or_else(|| invalid(idx, format!("tracker type {}", value)))
}

fn role_at(row: &Row<'_>, idx: usize) -> std::result::Result<MessageRole, rusqlite::Error> {
    let value: String = row.get(idx)?;
    MessageRole::parse(&value).ok_or_else(|| invalid(idx, format!("message role {}", value)))
}

fn count_at(row: &Row<'_>, idx: usize) -> std::result::Result<u64, rusqlite::Error> {
    Ok(row.get::<_, i64>(idx)?.max(0) as u64)
}

/// Reads the six flattened snapshot columns beginning at `offset`.
fn snapshot_at(row: &Row<'_>, offset: usize) -> std::result::Result<TrackerSnapshot, rusqlite::Error> {
    Ok(TrackerSnapshot {
        tracker_id: row.get(offset)?,
        tracker_name: row.get(offset + 1)?,
        tracker_type: tracker_type_at(row, offset + 2)?,
        is_deleted: row.get::<_, i64>(offset + 3)? != 0,
        deleted_at: row.get(offset + 4)?,
        modified_at: row.get(offset + 5)?,
    })
}

/// Token counts are stored as SQLite integers.
pub(crate) fn token_count_param(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| DbError::InvalidValue(format!("token count {}", value)))
}

pub(crate) fn row_to_usage_event(row: &Row<'_>) -> std::result::Result<UsageEvent, rusqlite::Error> {
    Ok(UsageEvent {
        id: row.get(0)?,
        user_id: row.get(1)?,
        tracker_snapshot: snapshot_at(row, 2)?,
        message_role: role_at(row, 8)?,
        message_content: row.get(9)?,
        token_count: count_at(row, 10)?,
        timestamp: row.get(11)?,
    })
}

pub(crate) fn row_to_summary(
    row: &Row<'_>,
) -> std::result::Result<DailyUsageSummary, rusqlite::Error> {
    Ok(DailyUsageSummary {
        user_id: row.get(0)?,
        date: row.get(1)?,
        tracker_snapshot: snapshot_at(row, 2)?,
        total_messages: count_at(row, 8)?,
        total_tokens: count_at(row, 9)?,
        user_messages: count_at(row, 10)?,
        ai_messages: count_at(row, 11)?,
    })
}

pub(crate) fn row_to_tracker(row: &Row<'_>) -> std::result::Result<Tracker, rusqlite::Error> {
    Ok(Tracker {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        tracker_type: tracker_type_at(row, 3)?,
        currency: row.get(4)?,
        description: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) fn row_to_expense(row: &Row<'_>) -> std::result::Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        tracker_id: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        subcategory: row.get(5)?,
        category_id: row.get(6)?,
        payment_method: row.get(7)?,
        description: row.get(8)?,
        timestamp: row.get(9)?,
    })
}
