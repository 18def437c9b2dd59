use ledger_core::{DailyUsageSummary, MessageRole, TrackerSnapshot};
use rusqlite::{Connection, OptionalExtension, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{SUMMARY_COLUMNS, row_to_summary, token_count_param};

impl Db {
    /// Adds one message to the (user, day, tracker) counter row, creating it
    /// on first use.
    pub fn increment_daily_summary(
        &self,
        user_id: &str,
        day: &str,
        snapshot: &TrackerSnapshot,
        role: MessageRole,
        token_count: u64,
    ) -> Result<()> {
        increment_summary(&self.conn, user_id, day, snapshot, role, token_count)
    }

    pub fn get_daily_summary(
        &self,
        user_id: &str,
        day: &str,
        tracker_id: &str,
    ) -> Result<Option<DailyUsageSummary>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM daily_usage_summary
            WHERE user_id = ?1 AND day = ?2 AND tracker_id = ?3
            "#,
            SUMMARY_COLUMNS
        );
        self.conn
            .query_row(&sql, params![user_id, day, tracker_id], row_to_summary)
            .optional()
            .map_err(DbError::from)
    }

    /// Rows for one tracker, newest day first.
    pub fn list_daily_summaries(
        &self,
        user_id: &str,
        tracker_id: &str,
        limit: u32,
    ) -> Result<Vec<DailyUsageSummary>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM daily_usage_summary
            WHERE user_id = ?1 AND tracker_id = ?2
            ORDER BY day DESC
            LIMIT ?3
            "#,
            SUMMARY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, tracker_id, limit], row_to_summary)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

// Single upsert statement; never read-then-write.
pub(crate) fn increment_summary(
    conn: &Connection,
    user_id: &str,
    day: &str,
    snapshot: &TrackerSnapshot,
    role: MessageRole,
    token_count: u64,
) -> Result<()> {
    let (user_delta, ai_delta) = match role {
        MessageRole::User => (1i64, 0i64),
        MessageRole::Assistant => (0i64, 1i64),
    };
    conn.execute(
        r#"
        INSERT INTO daily_usage_summary (
          user_id, day, tracker_id, tracker_name, tracker_type, tracker_is_deleted,
          tracker_deleted_at, tracker_modified_at, total_messages, total_tokens,
          user_messages, ai_messages
        ) VALUES (
          ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?11
        )
        ON CONFLICT(user_id, day, tracker_id) DO UPDATE SET
          total_messages = total_messages + 1,
          total_tokens = total_tokens + excluded.total_tokens,
          user_messages = user_messages + excluded.user_messages,
          ai_messages = ai_messages + excluded.ai_messages
        "#,
        params![
            user_id,
            day,
            snapshot.tracker_id,
            snapshot.tracker_name,
            snapshot.tracker_type.as_str(),
            snapshot.is_deleted,
            snapshot.deleted_at,
            snapshot.modified_at,
            token_count_param(token_count)?,
            user_delta,
            ai_delta,
        ],
    )?;
    Ok(())
}
