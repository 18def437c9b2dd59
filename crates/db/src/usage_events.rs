use ledger_core::UsageEvent;
use rusqlite::{Connection, TransactionBehavior, params};

use crate::Db;
use crate::daily_summary::increment_summary;
use crate::error::{DbError, Result};
use crate::helpers::{USAGE_EVENT_COLUMNS, row_to_usage_event, token_count_param};

impl Db {
    /// Appends one event and bumps the matching daily summary.
    ///
    /// Both writes share one transaction: a failed increment rolls the event
    /// back and the error reaches the caller.
    pub fn log_usage(&mut self, event: &UsageEvent, day: &str) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        insert_event(&tx, event)?;
        increment_summary(
            &tx,
            &event.user_id,
            day,
            &event.tracker_snapshot,
            event.message_role,
            event.token_count,
        )?;
        tx.commit()?;
        tracing::debug!(
            event_id = %event.id,
            tracker_id = %event.tracker_snapshot.tracker_id,
            role = event.message_role.as_str(),
            "usage event logged"
        );
        Ok(())
    }

    /// Newest first; `tracker_id` narrows to one tracker when given.
    pub fn list_usage_events(
        &self,
        user_id: &str,
        tracker_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<UsageEvent>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM usage_event
            WHERE user_id = ?1 AND (?2 IS NULL OR tracker_id = ?2)
            ORDER BY ts DESC, rowid DESC
            LIMIT ?3 OFFSET ?4
            "#,
            USAGE_EVENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![user_id, tracker_id, limit, offset],
            row_to_usage_event,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn count_usage_events(&self, user_id: &str, tracker_id: Option<&str>) -> Result<u64> {
        self.conn
            .query_row(
                r#"
                SELECT COUNT(*)
                FROM usage_event
                WHERE user_id = ?1 AND (?2 IS NULL OR tracker_id = ?2)
                "#,
                params![user_id, tracker_id],
                |row| row.get::<_, i64>(0),
            )
            .map(|value| value.max(0) as u64)
            .map_err(DbError::from)
    }

    /// Removes events stamped strictly before `cutoff`. Summaries are kept.
    pub fn delete_usage_events_before(&self, cutoff: &str) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM usage_event WHERE ts < ?1", params![cutoff])?;
        tracing::info!(deleted, cutoff, "usage events purged");
        Ok(deleted)
    }
}

fn insert_event(conn: &Connection, event: &UsageEvent) -> Result<()> {
    let snapshot = &event.tracker_snapshot;
    conn.execute(
        r#"
        INSERT INTO usage_event (
          id, user_id, tracker_id, tracker_name, tracker_type, tracker_is_deleted,
          tracker_deleted_at, tracker_modified_at, message_role, message_content,
          token_count, ts
        ) VALUES (
          ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12
        )
        "#,
        params![
            event.id,
            event.user_id,
            snapshot.tracker_id,
            snapshot.tracker_name,
            snapshot.tracker_type.as_str(),
            snapshot.is_deleted,
            snapshot.deleted_at,
            snapshot.modified_at,
            event.message_role.as_str(),
            event.message_content,
            token_count_param(event.token_count)?,
            event.timestamp,
        ],
    )?;
    Ok(())
}
