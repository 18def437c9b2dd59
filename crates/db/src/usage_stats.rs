use std::collections::HashMap;

use ledger_core::{DailyActivity, TrackerIdentity, TrackerUsageEntry, UsageTotals};
use rusqlite::{OptionalExtension, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{SUMMARY_COLUMNS, row_to_summary};

impl Db {
    /// Sums every summary row of the user, deleted trackers included.
    pub fn usage_totals(&self, user_id: &str, tracker_id: Option<&str>) -> Result<UsageTotals> {
        self.conn
            .query_row(
                r#"
                SELECT
                  COALESCE(SUM(total_messages), 0),
                  COALESCE(SUM(total_tokens), 0),
                  COALESCE(SUM(user_messages), 0),
                  COALESCE(SUM(ai_messages), 0)
                FROM daily_usage_summary
                WHERE user_id = ?1 AND (?2 IS NULL OR tracker_id = ?2)
                "#,
                params![user_id, tracker_id],
                |row| {
                    Ok(UsageTotals {
                        total_messages: row.get::<_, i64>(0)?.max(0) as u64,
                        total_tokens: row.get::<_, i64>(1)?.max(0) as u64,
                        user_messages: row.get::<_, i64>(2)?.max(0) as u64,
                        ai_messages: row.get::<_, i64>(3)?.max(0) as u64,
                    })
                },
            )
            .map_err(DbError::from)
    }

    /// Groups summaries per tracker id, busiest first.
    ///
    /// Identity fields come from the first row visited (oldest day); rows of
    /// one tracker carrying different snapshots are not reconciled.
    pub fn usage_by_tracker(&self, user_id: &str) -> Result<Vec<TrackerUsageEntry>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM daily_usage_summary
            WHERE user_id = ?1
            ORDER BY day ASC, id ASC
            "#,
            SUMMARY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, TrackerUsageEntry> = HashMap::new();
        for row in rows {
            let snapshot = row.tracker_snapshot;
            let entry = groups
                .entry(snapshot.tracker_id.clone())
                .or_insert_with(|| {
                    order.push(snapshot.tracker_id.clone());
                    TrackerUsageEntry {
                        tracker_id: snapshot.tracker_id.clone(),
                        tracker_name: snapshot.tracker_name.clone(),
                        tracker_type: snapshot.tracker_type,
                        is_deleted: snapshot.is_deleted,
                        deleted_at: snapshot.deleted_at.clone(),
                        message_count: 0,
                        token_count: 0,
                    }
                });
            entry.message_count += row.total_messages;
            entry.token_count += row.total_tokens;
        }
        let mut result: Vec<TrackerUsageEntry> = order
            .into_iter()
            .filter_map(|tracker_id| groups.remove(&tracker_id))
            .collect();
        result.sort_by(|a, b| b.message_count.cmp(&a.message_count));
        Ok(result)
    }

    /// Per-day totals across trackers from `since_day` on, oldest first.
    pub fn daily_activity_since(
        &self,
        user_id: &str,
        since_day: &str,
    ) -> Result<Vec<DailyActivity>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT day, SUM(total_messages), SUM(total_tokens)
            FROM daily_usage_summary
            WHERE user_id = ?1 AND day >= ?2
            GROUP BY day
            ORDER BY day ASC
            "#,
        )?;
        let rows = stmt.query_map(params![user_id, since_day], |row| {
            Ok(DailyActivity {
                date: row.get(0)?,
                message_count: row.get::<_, i64>(1)?.max(0) as u64,
                token_count: row.get::<_, i64>(2)?.max(0) as u64,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Identity from the first summary row of the tracker, if any exists.
    pub fn summarized_tracker(
        &self,
        user_id: &str,
        tracker_id: &str,
    ) -> Result<Option<TrackerIdentity>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM daily_usage_summary
            WHERE user_id = ?1 AND tracker_id = ?2
            ORDER BY day ASC, id ASC
            LIMIT 1
            "#,
            SUMMARY_COLUMNS
        );
        let summary = self
            .conn
            .query_row(&sql, params![user_id, tracker_id], row_to_summary)
            .optional()?;
        Ok(summary.map(|row| row.tracker_snapshot.identity()))
    }
}
