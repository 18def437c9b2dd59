use ledger_core::{PropagationReport, TrackerType};
use rusqlite::params;

use crate::Db;
use crate::error::Result;

const SNAPSHOT_TABLES: [&str; 2] = ["usage_event", "daily_usage_summary"];

impl Db {
    /// Rewrites name and type on every stored snapshot of the tracker.
    /// Deletion fields and `tracker_id` are left alone.
    pub fn propagate_rename(
        &mut self,
        tracker_id: &str,
        name: &str,
        tracker_type: TrackerType,
        modified_at: &str,
    ) -> Result<PropagationReport> {
        let tx = self.conn.transaction()?;
        let mut counts = [0usize; 2];
        for (count, table) in counts.iter_mut().zip(SNAPSHOT_TABLES) {
            *count = tx.execute(
                &format!(
                    r#"
                    UPDATE {}
                    SET tracker_name = ?2, tracker_type = ?3, tracker_modified_at = ?4
                    WHERE tracker_id = ?1
                    "#,
                    table
                ),
                params![tracker_id, name, tracker_type.as_str(), modified_at],
            )?;
        }
        tx.commit()?;
        let report = PropagationReport {
            events_updated: counts[0],
            summaries_updated: counts[1],
        };
        tracing::info!(
            tracker_id,
            events = report.events_updated,
            summaries = report.summaries_updated,
            "tracker rename propagated"
        );
        Ok(report)
    }

    /// Tombstones every stored snapshot of the tracker, keeping name and type.
    pub fn propagate_delete(
        &mut self,
        tracker_id: &str,
        deleted_at: &str,
    ) -> Result<PropagationReport> {
        let tx = self.conn.transaction()?;
        let mut counts = [0usize; 2];
        for (count, table) in counts.iter_mut().zip(SNAPSHOT_TABLES) {
            *count = tx.execute(
                &format!(
                    r#"
                    UPDATE {}
                    SET tracker_is_deleted = 1, tracker_deleted_at = ?2
                    WHERE tracker_id = ?1
                    "#,
                    table
                ),
                params![tracker_id, deleted_at],
            )?;
        }
        tx.commit()?;
        let report = PropagationReport {
            events_updated: counts[0],
            summaries_updated: counts[1],
        };
        tracing::info!(
            tracker_id,
            events = report.events_updated,
            summaries = report.summaries_updated,
            "tracker deletion propagated"
        );
        Ok(report)
    }
}
