use ledger_core::{Tracker, TrackerType};
use rusqlite::{OptionalExtension, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{TRACKER_COLUMNS, row_to_tracker};

impl Db {
    pub fn insert_tracker(&self, tracker: &Tracker) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO tracker (
              id, user_id, name, tracker_type, currency, description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                tracker.id,
                tracker.user_id,
                tracker.name,
                tracker.tracker_type.as_str(),
                tracker.currency,
                tracker.description,
                tracker.created_at,
                tracker.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Only returns trackers owned by `user_id`.
    pub fn get_tracker(&self, user_id: &str, tracker_id: &str) -> Result<Option<Tracker>> {
        let sql = format!(
            "SELECT {} FROM tracker WHERE id = ?1 AND user_id = ?2",
            TRACKER_COLUMNS
        );
        self.conn
            .query_row(&sql, params![tracker_id, user_id], row_to_tracker)
            .optional()
            .map_err(DbError::from)
    }

    pub fn update_tracker_identity(
        &self,
        user_id: &str,
        tracker_id: &str,
        name: &str,
        tracker_type: TrackerType,
        updated_at: &str,
    ) -> Result<Option<Tracker>> {
        let updated = self.conn.execute(
            r#"
            UPDATE tracker
            SET name = ?3, tracker_type = ?4, updated_at = ?5
            WHERE id = ?1 AND user_id = ?2
            "#,
            params![tracker_id, user_id, name, tracker_type.as_str(), updated_at],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_tracker(user_id, tracker_id)
    }

    /// Removes the tracker with its expenses. Usage history is untouched.
    pub fn delete_tracker(&mut self, user_id: &str, tracker_id: &str) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM tracker WHERE id = ?1 AND user_id = ?2",
            params![tracker_id, user_id],
        )?;
        if deleted > 0 {
            tx.execute(
                "DELETE FROM expense WHERE tracker_id = ?1 AND user_id = ?2",
                params![tracker_id, user_id],
            )?;
        }
        tx.commit()?;
        Ok(deleted > 0)
    }
}
