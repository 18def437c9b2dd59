use crate::error::{Result, require};
use crate::services::{SharedConfig, open_db};
use crate::util::time::now_ts;
use ledger_core::{PropagationReport, Tracker, TrackerSnapshot, TrackerType};
use ledger_db::Db;

#[derive(Clone)]
pub struct SnapshotService {
    config: SharedConfig,
}

impl SnapshotService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Snapshot of `tracker` as of now, for embedding in new usage records.
    pub fn capture(&self, tracker: &Tracker) -> TrackerSnapshot {
        TrackerSnapshot::capture(tracker, &now_ts())
    }

    /// Rewrites name and type on every stored snapshot of the tracker.
    pub fn propagate_rename(
        &self,
        tracker_id: &str,
        name: &str,
        tracker_type: TrackerType,
    ) -> Result<PropagationReport> {
        require(tracker_id, "tracker id")?;
        require(name, "tracker name")?;
        let mut db = self.db()?;
        Ok(db.propagate_rename(tracker_id, name, tracker_type, &now_ts())?)
    }

    /// Flags every stored snapshot of the tracker as deleted.
    pub fn propagate_delete(&self, tracker_id: &str) -> Result<PropagationReport> {
        require(tracker_id, "tracker id")?;
        let mut db = self.db()?;
        Ok(db.propagate_delete(tracker_id, &now_ts())?)
    }
}
