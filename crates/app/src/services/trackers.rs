use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result, require};
use crate::services::{AuxiliaryOutcome, Outcome, SharedConfig, SnapshotService, open_db};
use crate::util::time::now_ts;
use ledger_core::{Tracker, TrackerType};
use ledger_db::Db;

const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewTracker {
    pub name: String,
    #[serde(default, rename = "type")]
    pub tracker_type: TrackerType,
    pub currency: Option<String>,
    pub description: Option<String>,
}

/// Identity change; at least one field must be set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackerUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tracker_type: Option<TrackerType>,
}

/// Live tracker entry points that keep stored snapshots in step.
#[derive(Clone)]
pub struct TrackerService {
    config: SharedConfig,
    snapshots: SnapshotService,
}

impl TrackerService {
    pub(super) fn new(config: SharedConfig, snapshots: SnapshotService) -> Self {
        Self { config, snapshots }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn create(&self, user_id: &str, input: NewTracker) -> Result<Tracker> {
        require(user_id, "user id")?;
        require(&input.name, "tracker name")?;
        let now = now_ts();
        let tracker = Tracker {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: input.name.trim().to_string(),
            tracker_type: input.tracker_type,
            currency: input
                .currency
                .filter(|currency| !currency.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            description: input.description,
            created_at: now.clone(),
            updated_at: now,
        };
        self.db()?.insert_tracker(&tracker)?;
        Ok(tracker)
    }

    pub fn get(&self, user_id: &str, tracker_id: &str) -> Result<Tracker> {
        self.db()?
            .get_tracker(user_id, tracker_id)?
            .ok_or_else(missing_tracker)
    }

    /// Updates the live tracker, then propagates to stored snapshots.
    ///
    /// Propagation failure is reported in the outcome, never as an error.
    pub fn rename(
        &self,
        user_id: &str,
        tracker_id: &str,
        update: TrackerUpdate,
    ) -> Result<Outcome<Tracker>> {
        if update.name.is_none() && update.tracker_type.is_none() {
            return Err(AppError::InvalidInput(
                "name or type is required".to_string(),
            ));
        }
        if let Some(name) = update.name.as_deref() {
            require(name, "tracker name")?;
        }
        let db = self.db()?;
        let current = db
            .get_tracker(user_id, tracker_id)?
            .ok_or_else(missing_tracker)?;
        let name = update
            .name
            .map(|name| name.trim().to_string())
            .unwrap_or(current.name);
        let tracker_type = update.tracker_type.unwrap_or(current.tracker_type);
        let tracker = db
            .update_tracker_identity(user_id, tracker_id, &name, tracker_type, &now_ts())?
            .ok_or_else(missing_tracker)?;
        let auxiliary = AuxiliaryOutcome::record(
            "propagate rename",
            self.snapshots
                .propagate_rename(tracker_id, &tracker.name, tracker.tracker_type),
        );
        Ok(Outcome {
            value: tracker,
            auxiliary,
        })
    }

    /// Deletes the live tracker and its expenses; usage history is flagged.
    pub fn delete(&self, user_id: &str, tracker_id: &str) -> Result<Outcome<()>> {
        let mut db = self.db()?;
        if !db.delete_tracker(user_id, tracker_id)? {
            return Err(missing_tracker());
        }
        let auxiliary = AuxiliaryOutcome::record(
            "propagate delete",
            self.snapshots.propagate_delete(tracker_id),
        );
        Ok(Outcome {
            value: (),
            auxiliary,
        })
    }
}

fn missing_tracker() -> AppError {
    AppError::NotFound("tracker not found".to_string())
}
