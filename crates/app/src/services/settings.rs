use serde::Serialize;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};
use ledger_db::Db;

/// Snapshot of user-configurable settings stored in the DB.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsSnapshot {
    pub usage_retention_days: u32,
}

#[derive(Clone)]
pub struct SettingsService {
    config: SharedConfig,
}

impl SettingsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn get(&self) -> Result<SettingsSnapshot> {
        let db = self.db()?;
        Ok(SettingsSnapshot {
            usage_retention_days: db.get_usage_retention_days()?,
        })
    }

    pub fn update(&self, usage_retention_days: Option<u32>) -> Result<()> {
        let db = self.db()?;
        if let Some(days) = usage_retention_days {
            if days == 0 {
                return Err(AppError::InvalidInput(
                    "retention must be at least one day".to_string(),
                ));
            }
            db.set_usage_retention_days(days)?;
        }
        Ok(())
    }
}
