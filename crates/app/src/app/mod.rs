use std::path::{Path, PathBuf};

use crate::config::RangeFallback;
use crate::error::{AppError, Result};
use crate::services::AppServices;
use ledger_db::Db;

/// Process-level settings shared by every service.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub range_fallback: RangeFallback,
}

/// Application state shared by the frontends (CLI, any HTTP wrapper).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db_path: PathBuf, range_fallback: RangeFallback) -> Self {
        let config = AppConfig {
            db_path,
            range_fallback,
        };
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn initialize(&self) -> Result<()> {
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}

pub fn setup_db(path: &Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
