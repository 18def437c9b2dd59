use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

mod daily_summary;
mod error;
mod expenses;
mod helpers;
mod migrations;
mod propagation;
mod settings;
mod trackers;
mod usage_events;
mod usage_stats;

pub use error::{DbError, Result};
pub use helpers::format_ts;
pub use settings::DEFAULT_RETENTION_DAYS;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "cache_size", -20_000)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }
}
