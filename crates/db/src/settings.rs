use rusqlite::params;

use crate::Db;
use crate::error::Result;

pub const DEFAULT_RETENTION_DAYS: u32 = 90;

impl Db {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_setting WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_setting (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_usage_retention_days(&self) -> Result<u32> {
        let days = self
            .get_setting("usage_retention_days")?
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETENTION_DAYS);
        Ok(days)
    }

    pub fn set_usage_retention_days(&self, days: u32) -> Result<()> {
        self.set_setting("usage_retention_days", &days.to_string())
    }
}
