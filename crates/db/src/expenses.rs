use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use ledger_core::{
    CategoryBreakdown, Expense, ExpenseQueryFilter, MonthlyBreakdown, SummaryStats, TimeRange,
    empty_months,
};
use rusqlite::params;

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{EXPENSE_COLUMNS, format_ts, normalize_ts, row_to_expense};

// Both endpoints inclusive; the resolver already encodes day ends.
const EXPENSE_FILTER: &str = r#"
    user_id = ?1
    AND ts >= ?2
    AND ts <= ?3
    AND (?4 IS NULL OR category_id = ?4)
    AND (?5 IS NULL OR tracker_id = ?5)
"#;

impl Db {
    /// Inserts ledger rows, normalizing timestamps to the stored form.
    pub fn insert_expenses(&mut self, expenses: &[Expense]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO expense (
                  id, user_id, tracker_id, amount, category, subcategory, category_id,
                  payment_method, description, ts
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )?;
            for expense in expenses {
                inserted += stmt.execute(params![
                    expense.id,
                    expense.user_id,
                    expense.tracker_id,
                    expense.amount,
                    expense.category,
                    expense.subcategory,
                    expense.category_id,
                    expense.payment_method,
                    expense.description,
                    normalize_ts(&expense.timestamp)?,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn list_expenses(&self, filter: &ExpenseQueryFilter) -> Result<Vec<Expense>> {
        let sql = format!(
            "SELECT {} FROM expense WHERE {} ORDER BY ts ASC",
            EXPENSE_COLUMNS, EXPENSE_FILTER
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                filter.user_id,
                filter.range.start,
                filter.range.end,
                filter.category_id,
                filter.tracker_id
            ],
            row_to_expense,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn total_expenses(&self, filter: &ExpenseQueryFilter) -> Result<f64> {
        Ok(self.summary_stats(filter)?.total)
    }

    pub fn summary_stats(&self, filter: &ExpenseQueryFilter) -> Result<SummaryStats> {
        let sql = format!(
            "SELECT COALESCE(SUM(amount), 0.0), COUNT(*) FROM expense WHERE {}",
            EXPENSE_FILTER
        );
        let (total, count) = self.conn.query_row(
            &sql,
            params![
                filter.user_id,
                filter.range.start,
                filter.range.end,
                filter.category_id,
                filter.tracker_id
            ],
            |row| Ok((row.get::<_, f64>(0)?, row.get::<_, i64>(1)?.max(0) as u64)),
        )?;
        let average = if count == 0 { 0.0 } else { total / count as f64 };
        Ok(SummaryStats {
            total,
            average,
            count,
        })
    }

    /// Largest spend first.
    pub fn expenses_by_category(
        &self,
        filter: &ExpenseQueryFilter,
    ) -> Result<Vec<CategoryBreakdown>> {
        let sql = format!(
            r#"
            SELECT category, category_id, SUM(amount) AS total, COUNT(*)
            FROM expense
            WHERE {}
            GROUP BY category, category_id
            ORDER BY total DESC, category ASC
            "#,
            EXPENSE_FILTER
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                filter.user_id,
                filter.range.start,
                filter.range.end,
                filter.category_id,
                filter.tracker_id
            ],
            |row| {
                Ok(CategoryBreakdown {
                    category: row.get(0)?,
                    category_id: row.get(1)?,
                    total: row.get(2)?,
                    count: row.get::<_, i64>(3)?.max(0) as u64,
                })
            },
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Twelve buckets for `year`, months counted in the calendar of `tz`.
    pub fn expenses_by_month_in<Tz: TimeZone>(
        &self,
        user_id: &str,
        year: i32,
        tracker_id: Option<&str>,
        tz: &Tz,
    ) -> Result<Vec<MonthlyBreakdown>> {
        let start = tz
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .earliest()
            .ok_or_else(|| DbError::InvalidValue(format!("year {}", year)))?;
        let next = tz
            .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
            .earliest()
            .ok_or_else(|| DbError::InvalidValue(format!("year {}", year + 1)))?;
        let end = next - Duration::milliseconds(1);
        let filter = ExpenseQueryFilter {
            user_id: user_id.to_string(),
            range: TimeRange {
                start: format_ts(start.with_timezone(&Utc)),
                end: format_ts(end.with_timezone(&Utc)),
            },
            category_id: None,
            tracker_id: tracker_id.map(str::to_string),
        };
        let mut months = empty_months();
        for expense in self.list_expenses(&filter)? {
            let ts = DateTime::parse_from_rfc3339(&expense.timestamp)?;
            let month = ts.with_timezone(tz).month() as usize;
            let bucket = &mut months[month - 1];
            bucket.total += expense.amount;
            bucket.count += 1;
        }
        Ok(months)
    }
}
