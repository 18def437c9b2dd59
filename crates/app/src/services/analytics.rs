use chrono::{Datelike, Local};

use crate::config::RangeParams;
use crate::error::{Result, require};
use crate::services::{SharedConfig, open_db};
use crate::util::time::resolve_range;
use ledger_core::{CategoryBreakdown, Expense, ExpenseQueryFilter, MonthlyBreakdown, SummaryStats};
use ledger_db::Db;

/// Expense ledger aggregates over a resolved date window.
#[derive(Clone)]
pub struct AnalyticsService {
    config: SharedConfig,
}

impl AnalyticsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Builds a query filter, resolving `params` with the configured fallback.
    pub fn filter_for(
        &self,
        user_id: &str,
        params: &RangeParams,
        category_id: Option<&str>,
        tracker_id: Option<&str>,
    ) -> Result<ExpenseQueryFilter> {
        require(user_id, "user id")?;
        Ok(ExpenseQueryFilter {
            user_id: user_id.to_string(),
            range: resolve_range(params, self.config.range_fallback)?,
            category_id: category_id.map(str::to_string),
            tracker_id: tracker_id.map(str::to_string),
        })
    }

    pub fn expenses(&self, filter: &ExpenseQueryFilter) -> Result<Vec<Expense>> {
        Ok(self.db()?.list_expenses(filter)?)
    }

    pub fn total_expenses(&self, filter: &ExpenseQueryFilter) -> Result<f64> {
        Ok(self.db()?.total_expenses(filter)?)
    }

    pub fn summary_stats(&self, filter: &ExpenseQueryFilter) -> Result<SummaryStats> {
        Ok(self.db()?.summary_stats(filter)?)
    }

    pub fn expenses_by_category(
        &self,
        filter: &ExpenseQueryFilter,
    ) -> Result<Vec<CategoryBreakdown>> {
        Ok(self.db()?.expenses_by_category(filter)?)
    }

    /// Twelve monthly buckets of the local calendar; `year` defaults to now.
    pub fn expenses_by_month(
        &self,
        user_id: &str,
        year: Option<i32>,
        tracker_id: Option<&str>,
    ) -> Result<Vec<MonthlyBreakdown>> {
        require(user_id, "user id")?;
        let year = year.unwrap_or_else(|| Local::now().year());
        Ok(self
            .db()?
            .expenses_by_month_in(user_id, year, tracker_id, &Local)?)
    }
}
