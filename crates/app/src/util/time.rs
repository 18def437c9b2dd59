use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::config::{RangeFallback, RangeParams};
use crate::error::{AppError, Result};
use ledger_core::TimeRange;
use ledger_db::format_ts;

/// Named analytics windows, evaluated in the local calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeFilter {
    Today,
    Yesterday,
    Last7Days,
    ThisMonth,
    LastMonth,
    ThisYear,
    IndiaFy,
    Custom,
}

impl RangeFilter {
    /// Unknown names yield `None`; callers resolve those with the fallback.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Some(RangeFilter::Today),
            "yesterday" => Some(RangeFilter::Yesterday),
            "last7days" => Some(RangeFilter::Last7Days),
            "thismonth" => Some(RangeFilter::ThisMonth),
            "lastmonth" => Some(RangeFilter::LastMonth),
            "thisyear" => Some(RangeFilter::ThisYear),
            "indiafy" => Some(RangeFilter::IndiaFy),
            "custom" => Some(RangeFilter::Custom),
            _ => None,
        }
    }
}

pub fn resolve_range(params: &RangeParams, fallback: RangeFallback) -> Result<TimeRange> {
    let filter = params.range.as_deref().and_then(RangeFilter::parse);
    resolve_range_at(
        filter,
        params.start.as_deref(),
        params.end.as_deref(),
        fallback,
        Local::now(),
    )
}

/// Resolves a window relative to `now`, using the calendar of its zone.
///
/// Both ends are inclusive: day-aligned windows end at `23:59:59.999` of
/// their last day, `last7days` and the trailing fallback end at `now`.
pub fn resolve_range_at<Tz: TimeZone>(
    filter: Option<RangeFilter>,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    fallback: RangeFallback,
    now: DateTime<Tz>,
) -> Result<TimeRange> {
    let tz = now.timezone();
    let today = now.date_naive();
    let (start, end) = match filter {
        Some(RangeFilter::Today) => (start_of_day(&tz, today)?, end_of_day(&tz, today)?),
        Some(RangeFilter::Yesterday) => {
            let day = previous_day(today)?;
            (start_of_day(&tz, day)?, end_of_day(&tz, day)?)
        }
        Some(RangeFilter::Last7Days) => {
            let day = today - Duration::days(6);
            (start_of_day(&tz, day)?, now.clone())
        }
        Some(RangeFilter::ThisMonth) => month_window(&tz, today.year(), today.month())?,
        Some(RangeFilter::LastMonth) => {
            let (year, month) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };
            month_window(&tz, year, month)?
        }
        Some(RangeFilter::ThisYear) => (
            start_of_day(&tz, ymd(today.year(), 1, 1)?)?,
            end_of_day(&tz, ymd(today.year(), 12, 31)?)?,
        ),
        Some(RangeFilter::IndiaFy) => {
            let start_year = if today.month() >= 4 {
                today.year()
            } else {
                today.year() - 1
            };
            (
                start_of_day(&tz, ymd(start_year, 4, 1)?)?,
                end_of_day(&tz, ymd(start_year + 1, 3, 31)?)?,
            )
        }
        Some(RangeFilter::Custom) => match (custom_start, custom_end) {
            (Some(start), Some(end)) => {
                let start = parse_bound(&tz, start, Bound::Start)?;
                let end = parse_bound(&tz, end, Bound::End)?;
                if end < start {
                    return Err(AppError::InvalidInput(
                        "custom range ends before it starts".to_string(),
                    ));
                }
                (start, end)
            }
            _ => fallback_window(fallback, &now)?,
        },
        None => fallback_window(fallback, &now)?,
    };
    Ok(TimeRange {
        start: format_ts(start.with_timezone(&Utc)),
        end: format_ts(end.with_timezone(&Utc)),
    })
}

/// Current instant in storage format.
pub fn now_ts() -> String {
    format_ts(Utc::now())
}

/// Local calendar day of `instant`, as `YYYY-MM-DD`.
pub fn local_day(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_bound<Tz: TimeZone>(tz: &Tz, value: &str, bound: Bound) -> Result<DateTime<Tz>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(tz));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("invalid date {}", value)))?;
    match bound {
        Bound::Start => start_of_day(tz, date),
        Bound::End => end_of_day(tz, date),
    }
}

fn fallback_window<Tz: TimeZone>(
    fallback: RangeFallback,
    now: &DateTime<Tz>,
) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
    match fallback {
        RangeFallback::ThisMonth => {
            let today = now.date_naive();
            month_window(&now.timezone(), today.year(), today.month())
        }
        RangeFallback::Trailing30Days => Ok((now.clone() - Duration::days(30), now.clone())),
    }
}

fn month_window<Tz: TimeZone>(
    tz: &Tz,
    year: i32,
    month: u32,
) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
    let first = ymd(year, month, 1)?;
    let next_first = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };
    let last = previous_day(next_first)?;
    Ok((start_of_day(tz, first)?, end_of_day(tz, last)?))
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| invalid_local_date(date))?;
    // Zones that skip midnight start the day one hour later.
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .ok_or_else(|| invalid_local_date(date))
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    let next = date.succ_opt().ok_or_else(|| invalid_local_date(date))?;
    Ok(start_of_day(tz, next)? - Duration::milliseconds(1))
}

fn previous_day(date: NaiveDate) -> Result<NaiveDate> {
    date.pred_opt().ok_or_else(|| invalid_local_date(date))
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid date {}-{}-{}", year, month, day)))
}

fn invalid_local_date(date: NaiveDate) -> AppError {
    AppError::InvalidInput(format!("invalid local date {}", date))
}
