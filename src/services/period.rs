//! Date formatting, date argument parsing and report period keys

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

use crate::types::local_from_millis;

static DATE_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Reporting granularity for the daily, weekly and monthly commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// `YYYY-MM-DD`, ISO week `YYYY-Www`, or `YYYY-MM`
    pub fn key(&self, date: DateTime<Local>) -> String {
        match self {
            Period::Daily => date.format("%Y-%m-%d").to_string(),
            Period::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Period::Monthly => date.format("%Y-%m").to_string(),
        }
    }

    /// Column name used in CSV headers and JSON rows
    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "date",
            Period::Weekly => "week",
            Period::Monthly => "month",
        }
    }

    /// Top-level JSON key
    pub fn json_key(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

/// Local `YYYY-MM-DD`
pub fn format_date(millis: i64) -> String {
    local_from_millis(millis).format("%Y-%m-%d").to_string()
}

/// Local `Jan 5, 2025`
pub fn format_date_human(millis: i64) -> String {
    local_from_millis(millis).format("%b %-d, %Y").to_string()
}

/// Local `HH:MM:SS`
pub fn format_time(millis: i64) -> String {
    local_from_millis(millis).format("%H:%M:%S").to_string()
}

/// Strict `YYYY-MM-DD` parsing; rejects other shapes and impossible dates
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_ARG.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Epoch ms of local midnight at the start of `date`
pub fn start_of_day_millis(date: NaiveDate) -> i64 {
    local_millis(date, NaiveTime::default())
}

/// Epoch ms of the last millisecond of `date`, local time
pub fn end_of_day_millis(date: NaiveDate) -> i64 {
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::default());
    local_millis(date, end)
}

fn local_millis(date: NaiveDate, time: NaiveTime) -> i64 {
    let naive = date.and_time(time);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| naive.and_utc().with_timezone(&Local))
        .timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    // ========== Period keys ==========

    #[test]
    fn test_daily_key() {
        assert_eq!(Period::Daily.key(local(2025, 1, 5)), "2025-01-05");
    }

    #[test]
    fn test_monthly_key() {
        assert_eq!(Period::Monthly.key(local(2025, 11, 30)), "2025-11");
    }

    #[test]
    fn test_weekly_key_iso() {
        assert_eq!(Period::Weekly.key(local(2025, 1, 6)), "2025-W02");
        // Dec 29 2025 is in ISO week 1 of 2026
        assert_eq!(Period::Weekly.key(local(2025, 12, 29)), "2026-W01");
        // Jan 1 2021 belongs to week 53 of 2020
        assert_eq!(Period::Weekly.key(local(2021, 1, 1)), "2020-W53");
    }

    #[test]
    fn test_labels() {
        assert_eq!(Period::Weekly.label(), "week");
        assert_eq!(Period::Monthly.json_key(), "monthly");
    }

    // ========== Formatting ==========

    #[test]
    fn test_format_round_trip_local() {
        let millis = local(2025, 1, 5).timestamp_millis();
        assert_eq!(format_date(millis), "2025-01-05");
        assert_eq!(format_date_human(millis), "Jan 5, 2025");
        assert_eq!(format_time(millis), "12:00:00");
    }

    // ========== parse_date ==========

    #[test]
    fn test_parse_valid_date() {
        assert_eq!(
            parse_date("2025-02-28"),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(parse_date("2025-2-28").is_none());
        assert!(parse_date("2025/02/28").is_none());
        assert!(parse_date("2025-02-28T00:00").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_parse_rejects_impossible_date() {
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_date("2025-13-01").is_none());
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let start = start_of_day_millis(date);
        let end = end_of_day_millis(date);

        assert!(end > start);
        assert_eq!(format_date(start), "2025-03-10");
        assert_eq!(format_date(end), "2025-03-10");
        assert_eq!(format_time(end), "23:59:59");
    }
}
