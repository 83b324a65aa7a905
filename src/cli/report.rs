//! Filters and notices shared by the report commands

use anyhow::{bail, Result};

use crate::services::period::{end_of_day_millis, parse_date, start_of_day_millis};
use crate::types::{Session, UnknownModels};

/// Inclusive range of session start times in epoch milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl DateRange {
    /// Parse `--from` / `--to`; `to` covers the whole local day
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self> {
        let from = match from {
            Some(text) => match parse_date(text) {
                Some(date) => Some(start_of_day_millis(date)),
                None => bail!("Invalid --from date: {}", text),
            },
            None => None,
        };
        let to = match to {
            Some(text) => match parse_date(text) {
                Some(date) => Some(end_of_day_millis(date)),
                None => bail!("Invalid --to date: {}", text),
            },
            None => None,
        };

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                bail!("Invalid date range: --from is after --to");
            }
        }

        Ok(Self { from, to })
    }

    pub fn contains(&self, millis: i64) -> bool {
        self.from.is_none_or(|from| millis >= from) && self.to.is_none_or(|to| millis <= to)
    }
}

/// Keep sessions starting inside `range` and, when given, using `model`
pub fn filter_sessions(sessions: Vec<Session>, range: &DateRange, model: Option<&str>) -> Vec<Session> {
    sessions
        .into_iter()
        .filter(|s| range.contains(s.start_time))
        .filter(|s| model.is_none_or(|m| m.is_empty() || s.uses_model(m)))
        .collect()
}

/// Notice about models priced at $0, or `None` when every model was priced
pub fn unknown_models_notice(unknown: &UnknownModels, show_details: bool) -> Option<String> {
    if unknown.is_empty() {
        return None;
    }

    let count = unknown.len();
    let plural = if count == 1 { "model" } else { "models" };

    if !show_details {
        return Some(format!(
            "Found {} unknown {} (cost set to $0). Use --show-unknown to see details.",
            count, plural
        ));
    }

    let mut models: Vec<&String> = unknown.models().iter().collect();
    models.sort();
    let mut lines = vec![format!("Found {} unknown {} (cost set to $0):", count, plural)];
    lines.extend(models.into_iter().map(|m| format!("  - {}", m)));
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UsageSummary;
    use chrono::NaiveDate;

    fn session(id: &str, start: i64, models: &[&str]) -> Session {
        let mut session = Session::empty();
        session.id = id.to_string();
        session.start_time = start;
        session.end_time = start;
        for model in models {
            session.models.insert(model.to_string(), UsageSummary::default());
        }
        session
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========== DateRange ==========

    #[test]
    fn test_parse_empty_range() {
        assert_eq!(DateRange::parse(None, None).unwrap(), DateRange::default());
    }

    #[test]
    fn test_parse_to_is_end_of_day() {
        let range = DateRange::parse(Some("2025-01-05"), Some("2025-01-05")).unwrap();

        assert_eq!(range.from, Some(start_of_day_millis(day(2025, 1, 5))));
        assert_eq!(range.to, Some(end_of_day_millis(day(2025, 1, 5))));
        assert!(range.contains(start_of_day_millis(day(2025, 1, 5)) + 3_600_000));
        assert!(!range.contains(start_of_day_millis(day(2025, 1, 6))));
    }

    #[test]
    fn test_parse_invalid_dates() {
        let err = DateRange::parse(Some("2025/01/05"), None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid --from date: 2025/01/05");

        let err = DateRange::parse(None, Some("2025-02-30")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid --to date: 2025-02-30");
    }

    #[test]
    fn test_parse_reversed_range() {
        let err = DateRange::parse(Some("2025-02-01"), Some("2025-01-01")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid date range: --from is after --to");
    }

    // ========== filter_sessions ==========

    #[test]
    fn test_filter_by_range_and_model() {
        let jan5 = start_of_day_millis(day(2025, 1, 5));
        let jan20 = start_of_day_millis(day(2025, 1, 20));
        let sessions = vec![
            session("a", jan5, &["gpt-4o"]),
            session("b", jan20, &["gpt-4o", "o3"]),
            session("c", jan20, &["o3"]),
        ];

        let range = DateRange::parse(Some("2025-01-10"), None).unwrap();
        let filtered = filter_sessions(sessions.clone(), &range, Some("gpt-4o"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");

        let all = filter_sessions(sessions, &DateRange::default(), None);
        assert_eq!(all.len(), 3);
    }

    // ========== unknown_models_notice ==========

    #[test]
    fn test_notice_none_when_empty() {
        assert!(unknown_models_notice(&UnknownModels::new(), true).is_none());
    }

    #[test]
    fn test_notice_summary_and_details() {
        let mut unknown = UnknownModels::new();
        unknown.record("zeta/model");
        unknown.record("alpha/model");

        assert_eq!(
            unknown_models_notice(&unknown, false).unwrap(),
            "Found 2 unknown models (cost set to $0). Use --show-unknown to see details."
        );
        assert_eq!(
            unknown_models_notice(&unknown, true).unwrap(),
            "Found 2 unknown models (cost set to $0):\n  - alpha/model\n  - zeta/model"
        );
    }

    #[test]
    fn test_notice_singular() {
        let mut unknown = UnknownModels::new();
        unknown.record("vendor/x");
        assert!(unknown_models_notice(&unknown, false)
            .unwrap()
            .starts_with("Found 1 unknown model (cost"));
    }
}
