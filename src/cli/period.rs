//! `daily`, `weekly` and `monthly` commands

use anyhow::Result;
use serde_json::{json, Map, Value};

use super::output::{format_cost, format_csv, format_tokens, Align, OutputFormat, Table};
use crate::services::{Aggregator, Period, PeriodUsage};
use crate::types::{Session, UsageTotals};

struct PeriodRow {
    key: String,
    models: Vec<String>,
    usage: UsageTotals,
}

impl PeriodRow {
    fn new(key: String, period: PeriodUsage) -> Self {
        Self {
            key,
            models: period.models.into_iter().collect(),
            usage: UsageTotals::from_summary(&period.usage, Some(period.sessions)),
        }
    }

    fn sessions(&self) -> u64 {
        self.usage.sessions.unwrap_or(0)
    }
}

fn period_rows(sessions: &[Session], period: Period) -> Vec<PeriodRow> {
    Aggregator::by_period(sessions, |date| period.key(date))
        .into_iter()
        .map(|(key, usage)| PeriodRow::new(key, usage))
        .collect()
}

fn json_row(period: Period, row: &PeriodRow) -> Value {
    let mut object = Map::new();
    object.insert(period.label().to_string(), json!(row.key));
    object.insert("sessions".to_string(), json!(row.sessions()));
    object.insert("inputTokens".to_string(), json!(row.usage.input_tokens));
    object.insert("outputTokens".to_string(), json!(row.usage.output_tokens));
    object.insert("cacheTokens".to_string(), json!(row.usage.cache_tokens));
    object.insert("costUSD".to_string(), json!(row.usage.cost_usd));
    object.insert("models".to_string(), json!(row.models));
    Value::Object(object)
}

pub fn render(sessions: &[Session], period: Period, format: OutputFormat) -> Result<String> {
    let rows = period_rows(sessions, period);
    let mut totals = Aggregator::totals(rows.iter().map(|r| &r.usage));
    totals.sessions.get_or_insert(0);

    match format {
        OutputFormat::Json => {
            let mut report = Map::new();
            report.insert(
                period.json_key().to_string(),
                Value::Array(rows.iter().map(|r| json_row(period, r)).collect()),
            );
            report.insert("totals".to_string(), serde_json::to_value(totals)?);
            Ok(serde_json::to_string_pretty(&Value::Object(report))?)
        }
        OutputFormat::Csv => {
            let headers = [
                period.label(),
                "sessions",
                "input_tokens",
                "output_tokens",
                "cache_tokens",
                "cost_usd",
                "models",
            ];
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.key.clone(),
                        r.sessions().to_string(),
                        r.usage.input_tokens.to_string(),
                        r.usage.output_tokens.to_string(),
                        r.usage.cache_tokens.to_string(),
                        r.usage.cost_usd.to_string(),
                        r.models.join(", "),
                    ]
                })
                .collect();
            Ok(format_csv(&headers, &rows))
        }
        OutputFormat::Table => {
            let mut table = Table::new(&[
                ("PERIOD", Align::Left),
                ("SESSIONS", Align::Right),
                ("INPUT", Align::Right),
                ("OUTPUT", Align::Right),
                ("CACHE", Align::Right),
                ("COST", Align::Right),
                ("MODELS", Align::Left),
            ]);
            for r in &rows {
                table.push(vec![
                    r.key.clone(),
                    r.sessions().to_string(),
                    format_tokens(r.usage.input_tokens),
                    format_tokens(r.usage.output_tokens),
                    format_tokens(r.usage.cache_tokens),
                    format_cost(r.usage.cost_usd),
                    r.models.join(", "),
                ]);
            }
            table.footer(vec![
                "TOTAL".to_string(),
                totals.sessions.unwrap_or(0).to_string(),
                format_tokens(totals.input_tokens),
                format_tokens(totals.output_tokens),
                format_tokens(totals.cache_tokens),
                format_cost(totals.cost_usd),
                String::new(),
            ]);
            Ok(table.render())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UsageSummary;
    use chrono::{Local, TimeZone};

    fn session_at(y: i32, m: u32, d: u32, model: &str, input: u64) -> Session {
        let start = Local
            .with_ymd_and_hms(y, m, d, 12, 0, 0)
            .unwrap()
            .timestamp_millis();
        let usage = UsageSummary {
            input_tokens: input,
            total_cost: input as f64 / 1000.0,
            ..Default::default()
        };
        let mut session = Session::empty();
        session.start_time = start;
        session.end_time = start;
        session.usage = usage;
        session.models.insert(model.to_string(), usage);
        session
    }

    fn sessions() -> Vec<Session> {
        vec![
            session_at(2025, 1, 21, "o3", 2000),
            session_at(2025, 1, 20, "gpt-4o", 1000),
            session_at(2025, 1, 20, "o3", 500),
            session_at(2025, 2, 3, "gpt-4o", 100),
        ]
    }

    // ========== JSON ==========

    #[test]
    fn test_daily_json() {
        let output = render(&sessions(), Period::Daily, OutputFormat::Json).unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();

        let rows = json["daily"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["date"], "2025-01-20");
        assert_eq!(rows[0]["sessions"], 2);
        assert_eq!(rows[0]["inputTokens"], 1500);
        assert_eq!(rows[0]["models"], json!(["gpt-4o", "o3"]));
        assert_eq!(json["totals"]["sessions"], 4);
        assert_eq!(json["totals"]["inputTokens"], 3600);
    }

    #[test]
    fn test_weekly_and_monthly_keys() {
        let weekly: Value = serde_json::from_str(
            &render(&sessions(), Period::Weekly, OutputFormat::Json).unwrap(),
        )
        .unwrap();
        let weeks: Vec<&str> = weekly["weekly"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["week"].as_str().unwrap())
            .collect();
        assert_eq!(weeks, ["2025-W04", "2025-W06"]);

        let monthly: Value = serde_json::from_str(
            &render(&sessions(), Period::Monthly, OutputFormat::Json).unwrap(),
        )
        .unwrap();
        assert_eq!(monthly["monthly"][0]["month"], "2025-01");
        assert_eq!(monthly["monthly"][0]["sessions"], 3);
        assert_eq!(monthly["monthly"][1]["month"], "2025-02");
    }

    #[test]
    fn test_empty_totals_keep_session_count() {
        let json: Value =
            serde_json::from_str(&render(&[], Period::Daily, OutputFormat::Json).unwrap())
                .unwrap();
        assert_eq!(json["daily"], json!([]));
        assert_eq!(json["totals"]["sessions"], 0);
    }

    // ========== CSV / table ==========

    #[test]
    fn test_monthly_csv() {
        let output = render(&sessions(), Period::Monthly, OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "month,sessions,input_tokens,output_tokens,cache_tokens,cost_usd,models"
        );
        assert_eq!(lines[1], "2025-01,3,3500,0,0,3.5,\"gpt-4o, o3\"");
        assert_eq!(lines[2], "2025-02,1,100,0,0,0.1,gpt-4o");
    }

    #[test]
    fn test_weekly_table() {
        let output = render(&sessions(), Period::Weekly, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("PERIOD"));
        assert!(lines[1].starts_with("2025-W04"));
        assert!(lines[1].ends_with("gpt-4o, o3"));
        assert!(lines[4].starts_with("TOTAL"));
        assert!(lines[4].contains("3,600"));
    }
}
