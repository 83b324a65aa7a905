//! `sessions` command: one row per session

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::output::{
    format_cost, format_csv, format_duration, format_tokens, round_minutes, Align, OutputFormat,
    Table,
};
use crate::services::period::{format_date, format_date_human, format_time};
use crate::services::Aggregator;
use crate::types::{Session, UsageTotals};

const CSV_HEADERS: [&str; 10] = [
    "session_id",
    "date",
    "start_time",
    "end_time",
    "duration_minutes",
    "model",
    "input_tokens",
    "output_tokens",
    "cache_tokens",
    "total_cost",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Date,
    Cost,
    Tokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

fn compare(a: &Session, b: &Session, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.start_time.cmp(&b.start_time),
        SortKey::Cost => a.usage.total_cost.total_cmp(&b.usage.total_cost),
        SortKey::Tokens => a.usage.total_tokens().cmp(&b.usage.total_tokens()),
    }
}

/// Stable sort; equal keys keep their input order in both directions
pub fn sort_sessions(sessions: &mut [Session], key: SortKey, order: SortOrder) {
    match order {
        SortOrder::Asc => sessions.sort_by(|a, b| compare(a, b, key)),
        SortOrder::Desc => sessions.sort_by(|a, b| compare(b, a, key)),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRow {
    session_id: String,
    date: String,
    start_time: String,
    end_time: String,
    duration_minutes: f64,
    models: BTreeMap<String, UsageTotals>,
    #[serde(flatten)]
    usage: UsageTotals,
}

#[derive(Debug, Serialize)]
struct SessionsReport {
    sessions: Vec<SessionRow>,
    totals: UsageTotals,
}

fn session_row(session: &Session) -> SessionRow {
    SessionRow {
        session_id: session.id.clone(),
        date: format_date_human(session.start_time),
        start_time: format_time(session.start_time),
        end_time: format_time(session.end_time),
        duration_minutes: round_minutes(session.duration_minutes()),
        models: session
            .models
            .iter()
            .map(|(id, usage)| (id.clone(), UsageTotals::from_summary(usage, None)))
            .collect(),
        usage: UsageTotals::from_summary(&session.usage, None),
    }
}

/// Render already filtered and sorted sessions
pub fn render(sessions: &[Session], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<SessionRow> = sessions.iter().map(session_row).collect();
            let totals = Aggregator::totals(rows.iter().map(|r| &r.usage));
            Ok(serde_json::to_string_pretty(&SessionsReport {
                sessions: rows,
                totals,
            })?)
        }
        OutputFormat::Csv => {
            let rows: Vec<Vec<String>> = sessions
                .iter()
                .map(|s| {
                    vec![
                        s.id.clone(),
                        format_date(s.start_time),
                        format_time(s.start_time),
                        format_time(s.end_time),
                        round_minutes(s.duration_minutes()).to_string(),
                        s.model_names().join(","),
                        s.usage.input_tokens.to_string(),
                        s.usage.output_tokens.to_string(),
                        s.usage.cache_tokens.to_string(),
                        s.usage.total_cost.to_string(),
                    ]
                })
                .collect();
            Ok(format_csv(&CSV_HEADERS, &rows))
        }
        OutputFormat::Table => {
            let mut table = Table::new(&[
                ("SESSION_ID", Align::Left),
                ("DATE", Align::Left),
                ("START", Align::Left),
                ("END", Align::Left),
                ("DURATION", Align::Right),
                ("MODEL", Align::Left),
                ("INPUT", Align::Right),
                ("OUTPUT", Align::Right),
                ("CACHE", Align::Right),
                ("COST", Align::Right),
            ]);
            for s in sessions {
                table.push(vec![
                    s.id.clone(),
                    format_date(s.start_time),
                    format_time(s.start_time),
                    format_time(s.end_time),
                    format_duration(round_minutes(s.duration_minutes())),
                    s.model_display().to_string(),
                    format_tokens(s.usage.input_tokens),
                    format_tokens(s.usage.output_tokens),
                    format_tokens(s.usage.cache_tokens),
                    format_cost(s.usage.total_cost),
                ]);
            }
            Ok(table.render())
        }
    }
}
