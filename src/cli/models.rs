//! `models` command: usage per model across sessions

use anyhow::Result;
use serde::Serialize;

use super::output::{format_cost, format_csv, format_tokens, Align, OutputFormat, Table};
use crate::services::Aggregator;
use crate::types::{Session, UsageTotals};

const CSV_HEADERS: [&str; 5] = [
    "model",
    "input_tokens",
    "output_tokens",
    "cache_tokens",
    "total_cost",
];

#[derive(Debug, Serialize)]
struct ModelRow {
    model: String,
    #[serde(flatten)]
    usage: UsageTotals,
}

#[derive(Debug, Serialize)]
struct ModelsReport {
    models: Vec<ModelRow>,
    totals: UsageTotals,
}

fn model_rows(sessions: &[Session]) -> Vec<ModelRow> {
    Aggregator::by_model(sessions)
        .into_iter()
        .map(|(model, usage)| ModelRow {
            model,
            usage: UsageTotals::from_summary(&usage, None),
        })
        .collect()
}

pub fn render(sessions: &[Session], format: OutputFormat) -> Result<String> {
    let rows = model_rows(sessions);
    let totals = Aggregator::totals(rows.iter().map(|r| &r.usage));

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ModelsReport {
            models: rows,
            totals,
        })?),
        OutputFormat::Csv => {
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.model.clone(),
                        r.usage.input_tokens.to_string(),
                        r.usage.output_tokens.to_string(),
                        r.usage.cache_tokens.to_string(),
                        r.usage.cost_usd.to_string(),
                    ]
                })
                .collect();
            Ok(format_csv(&CSV_HEADERS, &rows))
        }
        OutputFormat::Table => {
            let mut table = Table::new(&[
                ("MODEL", Align::Left),
                ("INPUT", Align::Right),
                ("OUTPUT", Align::Right),
                ("CACHE", Align::Right),
                ("COST", Align::Right),
            ]);
            for r in &rows {
                table.push(usage_cells(&r.model, &r.usage));
            }
            table.footer(usage_cells("TOTAL", &totals));
            Ok(table.render())
        }
    }
}

fn usage_cells(label: &str, usage: &UsageTotals) -> Vec<String> {
    vec![
        label.to_string(),
        format_tokens(usage.input_tokens),
        format_tokens(usage.output_tokens),
        format_tokens(usage.cache_tokens),
        format_cost(usage.cost_usd),
    ]
}
