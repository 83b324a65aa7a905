mod models;
mod output;
mod period;
mod report;
mod session;
mod sessions;

pub use output::{format_cost, format_csv, format_tokens, OutputFormat};
pub use report::{filter_sessions, unknown_models_notice, DateRange};
pub use sessions::{sort_sessions, SortKey, SortOrder};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::services::{AppConfig, ConfigOverrides, DataLoaderService, Period};
use crate::types::UnknownModels;

/// Token & cost usage reports for OpenCode sessions
#[derive(Parser)]
#[command(name = "ocusage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where messages and local pricing are read from
#[derive(Args, Debug, Clone, Default)]
struct SourceArgs {
    /// Messages directory
    #[arg(short, long)]
    path: Option<String>,

    /// Model pricing file or directory of *.json files
    #[arg(long)]
    models: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
struct ReportArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    from: Option<String>,

    /// End date (YYYY-MM-DD), inclusive
    #[arg(short, long)]
    to: Option<String>,

    #[command(flatten)]
    source: SourceArgs,

    /// Output as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV
    #[arg(long)]
    csv: bool,

    /// Show unknown model names
    #[arg(long)]
    show_unknown: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all sessions
    Sessions {
        #[command(flatten)]
        report: ReportArgs,

        /// Filter by model
        #[arg(short, long)]
        model: Option<String>,

        /// Sort by
        #[arg(short, long, value_enum, default_value_t)]
        sort: SortKey,

        /// Sort order
        #[arg(long, value_enum, default_value_t)]
        order: SortOrder,
    },

    /// Show session details
    Session {
        /// Session ID (ses_xxx)
        id: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show usage by model
    Models {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Show daily usage
    Daily {
        #[command(flatten)]
        report: ReportArgs,

        /// Filter by model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show weekly usage
    Weekly {
        #[command(flatten)]
        report: ReportArgs,

        /// Filter by model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show monthly usage
    Monthly {
        #[command(flatten)]
        report: ReportArgs,

        /// Filter by model
        #[arg(short, long)]
        model: Option<String>,
    },
}

impl Commands {
    fn source(&self) -> &SourceArgs {
        match self {
            Commands::Session { source, .. } => source,
            Commands::Sessions { report, .. }
            | Commands::Models { report }
            | Commands::Daily { report, .. }
            | Commands::Weekly { report, .. }
            | Commands::Monthly { report, .. } => &report.source,
        }
    }
}

impl ReportArgs {
    fn format(&self) -> Result<OutputFormat> {
        match OutputFormat::from_flags(self.json, self.csv) {
            Some(format) => Ok(format),
            None => bail!("Cannot use --json and --csv together"),
        }
    }

    fn range(&self) -> Result<DateRange> {
        DateRange::parse(self.from.as_deref(), self.to.as_deref())
    }
}

impl Cli {
    /// Path flags for configuration resolution
    pub fn overrides(&self) -> ConfigOverrides {
        let source = self.command.source();
        ConfigOverrides {
            messages_dir: source.path.clone(),
            models_path: source.models.clone(),
        }
    }

    pub async fn run(self, config: &AppConfig) -> Result<()> {
        let loader = DataLoaderService::new(config);

        match self.command {
            Commands::Sessions {
                report,
                model,
                sort,
                order,
            } => {
                let (format, range) = (report.format()?, report.range()?);
                let data = loader.load().await?;
                let mut filtered = filter_sessions(data.sessions, &range, model.as_deref());
                sort_sessions(&mut filtered, sort, order);
                let output = sessions::render(&filtered, format)?;
                emit(&output, format, &data.unknown_models, report.show_unknown);
            }
            Commands::Session { id, json, .. } => {
                let data = loader.load().await?;
                let Some(session) = data.sessions.iter().find(|s| s.id == id) else {
                    bail!("Session not found: {}", id);
                };
                if json {
                    println!("{}", session::render_json(session)?);
                } else {
                    println!("{}", session::render_text(session));
                }
            }
            Commands::Models { report } => {
                let (format, range) = (report.format()?, report.range()?);
                let data = loader.load().await?;
                let filtered = filter_sessions(data.sessions, &range, None);
                let output = models::render(&filtered, format)?;
                emit(&output, format, &data.unknown_models, report.show_unknown);
            }
            Commands::Daily { report, model } => {
                run_period(&loader, Period::Daily, &report, model.as_deref()).await?
            }
            Commands::Weekly { report, model } => {
                run_period(&loader, Period::Weekly, &report, model.as_deref()).await?
            }
            Commands::Monthly { report, model } => {
                run_period(&loader, Period::Monthly, &report, model.as_deref()).await?
            }
        }

        Ok(())
    }
}

async fn run_period(
    loader: &DataLoaderService,
    kind: Period,
    report: &ReportArgs,
    model: Option<&str>,
) -> Result<()> {
    let (format, range) = (report.format()?, report.range()?);
    let data = loader.load().await?;
    let filtered = filter_sessions(data.sessions, &range, model);
    let output = period::render(&filtered, kind, format)?;
    emit(&output, format, &data.unknown_models, report.show_unknown);
    Ok(())
}

/// Print a report; table output is followed by the unknown-model notice on stderr
fn emit(output: &str, format: OutputFormat, unknown: &UnknownModels, show_unknown: bool) {
    println!("{}", output);
    if format == OutputFormat::Table {
        if let Some(notice) = unknown_models_notice(unknown, show_unknown) {
            eprintln!("{}", notice);
        }
    }
}
