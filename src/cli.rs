use anyhow::{Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use datalens::analyser::logic::{self, Statistic, charts, report};
use datalens::config::{InsightConfig, load_config};
use datalens::error::AnalysisError;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "datalens",
    about = "Descriptive statistics and insights for CSV datasets"
)]
pub struct Cli {
    /// JSON file with insight thresholds
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shape, column types and missing values
    Info {
        /// CSV file to analyse
        file: PathBuf,
    },
    /// Descriptive statistics for one or all numeric columns
    Stats {
        file: PathBuf,

        /// Numeric column; all numeric columns when omitted
        #[arg(short, long)]
        column: Option<String>,
    },
    /// Statistics of a numeric column split by a categorical column
    Groups {
        file: PathBuf,

        #[arg(short, long)]
        numeric: String,

        #[arg(short = 'g', long)]
        category: String,
    },
    /// Value counts of a column
    Breakdown {
        file: PathBuf,

        #[arg(short, long)]
        column: String,
    },
    /// Pairwise correlations, strongest first
    Correlation { file: PathBuf },
    /// Rule-based observations about the dataset
    Insights { file: PathBuf },
    /// Histogram bins of a numeric column, as JSON
    Histogram {
        file: PathBuf,

        #[arg(short, long)]
        column: String,

        /// Bin count; defaults to the configured `histogram_bins`
        #[arg(short, long)]
        bins: Option<usize>,
    },
    /// Correlation heatmap cells, as JSON
    Heatmap { file: PathBuf },
    /// Everything above in one report
    Report {
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Prefixes library errors with their kind, e.g. `NotNumericError: ...`.
fn named(err: AnalysisError) -> anyhow::Error {
    anyhow!("{}: {err}", err.kind())
}

fn load(path: &Path) -> Result<DataFrame> {
    logic::load_table(path).map_err(named)
}

pub fn run_command(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path).map_err(named)?,
        None => InsightConfig::default(),
    };
    log::debug!("Using settings {config:?}");

    let mut out = String::new();
    match cli.command {
        Commands::Info { file } => {
            let df = load(&file)?;
            let overview = logic::describe_dataset(&df).map_err(named)?;
            report::render_overview(&mut out, &overview);
        }
        Commands::Stats { file, column } => {
            let df = load(&file)?;
            match column {
                Some(column) => {
                    let stats = logic::compute_column_statistics(&df, &column).map_err(named)?;
                    report::render_statistics(&mut out, &column, &stats);
                }
                None => {
                    for (name, entry) in
                        logic::compute_all_columns_statistics(&df).map_err(named)?
                    {
                        report::render_statistic_entry(&mut out, &name, &entry);
                    }
                }
            }
        }
        Commands::Groups {
            file,
            numeric,
            category,
        } => {
            let df = load(&file)?;
            let groups = logic::compute_category_group_statistics(&df, &numeric, &category)
                .map_err(named)?;
            report::render_groups(&mut out, &groups);
        }
        Commands::Breakdown { file, column } => {
            let df = load(&file)?;
            for share in logic::category_breakdown(&df, &column).map_err(named)? {
                out.push_str(&format!(
                    "{}: {} ({:.1}%)\n",
                    share.value, share.count, share.percentage
                ));
            }
        }
        Commands::Correlation { file } => {
            let df = load(&file)?;
            let matrix = logic::compute_correlation_matrix(&df).map_err(named)?;
            for pair in logic::rank_correlations(&matrix, &config) {
                out.push_str(&format!(
                    "{} <-> {}: {:.3} ({})\n",
                    pair.left,
                    pair.right,
                    pair.coefficient,
                    pair.strength.as_str()
                ));
            }
            for (left, right, r) in matrix.pairs() {
                if let Statistic::Undefined(reason) = r {
                    out.push_str(&format!("{left} <-> {right}: undefined ({reason})\n"));
                }
            }
        }
        Commands::Insights { file } => {
            let df = load(&file)?;
            for line in logic::generate_insights_text(&df, &config).map_err(named)? {
                out.push_str(&line);
                out.push('\n');
            }
        }
        Commands::Histogram { file, column, bins } => {
            let df = load(&file)?;
            let hist = charts::histogram(&df, &column, bins.unwrap_or(config.histogram_bins))
                .map_err(named)?;
            out = serde_json::to_string_pretty(&hist)?;
        }
        Commands::Heatmap { file } => {
            let df = load(&file)?;
            out = serde_json::to_string_pretty(&charts::heatmap(&df).map_err(named)?)?;
        }
        Commands::Report { file, json } => {
            let df = load(&file)?;
            let analysis = logic::run_full_analysis(&df, &config).map_err(named)?;
            out = if json {
                analysis.to_json().map_err(named)?
            } else {
                analysis.render_text()
            };
        }
    }

    println!("{}", out.trim_end());
    Ok(())
}
