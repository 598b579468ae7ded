use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rankcal::YearMonth;

#[derive(Parser, Debug)]
#[command(
    name = "rankcal",
    version,
    about = "Daily cumulative EXP calendar with rank lookup",
    long_about = "Looks up ranks from cumulative EXP against a rank table CSV \
    (header line, then rank,cumulativeExp rows) and summarises daily readings."
)]
pub struct Args {
    /// Rank table CSV. Overrides the path in the settings file.
    #[arg(short, long, env = "RANKCAL_TABLE")]
    pub table: Option<PathBuf>,

    /// RON settings file
    #[arg(short, long, env = "RANKCAL_SETTINGS", default_value = "rankcal.ron")]
    pub settings: PathBuf,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank attained with a cumulative EXP value
    Rank {
        /// Cumulative EXP; digit grouping like 1,234,567 is accepted
        exp: String,
    },
    /// Cumulative EXP required for a rank
    Exp { rank: u32 },
    /// Progress from a cumulative EXP value toward the target rank
    Progress {
        exp: String,
        /// Target rank (defaults to the settings file)
        #[arg(short = 'r', long)]
        target: Option<u32>,
    },
    /// Summarise a month of daily readings (CSV: date,cumulative)
    Month {
        entries: PathBuf,
        /// Month as YYYY-MM
        month: YearMonth,
        /// Target rank (defaults to the settings file)
        #[arg(short = 'r', long)]
        target: Option<u32>,
        /// Day used for the target readout (defaults to the latest reading in the month)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Emit the month grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a settings file with default values
    InitSettings {
        /// Destination (defaults to --settings)
        path: Option<PathBuf>,
    },
}
