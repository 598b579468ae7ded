//! Rankcal - Entry Point
//!
//! Loads settings and the rank table, then answers one query per run.

mod args;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use rankcal::calendar::{MonthGrid, MonthSummary, TargetStatus};
use rankcal::data::{self, clamp_target_rank, Settings};
use rankcal::progression::{format_exp, parse_exp, Exp, Lookup, RankLookupEngine};
use rankcal::YearMonth;

use args::{Args, Command};

/// Everything the month view shows
#[derive(Serialize)]
struct MonthReport {
    summary: MonthSummary,
    target: Option<TargetStatus>,
    grid: MonthGrid,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_str())
    )
    .init();

    log::info!("Starting rankcal v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::InitSettings { path } => {
            let path = path.unwrap_or(args.settings);
            data::save_settings(&path, &Settings::default())?;
            println!("wrote {}", path.display());
        }
        Command::Rank { exp } => {
            let exp = parse_exp_arg(&exp)?;
            let session = Session::open(args.table, &args.settings);
            session.require_ready()?;
            println!("{}", show(session.engine.rank_for_exp(exp)));
        }
        Command::Exp { rank } => {
            let session = Session::open(args.table, &args.settings);
            session.require_ready()?;
            println!("{}", show(session.engine.exp_for_rank(rank).map(format_exp)));
        }
        Command::Progress { exp, target } => {
            let exp = parse_exp_arg(&exp)?;
            let session = Session::open(args.table, &args.settings);
            session.require_ready()?;
            let engine = &session.engine;
            let target = session.target_rank(target);
            println!("target rank: {}", target);
            println!("target exp:  {}", show(engine.exp_for_rank(target).map(format_exp)));
            println!("needed:      {}", show(engine.exp_needed(exp, target).map(format_exp)));
            println!("progress:    {}", show(engine.progress_toward(exp, target)));
        }
        Command::Month { entries, month, target, date, json } => {
            let session = Session::open(args.table, &args.settings);
            if !session.engine.is_ready() {
                log::warn!("Rank table unavailable, ranks will be blank");
            }
            let parsed = data::load_entries(&entries)
                .with_context(|| format!("loading entries for {}", month))?;
            let ledger = parsed.ledger;
            let target = session.target_rank(target);

            let summary = ledger.month_summary(month);
            let focus = date.or_else(|| ledger.latest_in_month(month).map(|(d, _)| d));
            let status = focus.map(|d| ledger.target_status(d, target, &session.engine));
            let today = chrono::Local::now().date_naive();
            let grid = MonthGrid::build(month, &ledger, &session.engine, today);

            if json {
                let report = MonthReport { summary, target: status, grid };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_month(month, &summary, status.as_ref(), &grid);
            }
        }
    }

    Ok(())
}

/// Settings and rank table for one run
struct Session {
    settings: Settings,
    table_path: PathBuf,
    engine: RankLookupEngine,
}

impl Session {
    /// Load settings, then the rank table (the CLI path wins over settings)
    fn open(table: Option<PathBuf>, settings_path: &Path) -> Self {
        let settings = data::load_settings(settings_path);
        let table_path = table.unwrap_or_else(|| settings.table_path.clone());
        let engine = data::load_engine(&table_path);
        Self { settings, table_path, engine }
    }

    fn require_ready(&self) -> Result<()> {
        if !self.engine.is_ready() {
            bail!("rank table unavailable: {}", self.table_path.display());
        }
        Ok(())
    }

    fn target_rank(&self, requested: Option<u32>) -> u32 {
        clamp_target_rank(requested.unwrap_or(self.settings.target_rank))
    }
}

fn parse_exp_arg(raw: &str) -> Result<Exp> {
    match parse_exp(raw) {
        Some(exp) => Ok(exp),
        None => bail!("invalid EXP value '{}'", raw),
    }
}

/// Found values print as-is; anything else prints as `-`
fn show<T: Display>(lookup: Lookup<T>) -> String {
    match lookup {
        Lookup::Found(value) => value.to_string(),
        Lookup::Unknown | Lookup::Unavailable => "-".to_string(),
    }
}

fn print_month(
    month: YearMonth,
    summary: &MonthSummary,
    status: Option<&TargetStatus>,
    grid: &MonthGrid,
) {
    println!("{}", month);
    println!(
        "cumulative: {}",
        summary.cumulative.map(format_exp).unwrap_or_else(|| "-".to_string())
    );
    println!("gained:     {}", format_exp(summary.gained));

    if let Some(status) = status {
        println!(
            "target {} on {}: needed {}, progress {}",
            status.target_rank,
            status.date,
            show(status.needed.map(format_exp)),
            show(status.progress)
        );
    }

    println!();
    println!("{:<10}  {:>16}  {:>12}  {:>6}", "date", "cumulative", "gain", "rank");
    for cell in grid.recorded() {
        let cumulative = cell.cumulative.map(format_exp).unwrap_or_default();
        let gain = cell.gain.map(format_exp).unwrap_or_default();
        let rank = cell.rank.map(show).unwrap_or_default();
        println!("{:<10}  {:>16}  {:>12}  {:>6}", cell.date, cumulative, gain, rank);
    }
}
