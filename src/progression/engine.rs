//! Rank lookup engine
//!
//! Owns the rank table for the life of the process. The table is published
//! once; until then every query reports [`Lookup::Unavailable`].

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use super::rank_table::{BuildReport, RankTable};
use super::xp::{clamp_raw_exp, Exp};
use crate::data::loader::parse_rank_csv;
use crate::error::RankTableError;

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineState {
    Unready,
    Ready,
}

/// Result of a table query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Lookup<T> {
    /// No table has been loaded
    Unavailable,
    /// The table has no value for this query
    Unknown,
    Found(T),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Unavailable => Lookup::Unavailable,
            Lookup::Unknown => Lookup::Unknown,
            Lookup::Found(value) => Lookup::Found(f(value)),
        }
    }
}

/// Progress toward a target threshold, in percent (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Progress(f64);

impl Progress {
    /// `current / target` clamped to [0, 1], as a percentage.
    /// `target` must be non-zero.
    fn of(current: Exp, target: Exp) -> Self {
        let ratio = current as f64 / target as f64;
        Self(ratio.clamp(0.0, 1.0) * 100.0)
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self.0 >= 100.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 10.0 {
            write!(f, "{:.1}%", self.0)
        } else {
            write!(f, "{:.0}%", self.0)
        }
    }
}

/// Rank lookups against a once-loaded table.
///
/// Construct one per process and share it by reference. Queries are pure
/// and need no locking.
#[derive(Debug, Default)]
pub struct RankLookupEngine {
    table: OnceLock<RankTable>,
}

impl RankLookupEngine {
    /// Create an unready engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from rows, staying unready if the rows are unusable
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (u32, Exp)>,
    {
        let engine = Self::new();
        if let Err(e) = engine.load_rows(rows) {
            log::warn!("Rank table not loaded: {}", e);
        }
        engine
    }

    /// Build an engine from CSV source text, staying unready on failure
    pub fn from_csv(text: &str) -> Self {
        let engine = Self::new();
        if let Err(e) = engine.load_csv(text) {
            log::warn!("Rank table not loaded: {}", e);
        }
        engine
    }

    /// Build and publish the table. Only the first successful load sticks.
    pub fn load_rows<I>(&self, rows: I) -> Result<BuildReport, RankTableError>
    where
        I: IntoIterator<Item = (u32, Exp)>,
    {
        if self.table.get().is_some() {
            return Err(RankTableError::AlreadyLoaded);
        }

        let table = RankTable::build(rows)?;
        let report = table.report();
        self.table
            .set(table)
            .map_err(|_| RankTableError::AlreadyLoaded)?;

        log::info!(
            "Rank table ready: {} source ranks, {} extrapolated, {} ignored",
            report.authoritative,
            report.extrapolated,
            report.ignored
        );
        Ok(report)
    }

    /// Parse CSV source text and publish the table
    pub fn load_csv(&self, text: &str) -> Result<BuildReport, RankTableError> {
        let parsed = parse_rank_csv(text);
        if parsed.malformed > 0 {
            log::warn!("Skipped {} malformed rank rows", parsed.malformed);
        }
        if parsed.rows.is_empty() {
            return Err(RankTableError::DataUnavailable(
                "source has no usable rows".to_string(),
            ));
        }
        self.load_rows(parsed.rows)
    }

    pub fn state(&self) -> EngineState {
        if self.is_ready() {
            EngineState::Ready
        } else {
            EngineState::Unready
        }
    }

    pub fn is_ready(&self) -> bool {
        self.table.get().is_some()
    }

    /// The loaded table, if any
    pub fn table(&self) -> Option<&RankTable> {
        self.table.get()
    }

    /// Rank attained with `exp` cumulative experience
    pub fn rank_for_exp(&self, exp: Exp) -> Lookup<u32> {
        match self.table.get() {
            Some(table) => Lookup::Found(table.rank_for_exp(exp)),
            None => Lookup::Unavailable,
        }
    }

    /// Same as [`rank_for_exp`](Self::rank_for_exp) for untrusted numeric
    /// input; negative and non-finite values count as 0.
    pub fn rank_for_raw(&self, value: f64) -> Lookup<u32> {
        self.rank_for_exp(clamp_raw_exp(value))
    }

    /// Cumulative experience required for exactly `rank`
    pub fn exp_for_rank(&self, rank: u32) -> Lookup<Exp> {
        match self.table.get() {
            Some(table) => match table.threshold(rank) {
                Some(exp) => Lookup::Found(exp),
                None => Lookup::Unknown,
            },
            None => Lookup::Unavailable,
        }
    }

    /// Percentage of the way from 0 to the target rank's threshold.
    ///
    /// `Unknown` when the target threshold is missing or zero.
    pub fn progress_toward(&self, current: Exp, target_rank: u32) -> Lookup<Progress> {
        match self.exp_for_rank(target_rank) {
            Lookup::Found(0) => Lookup::Unknown,
            other => other.map(|target| Progress::of(current, target)),
        }
    }

    /// EXP still required to reach the target rank, floored at 0
    pub fn exp_needed(&self, current: Exp, target_rank: u32) -> Lookup<Exp> {
        self.exp_for_rank(target_rank)
            .map(|target| target.saturating_sub(current))
    }
}
