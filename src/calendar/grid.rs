//! Month navigation and the month grid
//!
//! Produces the 6x7 block of days a calendar view draws for one month,
//! with each day's recorded value, gain, and rank already resolved.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Serialize, Serializer};

use super::ledger::ExpLedger;
use crate::error::CalendarError;
use crate::progression::{Exp, Lookup, RankLookupEngine};

/// Days shown per grid (six weeks)
pub const GRID_DAYS: usize = 42;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// Always the 1st of the month
    first: NaiveDate,
}

impl YearMonth {
    /// `month` is 1-based
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Following month, rolling December into January
    pub fn succ(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Preceding month, rolling January into December
    pub fn pred(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Sunday on or before the 1st; the first cell of the grid
    pub fn grid_start(&self) -> NaiveDate {
        let offset = self.first.weekday().num_days_from_sunday();
        self.first - Days::new(u64::from(offset))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One day in the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the leading/trailing days of neighbouring months
    pub in_month: bool,
    pub is_today: bool,
    /// Recorded cumulative EXP
    pub cumulative: Option<Exp>,
    /// Increase over the previous recorded day
    pub gain: Option<Exp>,
    /// Rank for the recorded value; `None` when nothing is recorded
    pub rank: Option<Lookup<u32>>,
}

/// The 42 days displayed for a month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Resolve every cell for `month`. Ranks are looked up only for days
    /// with a recorded value.
    pub fn build(
        month: YearMonth,
        ledger: &ExpLedger,
        engine: &RankLookupEngine,
        today: NaiveDate,
    ) -> Self {
        let cells = month
            .grid_start()
            .iter_days()
            .take(GRID_DAYS)
            .map(|date| {
                let cumulative = ledger.get(date);
                DayCell {
                    date,
                    in_month: month.contains(date),
                    is_today: date == today,
                    cumulative,
                    gain: ledger.day_gain(date),
                    rank: cumulative.map(|exp| engine.rank_for_exp(exp)),
                }
            })
            .collect();

        Self { month, cells }
    }

    /// Cells split into rows of seven, Sunday first
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    /// Cells inside the month that have a recorded value
    pub fn recorded(&self) -> impl Iterator<Item = &DayCell> {
        self.cells
            .iter()
            .filter(|cell| cell.in_month && cell.cumulative.is_some())
    }
}
