//! Daily EXP ledger
//!
//! One cumulative EXP reading per day. Gains are derived from consecutive
//! readings rather than stored.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::grid::YearMonth;
use crate::progression::{parse_exp, Exp, Lookup, Progress, RankLookupEngine};

/// Cumulative EXP readings keyed by day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpLedger {
    entries: BTreeMap<NaiveDate, Exp>,
}

/// Month header figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month: YearMonth,
    /// Latest reading inside the month
    pub cumulative: Option<Exp>,
    /// Sum of day-over-day increases dated inside the month
    pub gained: Exp,
    pub recorded_days: usize,
}

/// Target rank readout for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetStatus {
    pub date: NaiveDate,
    pub target_rank: u32,
    /// Reading for the day, 0 when nothing is recorded
    pub current: Exp,
    pub target_exp: Lookup<Exp>,
    pub needed: Lookup<Exp>,
    pub progress: Lookup<Progress>,
}

impl ExpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a day's cumulative EXP, returning the replaced value
    pub fn record(&mut self, date: NaiveDate, exp: Exp) -> Option<Exp> {
        self.entries.insert(date, exp)
    }

    /// Record user-typed input. Input without digits clears the day.
    pub fn record_input(&mut self, date: NaiveDate, input: &str) -> Option<Exp> {
        match parse_exp(input) {
            Some(exp) => {
                self.record(date, exp);
                Some(exp)
            }
            None => {
                self.remove(date);
                None
            }
        }
    }

    pub fn remove(&mut self, date: NaiveDate) -> Option<Exp> {
        self.entries.remove(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<Exp> {
        self.entries.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Readings in date order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Exp)> + '_ {
        self.entries.iter().map(|(&date, &exp)| (date, exp))
    }

    /// Most recent reading strictly before `date`
    pub fn previous_entry(&self, date: NaiveDate) -> Option<(NaiveDate, Exp)> {
        self.entries
            .range(..date)
            .next_back()
            .map(|(&d, &exp)| (d, exp))
    }

    /// EXP gained on `date` relative to the previous reading.
    ///
    /// `None` when either reading is missing or the value went down.
    pub fn day_gain(&self, date: NaiveDate) -> Option<Exp> {
        let current = self.get(date)?;
        let (_, previous) = self.previous_entry(date)?;
        current.checked_sub(previous)
    }

    fn in_month(&self, month: YearMonth) -> impl Iterator<Item = (NaiveDate, Exp)> + '_ {
        self.entries
            .range(month.first_day()..)
            .take_while(move |&(&date, _)| month.contains(date))
            .map(|(&date, &exp)| (date, exp))
    }

    /// Latest reading dated inside `month`
    pub fn latest_in_month(&self, month: YearMonth) -> Option<(NaiveDate, Exp)> {
        self.in_month(month).last()
    }

    /// Sum of positive day-over-day deltas for readings inside `month`.
    /// The first reading compares against the last one before the month.
    pub fn month_gain(&self, month: YearMonth) -> Exp {
        let mut previous = self.previous_entry(month.first_day()).map(|(_, exp)| exp);
        let mut total: Exp = 0;
        for (_, exp) in self.in_month(month) {
            if let Some(prev) = previous {
                if exp > prev {
                    total = total.saturating_add(exp - prev);
                }
            }
            previous = Some(exp);
        }
        total
    }

    pub fn month_summary(&self, month: YearMonth) -> MonthSummary {
        MonthSummary {
            month,
            cumulative: self.latest_in_month(month).map(|(_, exp)| exp),
            gained: self.month_gain(month),
            recorded_days: self.in_month(month).count(),
        }
    }

    /// Target readout using the reading for `date`
    pub fn target_status(
        &self,
        date: NaiveDate,
        target_rank: u32,
        engine: &RankLookupEngine,
    ) -> TargetStatus {
        let current = self.get(date).unwrap_or(0);
        TargetStatus {
            date,
            target_rank,
            current,
            target_exp: engine.exp_for_rank(target_rank),
            needed: engine.exp_needed(current, target_rank),
            progress: engine.progress_toward(current, target_rank),
        }
    }
}
