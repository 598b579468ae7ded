//! Rank thresholds
//!
//! Builds the complete rank -> cumulative EXP table from sparse authoritative
//! rows and answers forward and inverse lookups against it.
//!
//! Ranks past the authoritative data are synthesized with a fixed growth
//! policy: every range is a straight line whose per-rank step is three times
//! the last authoritative gap, and beyond rank 2500 the step triples again
//! every 500 ranks. This models the assumption baked into the source data
//! and is not verified against the live game.

use super::xp::Exp;
use crate::error::RankTableError;

/// Highest rank the table covers
pub const MAX_RANK: u32 = 20_000;

/// Last rank the authoritative source is expected to cover
pub const AUTHORITATIVE_LIMIT: u32 = 2_500;

/// Ranks per extrapolated block past the authoritative limit
pub const BLOCK_SIZE: u32 = 500;

/// Multiplier applied to the anchor gap, and again per block
pub const STEP_GROWTH: Exp = 3;

/// Fixed-anchor ranges inside the authoritative window: (anchor rank, last rank)
const BRIDGE_RANGES: [(u32, u32); 2] = [(1_500, 2_000), (2_000, AUTHORITATIVE_LIMIT)];

/// Row counts from a table build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Distinct ranks taken from the source
    pub authoritative: usize,
    /// Ranks synthesized by extrapolation
    pub extrapolated: usize,
    /// Source rows outside 1..=MAX_RANK
    pub ignored: usize,
}

impl BuildReport {
    /// Total populated ranks
    pub fn populated(&self) -> usize {
        self.authoritative + self.extrapolated
    }
}

/// Immutable rank -> threshold table
#[derive(Debug, Clone)]
pub struct RankTable {
    /// Indexed by rank; slot 0 is never populated
    thresholds: Vec<Option<Exp>>,
    /// Populated (threshold, rank) pairs in ascending threshold order
    by_threshold: Vec<(Exp, u32)>,
    /// Highest rank among `by_threshold[..=i]`
    best_rank: Vec<u32>,
    lowest_rank: u32,
    highest_rank: u32,
    report: BuildReport,
}

impl RankTable {
    /// Build a table from (rank, cumulative EXP) rows.
    ///
    /// Rows may arrive in any order; a repeated rank keeps its last value.
    /// Fails only when no row lands inside 1..=MAX_RANK.
    pub fn build<I>(rows: I) -> Result<Self, RankTableError>
    where
        I: IntoIterator<Item = (u32, Exp)>,
    {
        let mut thresholds = vec![None; MAX_RANK as usize + 1];
        let mut report = BuildReport::default();

        for (rank, exp) in rows {
            if rank == 0 || rank > MAX_RANK {
                report.ignored += 1;
                continue;
            }
            thresholds[rank as usize] = Some(exp);
        }

        let authoritative: Vec<bool> = thresholds.iter().map(Option::is_some).collect();
        report.authoritative = authoritative.iter().filter(|&&present| present).count();
        if report.authoritative == 0 {
            return Err(RankTableError::DataUnavailable(format!(
                "no rows within ranks 1..={}",
                MAX_RANK
            )));
        }

        report.extrapolated = extrapolate(&mut thresholds, &authoritative);

        let mut by_threshold: Vec<(Exp, u32)> = thresholds
            .iter()
            .enumerate()
            .filter_map(|(rank, exp)| exp.map(|e| (e, rank as u32)))
            .collect();
        by_threshold.sort_unstable();

        let mut best_rank = Vec::with_capacity(by_threshold.len());
        let mut best = 0;
        for &(_, rank) in &by_threshold {
            best = best.max(rank);
            best_rank.push(best);
        }

        let lowest_rank = by_threshold.iter().map(|&(_, r)| r).min().unwrap_or(1);
        let highest_rank = best;

        Ok(Self {
            thresholds,
            by_threshold,
            best_rank,
            lowest_rank,
            highest_rank,
            report,
        })
    }

    /// Threshold for an exact rank, if populated
    pub fn threshold(&self, rank: u32) -> Option<Exp> {
        self.thresholds.get(rank as usize).copied().flatten()
    }

    /// Largest rank whose threshold is at most `exp`.
    ///
    /// Below every threshold this is the lowest populated rank; above every
    /// threshold it is the highest.
    pub fn rank_for_exp(&self, exp: Exp) -> u32 {
        let reached = self.by_threshold.partition_point(|&(threshold, _)| threshold <= exp);
        match reached {
            0 => self.lowest_rank,
            n => self.best_rank[n - 1],
        }
    }

    pub fn lowest_rank(&self) -> u32 {
        self.lowest_rank
    }

    pub fn highest_rank(&self) -> u32 {
        self.highest_rank
    }

    /// Number of populated ranks
    pub fn len(&self) -> usize {
        self.by_threshold.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_threshold.is_empty()
    }

    /// Populated (rank, threshold) pairs in rank order
    pub fn iter(&self) -> impl Iterator<Item = (u32, Exp)> + '_ {
        self.thresholds
            .iter()
            .enumerate()
            .filter_map(|(rank, exp)| exp.map(|e| (rank as u32, e)))
    }

    pub fn report(&self) -> BuildReport {
        self.report
    }
}

/// Fill missing ranks past the anchors. Returns how many ranks were added.
fn extrapolate(thresholds: &mut [Option<Exp>], authoritative: &[bool]) -> usize {
    let mut filled = 0;

    for (anchor, last) in BRIDGE_RANGES {
        let Some(step) = anchor_step(thresholds, authoritative, anchor) else {
            log::debug!("No anchors at ranks {}/{}, leaving {}..={} unfilled", anchor - 1, anchor, anchor + 1, last);
            continue;
        };
        match fill_range(thresholds, authoritative, anchor, last, step) {
            Some(n) => filled += n,
            None => log::warn!("Ranks {}..={} overflow, leaving them unfilled", anchor + 1, last),
        }
    }

    let Some(mut step) = anchor_step(thresholds, authoritative, AUTHORITATIVE_LIMIT) else {
        log::debug!(
            "No anchors at ranks {}/{}, table ends at the source data",
            AUTHORITATIVE_LIMIT - 1,
            AUTHORITATIVE_LIMIT
        );
        return filled;
    };

    let mut base = AUTHORITATIVE_LIMIT;
    loop {
        let last = (base + BLOCK_SIZE).min(MAX_RANK);
        match fill_range(thresholds, authoritative, base, last, step) {
            Some(n) => filled += n,
            None => {
                log::warn!("Extrapolation stopped at rank {}: block would overflow", base);
                break;
            }
        }
        base = last;
        if base >= MAX_RANK {
            break;
        }
        match step.checked_mul(STEP_GROWTH) {
            Some(next) => step = next,
            None => {
                log::warn!("Extrapolation stopped at rank {}: step overflow", base);
                break;
            }
        }
    }

    filled
}

/// Per-rank step from the gap between `anchor - 1` and `anchor`.
///
/// Both anchors must come from the source. A decreasing pair yields no step.
fn anchor_step(thresholds: &[Option<Exp>], authoritative: &[bool], anchor: u32) -> Option<Exp> {
    let (prev, at) = (anchor as usize - 1, anchor as usize);
    if !(authoritative[prev] && authoritative[at]) {
        return None;
    }
    let gap = thresholds[at]?.checked_sub(thresholds[prev]?)?;
    gap.checked_mul(STEP_GROWTH)
}

/// Write `t(base) + (r - base) * step` into every non-source rank in
/// `base+1..=last`. Writes nothing if the anchor is missing or the top of
/// the range would overflow.
fn fill_range(
    thresholds: &mut [Option<Exp>],
    authoritative: &[bool],
    base: u32,
    last: u32,
    step: Exp,
) -> Option<usize> {
    let anchor = thresholds[base as usize]?;
    // The top of the range is the largest value written
    let _top = Exp::from(last - base).checked_mul(step)?.checked_add(anchor)?;

    let mut filled = 0;
    for rank in base + 1..=last {
        if authoritative[rank as usize] {
            continue;
        }
        thresholds[rank as usize] = Some(anchor + Exp::from(rank - base) * step);
        filled += 1;
    }
    Some(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_rows() -> Vec<(u32, Exp)> {
        vec![
            (1, 0),
            (1499, 1_000),
            (1500, 1_100),
            (1999, 50_000),
            (2000, 56_000),
            (2499, 300_000),
            (2500, 330_000),
        ]
    }

    #[test]
    fn test_bridge_ranges_use_tripled_gap() {
        let table = RankTable::build(anchor_rows()).unwrap();
        // (1100 - 1000) * 3 = 300 per rank
        assert_eq!(table.threshold(1501), Some(1_400));
        assert_eq!(table.threshold(1502), Some(1_700));
        assert_eq!(table.threshold(1998), Some(1_100 + 498 * 300));
        // (56000 - 50000) * 3 = 18000 per rank
        assert_eq!(table.threshold(2001), Some(74_000));
        assert_eq!(table.threshold(2498), Some(56_000 + 498 * 18_000));
    }

    #[test]
    fn test_blocks_triple_step_and_reanchor() {
        let table = RankTable::build(anchor_rows()).unwrap();
        // Block 0: (330000 - 300000) * 3 = 90000 per rank
        assert_eq!(table.threshold(2501), Some(420_000));
        assert_eq!(table.threshold(3000), Some(330_000 + 500 * 90_000));
        // Block 1 anchors at t(3000) with 270000 per rank
        let anchor = table.threshold(3000).unwrap();
        assert_eq!(table.threshold(3001), Some(anchor + 270_000));
        assert_eq!(table.threshold(3500), Some(anchor + 500 * 270_000));
        assert_eq!(table.threshold(3501), Some(anchor + 500 * 270_000 + 810_000));
        assert!(table.threshold(MAX_RANK).is_some());
        assert_eq!(table.highest_rank(), MAX_RANK);
    }

    #[test]
    fn test_source_ranks_are_never_overwritten() {
        let mut rows = anchor_rows();
        rows.push((1600, 7));
        rows.push((3000, 999_999_999));
        let table = RankTable::build(rows).unwrap();

        assert_eq!(table.threshold(1600), Some(7));
        assert_eq!(table.threshold(1599), Some(1_100 + 99 * 300));
        assert_eq!(table.threshold(1601), Some(1_100 + 101 * 300));
        assert_eq!(table.threshold(3000), Some(999_999_999));
        // The next block anchors on the source value
        assert_eq!(table.threshold(3001), Some(999_999_999 + 270_000));
    }

    #[test]
    fn test_missing_anchor_leaves_gap() {
        let rows: Vec<_> = anchor_rows().into_iter().filter(|&(r, _)| r != 1499).collect();
        let table = RankTable::build(rows).unwrap();

        assert_eq!(table.threshold(1501), None);
        assert_eq!(table.threshold(2000), Some(56_000));
        assert_eq!(table.threshold(2001), Some(74_000));
        assert_eq!(table.threshold(2501), Some(420_000));
    }

    #[test]
    fn test_missing_block_anchor_stops_at_source() {
        let rows: Vec<_> = anchor_rows().into_iter().filter(|&(r, _)| r != 2499).collect();
        let table = RankTable::build(rows).unwrap();

        assert_eq!(table.threshold(2501), None);
        assert_eq!(table.highest_rank(), AUTHORITATIVE_LIMIT);
    }

    #[test]
    fn test_decreasing_anchor_pair_is_not_extrapolated() {
        let rows = vec![(1, 0), (1499, 2_000), (1500, 1_000)];
        let table = RankTable::build(rows).unwrap();
        assert_eq!(table.threshold(1501), None);
        assert_eq!(table.report().extrapolated, 0);
    }

    #[test]
    fn test_overflowing_block_is_left_unfilled() {
        let rows = vec![(1, 0), (2499, 0), (2500, Exp::MAX / 10)];
        let table = RankTable::build(rows).unwrap();
        assert_eq!(table.threshold(2501), None);
        assert_eq!(table.highest_rank(), 2500);
    }

    #[test]
    fn test_late_blocks_stop_on_overflow() {
        let rows = vec![(1, 0), (2499, 0), (2500, 100_000_000_000_000_000_000)];
        let table = RankTable::build(rows).unwrap();

        assert!(table.threshold(3000).is_some());
        assert_eq!(table.threshold(MAX_RANK), None);
        assert!(table.highest_rank() < MAX_RANK);
        assert_eq!(table.highest_rank() % BLOCK_SIZE, 0);
    }

    #[test]
    fn test_last_write_wins_and_out_of_range_ignored() {
        let rows = vec![(1, 0), (2, 10), (2, 20), (0, 5), (MAX_RANK + 1, 5)];
        let table = RankTable::build(rows).unwrap();

        assert_eq!(table.threshold(2), Some(20));
        let report = table.report();
        assert_eq!(report.authoritative, 2);
        assert_eq!(report.ignored, 2);
        assert_eq!(report.extrapolated, 0);
    }

    #[test]
    fn test_empty_rows_are_unavailable() {
        let err = RankTable::build(Vec::new()).unwrap_err();
        assert!(matches!(err, RankTableError::DataUnavailable(_)));

        let err = RankTable::build(vec![(0, 1)]).unwrap_err();
        assert!(matches!(err, RankTableError::DataUnavailable(_)));
    }

    #[test]
    fn test_rank_for_exp_largest_rank_at_or_below() {
        let table = RankTable::build(anchor_rows()).unwrap();

        // Ranks 2..=1498 are absent; 1500 is the last rank at or below 1250
        assert_eq!(table.rank_for_exp(1_250), 1500);
        assert_eq!(table.rank_for_exp(1_400), 1501);
        assert_eq!(table.rank_for_exp(999), 1);
        assert_eq!(table.rank_for_exp(0), 1);
        assert_eq!(table.rank_for_exp(Exp::MAX), MAX_RANK);
    }

    #[test]
    fn test_rank_for_exp_non_monotone_source() {
        // The bridge line passes t(1999) = 50000 at rank 1663
        let table = RankTable::build(anchor_rows()).unwrap();
        assert_eq!(table.threshold(1663), Some(50_000));
        assert_eq!(table.rank_for_exp(50_000), 1999);
        assert_eq!(table.rank_for_exp(49_999), 1662);
    }

    #[test]
    fn test_below_lowest_threshold_returns_lowest_rank() {
        let table = RankTable::build(vec![(5, 100), (6, 200)]).unwrap();
        assert_eq!(table.lowest_rank(), 5);
        assert_eq!(table.rank_for_exp(0), 5);
        assert_eq!(table.rank_for_exp(199), 5);
        assert_eq!(table.rank_for_exp(200), 6);
    }

    #[test]
    fn test_iter_in_rank_order() {
        let table = RankTable::build(vec![(3, 30), (1, 0), (2, 10)]).unwrap();
        let rows: Vec<_> = table.iter().collect();
        assert_eq!(rows, vec![(1, 0), (2, 10), (3, 30)]);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }
}
