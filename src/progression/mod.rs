//! Rank progression
//!
//! EXP values, the rank threshold table, and the lookup engine over it.

pub mod xp;
pub mod rank_table;
pub mod engine;

pub use xp::{Exp, parse_exp, parse_exp_exact, format_exp, clamp_raw_exp};
pub use rank_table::{RankTable, BuildReport, MAX_RANK, AUTHORITATIVE_LIMIT, BLOCK_SIZE, STEP_GROWTH};
pub use engine::{RankLookupEngine, EngineState, Lookup, Progress};
