//! Rankcal - daily EXP calendar with rank lookup
//!
//! Record a cumulative EXP reading per day, and see the rank it earns,
//! what was gained since the last reading, and how far a target rank is.

pub mod error;
pub mod progression;
pub mod data;
pub mod calendar;

// Re-export commonly used types
pub use progression::{Exp, Lookup, Progress, RankLookupEngine, RankTable};
pub use calendar::{ExpLedger, MonthGrid, YearMonth};
pub use data::Settings;
