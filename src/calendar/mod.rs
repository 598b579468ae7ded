//! Calendar data
//!
//! Daily readings and the month grid built from them.

pub mod grid;
pub mod ledger;

pub use grid::{DayCell, MonthGrid, YearMonth, GRID_DAYS};
pub use ledger::{ExpLedger, MonthSummary, TargetStatus};
