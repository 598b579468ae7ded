//! Data loading
//!
//! Rank table and daily entry sources, plus the RON settings file.

pub mod loader;
pub mod settings;

pub use loader::{
    ParsedSource, ParsedEntries,
    parse_rank_csv, parse_entries_csv,
    read_source, load_engine, load_entries,
    read_settings, load_settings, save_settings,
};
pub use settings::{Settings, clamp_target_rank, DEFAULT_TARGET_RANK, DEFAULT_TABLE_PATH};
