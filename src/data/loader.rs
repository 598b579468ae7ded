//! Source file loading
//!
//! Parses the rank table CSV and daily entry CSV, and reads/writes the RON
//! settings file. Bad lines are skipped rather than failing a whole load.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use super::settings::Settings;
use crate::calendar::ExpLedger;
use crate::error::DataError;
use crate::progression::{parse_exp, parse_exp_exact, Exp, RankLookupEngine};

/// Rows recovered from a rank table source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSource {
    /// (rank, cumulative EXP) in file order
    pub rows: Vec<(u32, Exp)>,
    /// Lines that didn't parse
    pub malformed: usize,
}

/// Daily entries recovered from an entries CSV
#[derive(Debug, Clone, Default)]
pub struct ParsedEntries {
    pub ledger: ExpLedger,
    pub malformed: usize,
}

/// Quoting is off so every record is exactly one line; a stray `"` only
/// spoils its own line.
fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

/// Parse `rank,cumulativeExp` lines after a header line.
///
/// Both columns must be plain base-10 integers.
pub fn parse_rank_csv(text: &str) -> ParsedSource {
    let mut parsed = ParsedSource::default();

    for (index, record) in csv_reader(text).records().enumerate() {
        let row = record.ok().and_then(|record| {
            let rank = record.get(0)?.parse::<u32>().ok()?;
            let exp = parse_exp_exact(record.get(1)?)?;
            Some((rank, exp))
        });
        match row {
            Some(row) => parsed.rows.push(row),
            None => {
                // +2: header line plus 1-based numbering
                log::debug!("Skipping malformed rank row at line {}", index + 2);
                parsed.malformed += 1;
            }
        }
    }

    parsed
}

/// Parse `date,cumulative` lines (ISO dates) after a header line.
///
/// The EXP column is read leniently like typed input, so `12 345` and
/// `12345exp` are accepted.
pub fn parse_entries_csv(text: &str) -> ParsedEntries {
    let mut parsed = ParsedEntries::default();

    for (index, record) in csv_reader(text).records().enumerate() {
        let entry = record.ok().and_then(|record| {
            let date = record.get(0)?.parse::<NaiveDate>().ok()?;
            let exp = parse_exp(record.get(1)?)?;
            Some((date, exp))
        });
        match entry {
            Some((date, exp)) => {
                parsed.ledger.record(date, exp);
            }
            None => {
                log::debug!("Skipping malformed entry at line {}", index + 2);
                parsed.malformed += 1;
            }
        }
    }

    parsed
}

/// Read a text source from disk
pub fn read_source(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the rank table at `path` and build an engine from it.
///
/// Any failure is logged and leaves the engine unready.
pub fn load_engine(path: &Path) -> RankLookupEngine {
    match read_source(path) {
        Ok(text) => RankLookupEngine::from_csv(&text),
        Err(e) => {
            log::warn!("{}", e);
            RankLookupEngine::new()
        }
    }
}

/// Read an entries CSV from disk
pub fn load_entries(path: &Path) -> Result<ParsedEntries, DataError> {
    let text = read_source(path)?;
    let parsed = parse_entries_csv(&text);
    if parsed.malformed > 0 {
        log::warn!("Skipped {} malformed entries in {:?}", parsed.malformed, path);
    }
    log::info!("Loaded {} entries from {:?}", parsed.ledger.len(), path);
    Ok(parsed)
}

/// Read settings, failing on I/O or parse errors
pub fn read_settings(path: &Path) -> Result<Settings, DataError> {
    let text = read_source(path)?;
    ron::from_str(&text).map_err(|e| DataError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load settings from `path`, falling back to defaults
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        log::debug!("No settings at {:?}, using defaults", path);
        return Settings::default();
    }
    match read_settings(path) {
        Ok(settings) => {
            log::info!("Settings loaded from {:?}", path);
            settings
        }
        Err(e) => {
            log::warn!("{}. Using default settings.", e);
            Settings::default()
        }
    }
}

/// Write settings as pretty RON, creating parent directories
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DataError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let text = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::default())
        .map_err(|e| DataError::Serialize(e.to_string()))?;
    fs::write(path, text).map_err(|source| DataError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Settings saved to {:?}", path);
    Ok(())
}
