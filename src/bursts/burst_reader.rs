//! # Burst file reader
//!
//! Plain-text burst lists, one burst per line:
//!
//! ```text
//! # time [s]   frequency [Hz]   de (optional)
//! -203.0       0.027441440005832807
//! 0.0          0.05255602595335716   0.34
//! ```
//!
//! Columns are separated by any amount of whitespace. Everything after a `#` is a
//! comment; blank lines are skipped. Each data line is normalised to a comma-separated
//! record and deserialised with `csv` + `serde`, so malformed numbers are reported with
//! the line number they came from in the original file.
use camino::Utf8Path;
use itertools::Itertools;
use serde::Deserialize;
use tracing::debug;

use crate::bursts::{BurstObservation, BurstSet};
use crate::eccburst_errors::EccBurstError;

#[derive(Debug, Deserialize)]
struct BurstRecord {
    time: f64,
    frequency: f64,
    #[serde(default)]
    de: Option<f64>,
}

/// Strip the comment part of a line and collapse its whitespace-separated columns.
///
/// Return `None` for lines without data.
fn normalize_line(raw: &str) -> Option<(usize, String)> {
    let data = raw.split('#').next().unwrap_or_default().trim();
    if data.is_empty() {
        return None;
    }
    let columns = data.split_whitespace().collect::<Vec<_>>();
    Some((columns.len(), columns.into_iter().join(",")))
}

/// Parse the content of a burst file.
///
/// Arguments
/// -----------------
/// * `content`: full text of the file.
///
/// Return
/// ----------
/// * A [`BurstSet`] in file order.
/// * `Err(EccBurstError::InvalidBurstRecord)` for a line with a column count other than 2
///   or 3, an unparsable number, or a non-finite value; `line` is 1-based.
/// * `Err(EccBurstError::UnorderedBursts)` if times decrease.
pub fn parse_burst_text(content: &str) -> Result<BurstSet, EccBurstError> {
    let mut line_numbers = Vec::new();
    let mut rows = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx as u64 + 1;
        let Some((n_columns, row)) = normalize_line(raw) else {
            continue;
        };
        if !(2..=3).contains(&n_columns) {
            return Err(EccBurstError::InvalidBurstRecord {
                line,
                reason: format!("expected 2 or 3 columns, found {n_columns}"),
            });
        }
        line_numbers.push(line);
        rows.push(row);
    }

    let data = rows.join("\n");
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut bursts = Vec::with_capacity(rows.len());
    for (record, &line) in csv_reader
        .deserialize::<BurstRecord>()
        .zip(line_numbers.iter())
    {
        let record = record.map_err(|e| EccBurstError::InvalidBurstRecord {
            line,
            reason: e.to_string(),
        })?;

        let finite_de = record.de.is_none_or(f64::is_finite);
        if !(record.time.is_finite() && record.frequency.is_finite() && finite_de) {
            return Err(EccBurstError::InvalidBurstRecord {
                line,
                reason: "non-finite value".into(),
            });
        }
        if record.frequency <= 0.0 {
            return Err(EccBurstError::InvalidBurstRecord {
                line,
                reason: format!("frequency must be > 0, found {}", record.frequency),
            });
        }

        bursts.push(BurstObservation {
            time: record.time,
            frequency: record.frequency,
            eccentricity_deficit: record.de,
        });
    }

    debug!(n_bursts = bursts.len(), "parsed burst list");
    BurstSet::new(bursts)
}

/// Read and parse a burst file from disk.
///
/// See [`parse_burst_text`] for the format and the errors.
pub fn read_burst_file(path: &Utf8Path) -> Result<BurstSet, EccBurstError> {
    let content = std::fs::read_to_string(path)?;
    parse_burst_text(&content)
}
