//! Offline dream table preparation.
//!
//! Reads raw dream reports from a CSV export (one report per row in a
//! `dream_report` column), cleans and annotates each one with
//! [`heuristics`], and writes the dream table the service loads at startup.

pub mod heuristics;

use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::dataset::{save_table, DatasetError};
use crate::types::DreamRecord;

pub use heuristics::{analyze_dream_mood, clean_dream_text, extract_dream_elements};

/// Column holding the free-text report.
pub const REPORT_COLUMN: &str = "dream_report";

/// Reports shorter than this (after trimming) are skipped.
pub const MIN_REPORT_CHARS: usize = 20;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("input has no '{REPORT_COLUMN}' column")]
    MissingReportColumn,

    #[error(transparent)]
    Output(#[from] DatasetError),
}

/// Row counts from one preparation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareStats {
    pub read: usize,
    pub kept: usize,
    pub skipped: usize,
}

/// Clean and annotate one report. `None` when the report is too short.
pub fn process_report(dream_id: u64, report: &str) -> Option<DreamRecord> {
    if report.trim().chars().count() < MIN_REPORT_CHARS {
        return None;
    }

    let clean_text = clean_dream_text(report);
    let (mood_valence, mood_arousal) = analyze_dream_mood(&clean_text);
    let elements = extract_dream_elements(&clean_text);

    Some(DreamRecord {
        dream_id: Some(dream_id),
        original_text: report.to_string(),
        clean_text,
        mood_valence,
        mood_arousal,
        ..elements
    })
}

/// Process every report in a CSV source.
///
/// `dream_id` is the zero-based input row index, so ids of skipped rows
/// leave gaps.
pub fn prepare_reports<R: Read>(reader: R) -> Result<(Vec<DreamRecord>, PrepareStats), PrepareError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.trim() == REPORT_COLUMN)
        .ok_or(PrepareError::MissingReportColumn)?;

    let mut stats = PrepareStats::default();
    let mut records = Vec::new();
    for (index, row) in (0_u64..).zip(rdr.records()) {
        let row = row?;
        stats.read += 1;
        let report = row.get(column).unwrap_or("");
        match process_report(index, report) {
            Some(record) => {
                stats.kept += 1;
                records.push(record);
            }
            None => stats.skipped += 1,
        }
    }

    Ok((records, stats))
}

/// Read reports from `input` and write the dream table to `output`.
pub fn prepare_file(input: &Path, output: &Path) -> Result<PrepareStats, PrepareError> {
    let file = std::fs::File::open(input).map_err(|source| PrepareError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let (records, stats) = prepare_reports(std::io::BufReader::new(file))?;
    save_table(output, &records)?;
    info!(
        read = stats.read,
        kept = stats.kept,
        skipped = stats.skipped,
        output = %output.display(),
        "Dream table written"
    );
    Ok(stats)
}
