//! Dream table: the precomputed reference records.
//!
//! Loaded once at startup from a CSV file and never mutated afterwards, so
//! it is shared between requests behind an `Arc` without locking.
//!
//! Expected columns (extra columns are ignored, `dream_id` is optional):
//!
//! ```text
//! dream_id,original_text,clean_text,mood_valence,mood_arousal,
//! emotions,settings,characters,objects,activities,colors,themes
//! ```
//!
//! Tag columns hold list literals such as `['fear', 'happy']`.

pub mod tag_list;

pub use tag_list::{format_tag_list, parse_tag_list, TagListError};

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{DreamRecord, TagField};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}, column {column}: {source}")]
    TagList {
        line: u64,
        column: &'static str,
        #[source]
        source: TagListError,
    },

    #[error("line {line}, column {column}: mood score must be finite")]
    NonFiniteMood { line: u64, column: &'static str },
}

/// One CSV row as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
struct RawDreamRow {
    #[serde(default)]
    dream_id: Option<u64>,
    original_text: String,
    clean_text: String,
    mood_valence: f64,
    mood_arousal: f64,
    emotions: String,
    settings: String,
    characters: String,
    objects: String,
    activities: String,
    colors: String,
    themes: String,
}

impl RawDreamRow {
    fn from_record(record: &DreamRecord) -> Self {
        let lit = |field| format_tag_list(record.tags(field));
        Self {
            dream_id: record.dream_id,
            original_text: record.original_text.clone(),
            clean_text: record.clean_text.clone(),
            mood_valence: record.mood_valence,
            mood_arousal: record.mood_arousal,
            emotions: lit(TagField::Emotions),
            settings: lit(TagField::Settings),
            characters: lit(TagField::Characters),
            objects: lit(TagField::Objects),
            activities: lit(TagField::Activities),
            colors: lit(TagField::Colors),
            themes: lit(TagField::Themes),
        }
    }

    fn into_record(self, line: u64) -> Result<DreamRecord, DatasetError> {
        for (column, value) in [("mood_valence", self.mood_valence), ("mood_arousal", self.mood_arousal)] {
            if !value.is_finite() {
                return Err(DatasetError::NonFiniteMood { line, column });
            }
        }

        let mut record = DreamRecord {
            dream_id: self.dream_id,
            original_text: self.original_text,
            clean_text: self.clean_text,
            mood_valence: self.mood_valence,
            mood_arousal: self.mood_arousal,
            ..DreamRecord::default()
        };

        let raw_tags = [
            (TagField::Emotions, self.emotions),
            (TagField::Settings, self.settings),
            (TagField::Characters, self.characters),
            (TagField::Objects, self.objects),
            (TagField::Activities, self.activities),
            (TagField::Colors, self.colors),
            (TagField::Themes, self.themes),
        ];
        for (field, raw) in raw_tags {
            *record.tags_mut(field) =
                parse_tag_list(&raw).map_err(|source| DatasetError::TagList {
                    line,
                    column: field.column(),
                    source,
                })?;
        }

        Ok(record)
    }
}

/// Immutable in-memory dream table.
#[derive(Debug, Clone, Default)]
pub struct DreamTable {
    records: Vec<DreamRecord>,
}

impl DreamTable {
    pub const fn new(records: Vec<DreamRecord>) -> Self {
        Self { records }
    }

    /// Load a table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        tracing::info!(count = table.len(), path = %path.display(), "Loaded dream table");
        Ok(table)
    }

    /// Read a table from any CSV source (header row required).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            let line = row.position().map_or(0, csv::Position::line);
            let raw: RawDreamRow = row.deserialize(Some(&headers))?;
            records.push(raw.into_record(line)?);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[DreamRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Write records as a dream table CSV.
pub fn write_table<W: Write>(writer: W, records: &[DreamRecord]) -> Result<(), DatasetError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(RawDreamRow::from_record(record))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write records to a CSV file, replacing any existing file.
pub fn save_table(path: &Path, records: &[DreamRecord]) -> Result<(), DatasetError> {
    let file = std::fs::File::create(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_table(std::io::BufWriter::new(file), records)
}
