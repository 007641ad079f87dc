use crate::error::Result;
use crate::extractor::{ExtractionOutcome, OutputWriter};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One processed file. Records are only created by [`BatchReportBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub source_path: PathBuf,
    pub success: bool,
    pub character_count: usize,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// The walk found no supported files.
    NothingFound,
    /// At least one file failed.
    PartialFailure,
    AllSucceeded,
}

/// Aggregate of a directory run. `processed_count + error_count` always
/// equals `file_records.len()`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub processed_count: usize,
    pub error_count: usize,
    pub file_records: Vec<FileRecord>,
    pub cancelled: bool,
    pub generated_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.file_records.len()
    }

    pub fn status(&self) -> BatchStatus {
        if self.file_records.is_empty() {
            BatchStatus::NothingFound
        } else if self.error_count > 0 {
            BatchStatus::PartialFailure
        } else {
            BatchStatus::AllSucceeded
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileRecord> {
        self.file_records.iter().filter(|record| !record.success)
    }

    pub fn total_characters(&self) -> usize {
        self.file_records.iter().map(|r| r.character_count).sum()
    }

    pub fn total_words(&self) -> usize {
        self.file_records.iter().map(|r| r.word_count).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        OutputWriter::default().write_text(path, &json)
    }
}

/// Accumulates outcomes in the order they are recorded.
#[derive(Debug)]
pub struct BatchReportBuilder {
    root: PathBuf,
    processed_count: usize,
    error_count: usize,
    file_records: Vec<FileRecord>,
    cancelled: bool,
}

impl BatchReportBuilder {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            processed_count: 0,
            error_count: 0,
            file_records: Vec::new(),
            cancelled: false,
        }
    }

    pub fn record(&mut self, source: &Path, outcome: &ExtractionOutcome, output_path: Option<PathBuf>) {
        if outcome.is_success() {
            self.processed_count += 1;
        } else {
            self.error_count += 1;
        }

        self.file_records.push(FileRecord {
            source_path: source.to_path_buf(),
            success: outcome.is_success(),
            character_count: outcome.character_count(),
            word_count: outcome.word_count(),
            error_message: outcome.error_message().map(str::to_string),
            output_path: output_path.filter(|_| outcome.is_success()),
        });
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn len(&self) -> usize {
        self.file_records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_records.is_empty()
    }

    pub fn finish(self) -> BatchReport {
        BatchReport {
            root: self.root,
            processed_count: self.processed_count,
            error_count: self.error_count,
            file_records: self.file_records,
            cancelled: self.cancelled,
            generated_at: Utc::now(),
        }
    }
}
