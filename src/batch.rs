use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::emit::finalize_batch;
use crate::error::EngineError;
use crate::grid_source::GridSource;
use crate::model::CanonicalRecord;
use crate::options::{BatchWindow, EngineOptions};
use crate::pipeline::{DocumentReport, DocumentStatus, process_document, source_file_name};

/// File names of documents that were already extracted successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedManifest {
    processed: BTreeSet<String>,
}

impl ProcessedManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a manifest; a missing file is an empty manifest.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(error) => return Err(error.into()),
        };
        serde_json::from_str(&text).map_err(|error| {
            EngineError::Manifest(format!("'{}' is not a valid manifest: {error}", path.display()))
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, source_file: &str) -> bool {
        self.processed.contains(source_file)
    }

    pub fn insert(&mut self, source_file: impl Into<String>) -> bool {
        self.processed.insert(source_file.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_inputs: usize,
    pub selected: usize,
    pub succeeded: usize,
    pub empty: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_records: usize,
    pub failed_files: Vec<String>,
    /// Percentage of attempted (not skipped) documents that yielded records.
    pub success_rate: f64,
    /// Where the next window should start, if inputs remain.
    pub next_start_from: Option<usize>,
}

impl BatchSummary {
    #[allow(clippy::cast_precision_loss)]
    fn from_reports(
        reports: &[DocumentReport],
        total_inputs: usize,
        end: usize,
        total_records: usize,
    ) -> Self {
        let mut summary = Self {
            total_inputs,
            selected: reports.len(),
            total_records,
            next_start_from: (end < total_inputs).then_some(end),
            ..Self::default()
        };

        for report in reports {
            match &report.status {
                DocumentStatus::Extracted => summary.succeeded += 1,
                DocumentStatus::NoValidRecords => {
                    summary.empty += 1;
                    summary.failed_files.push(report.source_file.clone());
                }
                DocumentStatus::Failed(_) => {
                    summary.failed += 1;
                    summary.failed_files.push(report.source_file.clone());
                }
                DocumentStatus::Skipped => summary.skipped += 1,
            }
        }

        let attempted = summary.selected - summary.skipped;
        if attempted > 0 {
            summary.success_rate = summary.succeeded as f64 * 100.0 / attempted as f64;
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Globally deduplicated records, `row_order` dense over the batch.
    pub records: Vec<CanonicalRecord>,
    /// One report per selected document, in input order.
    pub documents: Vec<DocumentReport>,
    pub summary: BatchSummary,
}

/// Extracts every document in the window in parallel, then deduplicates and
/// renumbers the concatenated records in input order.
///
/// Documents listed in `manifest` are skipped; documents that yield records
/// are added to it.
pub fn process_batch<S>(
    source: &S,
    documents: &[PathBuf],
    window: BatchWindow,
    manifest: &mut ProcessedManifest,
    options: &EngineOptions,
) -> BatchOutcome
where
    S: GridSource + ?Sized,
{
    let (start, end) = window.bounds(documents.len());
    let already_processed = &*manifest;

    let reports = documents[start..end]
        .par_iter()
        .map(|document| {
            if already_processed.contains(&source_file_name(document)) {
                DocumentReport::skipped(document)
            } else {
                process_document(source, document, options)
            }
        })
        .collect::<Vec<_>>();

    for report in &reports {
        if report.status == DocumentStatus::Extracted {
            manifest.insert(report.source_file.clone());
        }
    }

    let records = finalize_batch(
        reports
            .iter()
            .map(|report| report.records.clone())
            .collect(),
    );
    let summary = BatchSummary::from_reports(&reports, documents.len(), end, records.len());
    info!(
        selected = summary.selected,
        succeeded = summary.succeeded,
        empty = summary.empty,
        failed = summary.failed,
        skipped = summary.skipped,
        records = summary.total_records,
        "batch finished"
    );

    BatchOutcome {
        records,
        documents: reports,
        summary,
    }
}
