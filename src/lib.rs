mod batch;
mod classify;
mod consolidate;
mod emit;
mod error;
mod fragment;
mod grid_source;
mod header;
mod model;
mod options;
mod output;
mod pdf_reader;
mod pipeline;
mod sanitize;
mod table_parse;
mod vocab;
mod warning;

pub use batch::{BatchOutcome, BatchSummary, ProcessedManifest, process_batch};
pub use emit::{finalize_batch, renumber};
pub use error::{EngineError, GridError};
pub use grid_source::{DumpPage, GridDump, GridSource, MemoryGridSource, PageGrids};
pub use header::FieldMap;
pub use model::{CanonicalField, CanonicalRecord, FieldValues, RawGrid, RawRow};
pub use options::{BatchWindow, EngineOptions, OutputFormat, PageSelection};
pub use output::{write_records, write_records_to_string};
pub use pdf_reader::PdfTextGridSource;
pub use pipeline::{DocumentReport, DocumentStatus, process_document, source_file_name};
pub use sanitize::{record_columns, sanitize_column_name};
pub use vocab::{STATUS_VOCABULARY, TEAM_VOCABULARY};
pub use warning::{ReportWarning, WarningCode};
