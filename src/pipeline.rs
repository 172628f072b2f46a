use std::path::Path;

use tracing::{debug, info, warn};

use crate::classify::classify_row;
use crate::consolidate::consolidate_rows;
use crate::emit::emit_records;
use crate::error::GridError;
use crate::fragment::filter_fragments;
use crate::grid_source::{GridSource, PageGrids};
use crate::header::{FieldMap, drop_blank_leading_column, is_column_header_row, resolve_field_map};
use crate::model::{CanonicalRecord, ClassifiedRow, RawGrid};
use crate::options::EngineOptions;
use crate::warning::{ReportWarning, WarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    Extracted,
    /// The document was read but nothing survived reconstruction.
    NoValidRecords,
    /// The grid source could not open the document at all.
    Failed(String),
    /// Already listed in the processed-files manifest.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    pub source_file: String,
    pub records: Vec<CanonicalRecord>,
    pub status: DocumentStatus,
    pub pages_processed: u32,
    pub pages_skipped: u32,
    pub warnings: Vec<ReportWarning>,
}

impl DocumentReport {
    fn new(source_file: String, status: DocumentStatus) -> Self {
        Self {
            source_file,
            records: Vec::new(),
            status,
            pages_processed: 0,
            pages_skipped: 0,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn skipped(document: &Path) -> Self {
        Self::new(source_file_name(document), DocumentStatus::Skipped)
    }
}

/// Name recorded in `source_file` and in the processed-files manifest.
#[must_use]
pub fn source_file_name(document: &Path) -> String {
    document.file_name().map_or_else(
        || document.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Page 1's column-header row, if one was found.
struct ResolvedHeader {
    map: FieldMap,
    table_index: usize,
    row_index: usize,
}

fn resolve_first_page_header(
    tables: &[RawGrid],
    options: &EngineOptions,
    warnings: &mut Vec<ReportWarning>,
) -> Option<ResolvedHeader> {
    let empty = RawGrid::new();
    let (table_index, grid) = tables
        .iter()
        .enumerate()
        .find(|(_, grid)| !grid.is_empty())
        .unwrap_or((0, &empty));

    resolve_field_map(grid, options.header_scan_rows, 1, warnings).map(|(map, row_index)| {
        ResolvedHeader {
            map,
            table_index,
            row_index,
        }
    })
}

fn classify_page(
    tables: &[RawGrid],
    page: u32,
    header: Option<&ResolvedHeader>,
    out: &mut Vec<ClassifiedRow>,
) -> usize {
    let field_map = header.map(|header| &header.map);
    let mut page_row = 0_usize;
    let mut repeated_headers = 0_usize;

    for (table_index, grid) in tables.iter().enumerate() {
        // Preamble and the column-header row itself on page 1.
        let skip = header
            .filter(|header| page == 1 && header.table_index == table_index)
            .map_or(0, |header| header.row_index + 1);

        for row in grid.iter().skip(skip) {
            page_row += 1;
            if is_column_header_row(row) {
                repeated_headers += 1;
                continue;
            }
            out.push(classify_row(row, field_map, page, page_row - 1));
        }
    }

    if repeated_headers > 0 {
        debug!(page, repeated_headers, "dropped repeated column-header rows");
    }
    page_row
}

/// Runs the full reconstruction over one document.
///
/// Pages are read in order from 1 until the source reports the end of the
/// document or `options.page_limit()` is reached. Page 1 is always read so
/// the column header can be resolved, even when it is not selected.
pub fn process_document<S>(source: &S, document: &Path, options: &EngineOptions) -> DocumentReport
where
    S: GridSource + ?Sized,
{
    let source_file = source_file_name(document);
    let mut report = DocumentReport::new(source_file, DocumentStatus::Extracted);
    let mut header = None;
    let mut classified = Vec::new();

    for page in 1..=options.page_limit() {
        let selected = options.wants_page(page);
        if !selected && page != 1 {
            continue;
        }

        let mut tables = match source.extract_tables(document, page) {
            Ok(PageGrids::EndOfDocument) => break,
            Ok(PageGrids::Tables(tables)) => tables,
            Err(GridError::Page { page, message }) => {
                warn!(document = %report.source_file, page, %message, "skipping page");
                report.warnings.push(
                    ReportWarning::new(WarningCode::PageExtractionFailed, message).with_page(page),
                );
                report.pages_skipped += 1;
                continue;
            }
            Err(GridError::Document { message }) => {
                warn!(document = %report.source_file, %message, "abandoning document");
                source.release(document);
                report.status = DocumentStatus::Failed(message);
                return report;
            }
        };

        for grid in &mut tables {
            drop_blank_leading_column(grid);
        }

        if page == 1 {
            header = resolve_first_page_header(&tables, options, &mut report.warnings);
        }
        if !selected {
            continue;
        }

        report.pages_processed += 1;
        let before = classified.len();
        let rows_seen = classify_page(&tables, page, header.as_ref(), &mut classified);
        if rows_seen == 0 {
            report.warnings.push(
                ReportWarning::new(WarningCode::EmptyPage, "page yielded no table rows")
                    .with_page(page),
            );
        }
        debug!(
            document = %report.source_file,
            page,
            tables = tables.len(),
            rows = classified.len() - before,
            header_guided = header.is_some(),
            "classified page"
        );
    }
    source.release(document);

    let consolidated = consolidate_rows(classified, options.propagate_context);
    let filtered = filter_fragments(consolidated.rows, &mut report.warnings);
    debug!(
        document = %report.source_file,
        attached = consolidated.attached_fragments,
        dropped = filtered.dropped,
        "consolidated rows"
    );

    report.records = emit_records(&filtered.rows, &report.source_file, &mut report.warnings);
    if report.records.is_empty() {
        warn!(document = %report.source_file, "no valid records");
        report.warnings.push(ReportWarning::new(
            WarningCode::NoValidRecords,
            "document produced no player records",
        ));
        report.status = DocumentStatus::NoValidRecords;
    } else {
        info!(
            document = %report.source_file,
            records = report.records.len(),
            pages = report.pages_processed,
            "document extracted"
        );
    }

    report
}
