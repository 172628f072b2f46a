use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use encoding_rs::UTF_16BE;
use lopdf::content::Content;
use lopdf::{Document, Object};
use regex::Regex;
use tracing::debug;

use crate::error::{EngineError, GridError};
use crate::grid_source::{GridSource, PageGrids};
use crate::model::RawGrid;
use crate::table_parse::{align_rows_right, modal_width, split_line_into_cells};

static PAGE_FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^page\s+\d+\s+of\s+\d+$").expect("hardcoded page footer regex is valid")
});

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_decoding_broken(text: &str) -> bool {
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    if total == 0 {
        return false;
    }

    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();
    replacement * 8 > total || control * 5 > total
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    let utf16_hint = encoding.is_some_and(|name| {
        let lower = name.to_ascii_lowercase();
        lower.contains("utf16") || lower.contains("ucs2") || lower.contains("identity-h")
    });
    let has_bom = bytes.starts_with(&[0xFE, 0xFF]);
    if utf16_hint || has_bom {
        let body = if has_bom { &bytes[2..] } else { bytes };
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(body);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).to_string()
}

/// Prefers candidates whose lines split into several cells.
fn extraction_quality_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut non_empty_lines = 0_i64;
    let mut multi_cell_lines = 0_i64;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        non_empty_lines += 1;
        if split_line_into_cells(line).len() >= 2 {
            multi_cell_lines += 1;
        }
    }

    let broken_penalty = if looks_decoding_broken(text) { 800 } else { 0 };
    multi_cell_lines * 50 + non_empty_lines - broken_penalty
}

fn text_from_content_stream(document: &Document, page_id: lopdf::ObjectId) -> Option<String> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => text.push_str(&decode_pdf_bytes(encoding, bytes)),
                Object::Array(items) => {
                    collect_text(text, encoding, items);
                    text.push(' ');
                }
                Object::Integer(value) if *value < -100 => text.push(' '),
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                current_encoding = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .and_then(|font_name| encodings.get(font_name).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_text(&mut current, current_encoding, &operation.operands);
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Reads the best available text for every page, in page order.
fn read_page_texts(path: &Path) -> Result<Vec<String>, EngineError> {
    let document = Document::load(path)?;
    let pages_map = document.get_pages();

    let extracted_pages = pdf_extract::extract_text(path)
        .ok()
        .map(|text| split_text_into_pages(&text))
        .filter(|pages| pages.len() == pages_map.len());

    let mut texts = Vec::with_capacity(pages_map.len());
    for (index, (page_no, page_id)) in pages_map.iter().enumerate() {
        let mut candidates = Vec::new();
        if let Some(text) = extracted_pages
            .as_ref()
            .and_then(|pages| pages.get(index).cloned())
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }
        if let Some(text) = text_from_content_stream(&document, *page_id) {
            candidates.push(text);
        }
        if let Some(text) = document
            .extract_text(&[*page_no])
            .ok()
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }

        let best = candidates
            .into_iter()
            .max_by_key(|text| extraction_quality_score(text))
            .unwrap_or_default();
        texts.push(best);
    }

    Ok(texts)
}

/// One grid per page: every non-empty line becomes a row, short rows are
/// right-aligned to the page's dominant width.
pub(crate) fn page_text_to_grid(text: &str) -> RawGrid {
    let rows = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !PAGE_FOOTER_RE.is_match(line))
        .map(split_line_into_cells)
        .filter(|cells| !cells.is_empty())
        .collect::<Vec<_>>();

    let width = modal_width(&rows);
    align_rows_right(rows, width)
}

/// Grid source backed by the PDF's text layer.
#[derive(Debug, Default)]
pub struct PdfTextGridSource {
    loaded: Mutex<HashMap<PathBuf, Arc<Vec<String>>>>,
}

impl PdfTextGridSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn page_texts(&self, document: &Path) -> Result<Arc<Vec<String>>, GridError> {
        if let Some(texts) = self
            .loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(document)
        {
            return Ok(Arc::clone(texts));
        }

        let texts = Arc::new(read_page_texts(document).map_err(|error| GridError::Document {
            message: error.to_string(),
        })?);
        debug!(document = %document.display(), pages = texts.len(), "loaded PDF text layer");
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document.to_path_buf(), Arc::clone(&texts));
        Ok(texts)
    }
}

impl GridSource for PdfTextGridSource {
    fn extract_tables(&self, document: &Path, page_number: u32) -> Result<PageGrids, GridError> {
        let texts = self.page_texts(document)?;
        let index = usize::try_from(page_number.saturating_sub(1)).unwrap_or(usize::MAX);
        let Some(text) = texts.get(index) else {
            return Ok(PageGrids::EndOfDocument);
        };

        let grid = page_text_to_grid(text);
        if grid.is_empty() {
            return Ok(PageGrids::Tables(Vec::new()));
        }
        Ok(PageGrids::Tables(vec![grid]))
    }

    fn release(&self, document: &Path) {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(document);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{decode_pdf_bytes, page_text_to_grid, split_text_into_pages};
    use crate::grid_source::MemoryGridSource;
    use crate::options::EngineOptions;
    use crate::pipeline::process_document;

    #[test]
    fn splits_form_feed_delimited_pages() {
        let pages = split_text_into_pages("p1\u{000C}p2\u{000C}");
        assert_eq!(pages, vec!["p1", "p2"]);
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let bytes = [0xFE, 0xFF, 0x00, 0x4F, 0x00, 0x75, 0x00, 0x74];
        assert_eq!(decode_pdf_bytes(Some("Identity-H"), &bytes), "Out");
    }

    #[test]
    fn builds_right_aligned_grid_without_footers() {
        let grid = page_text_to_grid(
            "Team  Player Name  Current Status\n\
             Lakers  James, LeBron  Out\n\
             \n\
             Reaves, Austin  Probable\n\
             Page 1 of 3\n",
        );
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[2], vec!["", "Reaves, Austin", "Probable"]);
    }

    #[test]
    fn player_line_without_reason_keeps_its_record() {
        let grid = page_text_to_grid(
            "Game Date  Game Time  Matchup  Team  Player Name  Current Status  Reason\n\
             10/22/2025  07:30 (ET)  LAL@GSW  Los Angeles Lakers  James, LeBron  Out  Knee\n\
             Reaves, Austin  Available\n\
             Hachimura, Rui  Out  Calf\n",
        );
        let source = MemoryGridSource::new().with_pages("report.pdf", vec![vec![grid]]);

        let report = process_document(&source, Path::new("report.pdf"), &EngineOptions::default());
        let names = report
            .records
            .iter()
            .map(|record| record.player_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["James, LeBron", "Reaves, Austin", "Hachimura, Rui"]);
        assert_eq!(report.records[0].current_status, "Out; Knee");
        assert_eq!(report.records[1].current_status, "Available");
        assert_eq!(report.records[1].team, "Los Angeles Lakers");
        assert_eq!(report.records[2].current_status, "Out; Calf");
    }
}
