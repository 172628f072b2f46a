use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, GridError};
use crate::model::RawGrid;

/// What a grid source found at a page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageGrids {
    Tables(Vec<RawGrid>),
    EndOfDocument,
}

/// Per-page table extraction primitive.
///
/// `Ok(PageGrids::EndOfDocument)` ends the page loop, `Err(GridError::Page)`
/// skips one page and `Err(GridError::Document)` abandons the document.
pub trait GridSource: Sync {
    fn extract_tables(&self, document: &Path, page_number: u32) -> Result<PageGrids, GridError>;

    /// Called once a document's page loop is over.
    fn release(&self, _document: &Path) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpPage {
    Tables(Vec<RawGrid>),
    Failed(String),
}

/// Serialized extraction of one document, used to replay grids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDump {
    pub pages: Vec<DumpPage>,
}

/// Grids held in memory, keyed by document path.
#[derive(Debug, Clone, Default)]
pub struct MemoryGridSource {
    documents: HashMap<PathBuf, GridDump>,
}

impl MemoryGridSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: impl Into<PathBuf>, dump: GridDump) {
        self.documents.insert(document.into(), dump);
    }

    #[must_use]
    pub fn with_pages(mut self, document: impl Into<PathBuf>, pages: Vec<Vec<RawGrid>>) -> Self {
        let dump = GridDump {
            pages: pages.into_iter().map(DumpPage::Tables).collect(),
        };
        self.insert(document, dump);
        self
    }

    /// Loads JSON grid dumps, one per document path.
    pub fn from_dump_files(paths: &[PathBuf]) -> Result<Self, EngineError> {
        let mut source = Self::new();
        for path in paths {
            let text = fs::read_to_string(path)?;
            let dump: GridDump = serde_json::from_str(&text)?;
            source.insert(path.clone(), dump);
        }
        Ok(source)
    }
}

impl GridSource for MemoryGridSource {
    fn extract_tables(&self, document: &Path, page_number: u32) -> Result<PageGrids, GridError> {
        let dump = self.documents.get(document).ok_or_else(|| GridError::Document {
            message: format!("no grids loaded for '{}'", document.display()),
        })?;

        let index = usize::try_from(page_number.saturating_sub(1)).unwrap_or(usize::MAX);
        match dump.pages.get(index) {
            None => Ok(PageGrids::EndOfDocument),
            Some(DumpPage::Tables(tables)) => Ok(PageGrids::Tables(tables.clone())),
            Some(DumpPage::Failed(message)) => Err(GridError::Page {
                page: page_number,
                message: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{GridDump, GridSource, MemoryGridSource, PageGrids};
    use crate::error::GridError;

    #[test]
    fn replays_pages_and_reports_end() {
        let source = MemoryGridSource::new()
            .with_pages("a.pdf", vec![vec![vec![vec!["x".to_string()]]]]);
        let first = source
            .extract_tables(Path::new("a.pdf"), 1)
            .expect("page 1 should exist");
        assert_eq!(first, PageGrids::Tables(vec![vec![vec!["x".to_string()]]]));
        assert_eq!(
            source.extract_tables(Path::new("a.pdf"), 2),
            Ok(PageGrids::EndOfDocument)
        );
    }

    #[test]
    fn unknown_document_is_a_document_error() {
        let source = MemoryGridSource::new();
        let err = source
            .extract_tables(Path::new("missing.pdf"), 1)
            .expect_err("missing document should fail");
        assert!(matches!(err, GridError::Document { .. }));
    }

    #[test]
    fn parses_dump_json_with_failed_pages() {
        let dump: GridDump = serde_json::from_str(
            r#"{"pages": [{"tables": [[["Doe, John", "Out"]]]}, {"failed": "bad xref"}]}"#,
        )
        .expect("dump should parse");
        let mut source = MemoryGridSource::new();
        source.insert("d.pdf", dump);

        let err = source
            .extract_tables(Path::new("d.pdf"), 2)
            .expect_err("page 2 should fail");
        assert_eq!(
            err,
            GridError::Page {
                page: 2,
                message: "bad xref".to_string()
            }
        );
    }
}
