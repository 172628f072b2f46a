use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    PageExtractionFailed,
    EmptyPage,
    HeaderNotResolved,
    UnattachedFragment,
    DuplicatePlayer,
    NoValidRecords,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportWarning {
    pub code: WarningCode,
    pub message: String,
    pub page: Option<u32>,
    pub row: Option<usize>,
}

impl ReportWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
            row: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}
