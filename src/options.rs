use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    #[must_use]
    pub fn last(&self) -> Option<u32> {
        self.pages.last().copied()
    }
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(selection: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in selection.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some((start, end)) = token.split_once('-') {
                let start: u32 = start
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range start: '{start}'"))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range end: '{end}'"))?;
                if start == 0 || end == 0 {
                    return Err("pages are 1-based".to_string());
                }
                if end < start {
                    return Err(format!(
                        "invalid range '{token}': end is smaller than start"
                    ));
                }
                pages.extend(start..=end);
            } else {
                let page: u32 = token
                    .parse()
                    .map_err(|_| format!("invalid page number: '{token}'"))?;
                if page == 0 {
                    return Err("pages are 1-based".to_string());
                }
                pages.insert(page);
            }
        }

        if pages.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Ndjson,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub pages: Option<PageSelection>,
    pub max_pages: u32,
    pub header_scan_rows: usize,
    pub propagate_context: bool,
    pub delimiter: u8,
}

impl EngineOptions {
    /// Last page the page loop may request.
    #[must_use]
    pub fn page_limit(&self) -> u32 {
        self.pages
            .as_ref()
            .and_then(PageSelection::last)
            .map_or(self.max_pages, |last| last.min(self.max_pages))
    }

    #[must_use]
    pub fn wants_page(&self, page: u32) -> bool {
        self.pages
            .as_ref()
            .is_none_or(|selection| selection.contains(page))
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            pages: None,
            max_pages: 50,
            header_scan_rows: 1,
            propagate_context: true,
            delimiter: b',',
        }
    }
}

/// Slice of the input list processed in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchWindow {
    pub start_from: usize,
    pub batch_size: Option<usize>,
}

impl BatchWindow {
    #[must_use]
    pub fn bounds(&self, total: usize) -> (usize, usize) {
        let start = self.start_from.min(total);
        let end = self
            .batch_size
            .map_or(total, |size| start.saturating_add(size).min(total));
        (start, end)
    }
}
