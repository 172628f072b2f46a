use crate::model::{CanonicalField, FieldValues, RawGrid};
use crate::vocab::{has_header_signal, is_player_name};
use crate::warning::{ReportWarning, WarningCode};

/// Column index per canonical field, resolved once from the first page.
///
/// Every field is always present; an unmapped field reads as an empty cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMap {
    columns: [Option<usize>; 6],
}

fn normalize_header_text(value: &str) -> String {
    value
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn header_matches(cell: &str, field: CanonicalField) -> bool {
    normalize_header_text(cell).contains(&normalize_header_text(field.label()))
}

impl FieldMap {
    #[must_use]
    pub fn from_header_row(row: &[String]) -> Self {
        let mut columns = [None; 6];
        for field in CanonicalField::ALL {
            columns[field.slot()] = row.iter().position(|cell| header_matches(cell, field));
        }
        Self { columns }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.columns.iter().any(Option::is_some)
    }

    #[must_use]
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns[field.slot()]
    }

    #[must_use]
    pub fn cell<'a>(&self, row: &'a [String], field: CanonicalField) -> &'a str {
        self.column(field)
            .and_then(|index| row.get(index))
            .map_or("", |cell| cell.trim())
    }

    #[must_use]
    pub fn project(&self, row: &[String]) -> FieldValues {
        let mut fields = FieldValues::default();
        for field in CanonicalField::ALL {
            fields.set(field, self.cell(row, field));
        }
        fields
    }
}

fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// Drops a leading index column that is blank on every row.
pub(crate) fn drop_blank_leading_column(grid: &mut RawGrid) -> bool {
    if grid.is_empty() || grid.iter().all(Vec::is_empty) {
        return false;
    }

    let leading_blank = grid
        .iter()
        .all(|row| row.first().is_none_or(|cell| is_blank(cell)));
    if !leading_blank {
        return false;
    }

    for row in grid.iter_mut() {
        if !row.is_empty() {
            row.remove(0);
        }
    }
    true
}

fn label_count(row: &[String]) -> usize {
    CanonicalField::ALL
        .iter()
        .filter(|field| row.iter().any(|cell| header_matches(cell, **field)))
        .count()
}

/// A column-header row repeated on a continuation page.
pub(crate) fn is_column_header_row(row: &[String]) -> bool {
    label_count(row) >= 2
}

/// One label is enough for a lone first row, as long as nothing in it reads
/// as player or game data ("Not With Team" next to a name is a data row).
fn is_single_label_header(row: &[String]) -> bool {
    label_count(row) == 1
        && !row
            .iter()
            .any(|cell| is_player_name(cell) || has_header_signal(cell))
}

/// Searches the first `scan_rows` rows for the column-header row.
///
/// With a wider window a row needs two or more canonical labels, so stray
/// label words in preamble or reason text do not count. With `scan_rows`
/// of 1 the first row is mapped field by field and a single label suffices.
///
/// Returns the map and the index of the header row. Rows above the header
/// are preamble and must be skipped by the caller along with the header.
pub(crate) fn resolve_field_map(
    grid: &RawGrid,
    scan_rows: usize,
    page: u32,
    warnings: &mut Vec<ReportWarning>,
) -> Option<(FieldMap, usize)> {
    let single_row = scan_rows <= 1;
    let found = grid
        .iter()
        .take(scan_rows.max(1))
        .enumerate()
        .find(|(_, row)| {
            is_column_header_row(row) || (single_row && is_single_label_header(row))
        })
        .map(|(index, row)| (FieldMap::from_header_row(row), index));

    if found.is_none() {
        warnings.push(
            ReportWarning::new(
                WarningCode::HeaderNotResolved,
                "no column header found on the first page; falling back to pattern classification",
            )
            .with_page(page),
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::{FieldMap, drop_blank_leading_column, is_column_header_row, resolve_field_map};
    use crate::model::CanonicalField;
    use crate::warning::WarningCode;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn maps_fields_by_case_insensitive_containment() {
        let map = FieldMap::from_header_row(&row(&[
            "GAME DATE",
            "Game Time",
            "Matchup",
            "Team",
            "player_name",
            "Current Status",
            "Reason",
        ]));
        assert_eq!(map.column(CanonicalField::GameDate), Some(0));
        assert_eq!(map.column(CanonicalField::PlayerName), Some(4));
        assert_eq!(map.column(CanonicalField::CurrentStatus), Some(5));
    }

    #[test]
    fn unmatched_fields_read_as_empty() {
        let map = FieldMap::from_header_row(&row(&["Player Name", "Current Status"]));
        let fields = map.project(&row(&["James, LeBron", "Out", "extra"]));
        assert_eq!(fields.get(CanonicalField::PlayerName), "James, LeBron");
        assert_eq!(fields.get(CanonicalField::Team), "");
        assert_eq!(map.cell(&row(&["x"]), CanonicalField::CurrentStatus), "");
    }

    #[test]
    fn first_matching_column_wins() {
        let map = FieldMap::from_header_row(&row(&["Team", "Opponent Team"]));
        assert_eq!(map.column(CanonicalField::Team), Some(0));
    }

    #[test]
    fn drops_entirely_blank_first_column() {
        let mut grid = vec![row(&["", "Team"]), row(&[" ", "Lakers"]), vec![]];
        assert!(drop_blank_leading_column(&mut grid));
        assert_eq!(grid[0], vec!["Team"]);
        assert_eq!(grid[1], vec!["Lakers"]);

        let mut kept = vec![row(&["1", "Team"]), row(&["", "Lakers"])];
        assert!(!drop_blank_leading_column(&mut kept));
    }

    #[test]
    fn missing_header_is_reported() {
        let grid = vec![row(&["James, LeBron", "", "Lakers", "Out"])];
        let mut warnings = Vec::new();
        assert!(resolve_field_map(&grid, 1, 1, &mut warnings).is_none());
        assert_eq!(warnings[0].code, WarningCode::HeaderNotResolved);
        assert_eq!(warnings[0].page, Some(1));
    }

    #[test]
    fn skips_preamble_rows_within_scan_window() {
        let grid = vec![
            row(&["Injury Report: 10/22/25 05:30 PM"]),
            row(&["Game Date", "Player Name", "Current Status"]),
        ];
        let mut warnings = Vec::new();
        let (map, index) =
            resolve_field_map(&grid, 2, 1, &mut warnings).expect("header should resolve");
        assert_eq!(index, 1);
        assert_eq!(map.column(CanonicalField::PlayerName), Some(1));
        assert!(warnings.is_empty());
    }

    #[test]
    fn single_label_row_is_not_a_header() {
        let grid = vec![row(&["Doe, John", "Out", "Not With Team"])];
        let mut warnings = Vec::new();
        assert!(resolve_field_map(&grid, 1, 1, &mut warnings).is_none());
    }

    #[test]
    fn lone_first_row_with_one_label_is_mapped() {
        let grid = vec![
            row(&["Player Name", "Status", "Reason"]),
            row(&["James, LeBron", "Out", "Knee"]),
        ];
        let mut warnings = Vec::new();
        let (map, index) =
            resolve_field_map(&grid, 1, 1, &mut warnings).expect("header should resolve");
        assert_eq!(index, 0);
        assert_eq!(map.column(CanonicalField::PlayerName), Some(0));
        assert_eq!(map.column(CanonicalField::CurrentStatus), None);
        assert!(warnings.is_empty());

        let mut warnings = Vec::new();
        let wide = vec![row(&["Injury Report"]), row(&["Player Name", "Status"])];
        assert!(resolve_field_map(&wide, 2, 1, &mut warnings).is_none());
    }

    #[test]
    fn team_row_with_label_word_is_not_a_header() {
        let grid = vec![row(&["Lakers", "Not With Team"])];
        let mut warnings = Vec::new();
        assert!(resolve_field_map(&grid, 1, 1, &mut warnings).is_none());
    }

    #[test]
    fn repeated_column_header_needs_two_labels() {
        assert!(is_column_header_row(&row(&["Player Name", "Current Status"])));
        assert!(!is_column_header_row(&row(&["Team", "Lakers"])));
    }
}
