use std::collections::HashMap;

use crate::model::{RawGrid, RawRow};

/// Splits a text line on tabs or runs of two or more spaces.
pub(crate) fn split_line_into_cells(line: &str) -> RawRow {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    for ch in trimmed.chars() {
        if ch == '\t' {
            if !current.trim().is_empty() {
                cells.push(current.trim().to_string());
                current.clear();
            }
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                if !current.trim().is_empty() {
                    cells.push(current.trim().to_string());
                    current.clear();
                }
                continue;
            }
            current.push(' ');
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }

    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }

    cells
}

pub(crate) fn modal_width(rows: &[RawRow]) -> usize {
    let mut freq = HashMap::new();
    for width in rows.iter().map(Vec::len) {
        *freq.entry(width).or_insert(0_usize) += 1;
    }

    freq.into_iter()
        .max_by_key(|(width, count)| (*count, *width))
        .map_or(0, |(width, _)| width)
}

/// Pads short rows on the left. Report rows lose their leading game
/// columns, never their trailing status or reason columns.
pub(crate) fn align_rows_right(rows: Vec<RawRow>, width: usize) -> RawGrid {
    rows.into_iter()
        .map(|row| {
            if row.len() >= width {
                return row;
            }
            let mut aligned = vec![String::new(); width - row.len()];
            aligned.extend(row);
            aligned
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{align_rows_right, modal_width, split_line_into_cells};

    #[test]
    fn splits_double_space_separated_cells() {
        let cells = split_line_into_cells("10/22/2025  07:30 (ET)  LAL@GSW  James, LeBron  Out");
        assert_eq!(
            cells,
            vec!["10/22/2025", "07:30 (ET)", "LAL@GSW", "James, LeBron", "Out"]
        );
    }

    #[test]
    fn splits_tab_separated_cells() {
        let cells = split_line_into_cells("A\tB\tC");
        assert_eq!(cells, vec!["A", "B", "C"]);
    }

    #[test]
    fn detects_modal_width() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["1".to_string(), "2".to_string()],
            vec!["x".to_string()],
        ];
        assert_eq!(modal_width(&rows), 2);
    }

    #[test]
    fn right_aligns_short_rows() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["reason".to_string()],
        ];
        let aligned = align_rows_right(rows, 3);
        assert_eq!(aligned[1], vec!["", "", "reason"]);
        assert_eq!(aligned[0], vec!["a", "b", "c"]);
    }
}
