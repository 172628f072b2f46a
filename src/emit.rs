use std::collections::HashSet;

use crate::model::{CanonicalRecord, ClassifiedRow, RowRole};
use crate::warning::{ReportWarning, WarningCode};

/// Turns filtered rows into numbered records, first occurrence of a name wins.
pub(crate) fn emit_records(
    rows: &[ClassifiedRow],
    source_file: &str,
    warnings: &mut Vec<ReportWarning>,
) -> Vec<CanonicalRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for row in rows {
        let name = row.player_name().trim();
        if row.role != RowRole::Player || name.is_empty() {
            continue;
        }

        if !seen.insert(name.to_string()) {
            warnings.push(
                ReportWarning::new(
                    WarningCode::DuplicatePlayer,
                    format!("'{name}' already emitted; keeping the first occurrence"),
                )
                .with_page(row.page_number)
                .with_row(row.original_index),
            );
            continue;
        }

        let mut record = CanonicalRecord::from_fields(&row.fields, source_file, records.len() + 1);
        record.player_name = name.to_string();
        records.push(record);
    }

    records
}

/// Concatenates per-document results in caller order, drops names already
/// emitted by an earlier document and renumbers `row_order` globally.
#[must_use]
pub fn finalize_batch(documents: Vec<Vec<CanonicalRecord>>) -> Vec<CanonicalRecord> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for record in documents.into_iter().flatten() {
        if !seen.insert(record.player_name.clone()) {
            continue;
        }
        out.push(record);
    }

    renumber(&mut out);
    out
}

pub fn renumber(records: &mut [CanonicalRecord]) {
    for (index, record) in records.iter_mut().enumerate() {
        record.row_order = index + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{emit_records, finalize_batch};
    use crate::model::{CanonicalField, CanonicalRecord, ClassifiedRow, FieldValues, RowRole};
    use crate::warning::WarningCode;

    fn player(name: &str, status: &str) -> ClassifiedRow {
        ClassifiedRow {
            role: RowRole::Player,
            fields: FieldValues::default()
                .with(CanonicalField::PlayerName, name)
                .with(CanonicalField::CurrentStatus, status),
            page_number: 1,
            original_index: 0,
            blank: false,
        }
    }

    fn record(name: &str, source: &str) -> CanonicalRecord {
        CanonicalRecord::from_fields(
            &FieldValues::default().with(CanonicalField::PlayerName, name),
            source,
            1,
        )
    }

    #[test]
    fn keeps_first_occurrence_and_numbers_densely() {
        let team = ClassifiedRow {
            role: RowRole::Header,
            fields: FieldValues::default().with(CanonicalField::Team, "Lakers"),
            page_number: 1,
            original_index: 0,
            blank: false,
        };
        let rows = vec![
            player("Doe, John", "Out"),
            team,
            player("Roe, Jane", "Probable"),
            player("Doe, John", "Available"),
        ];

        let mut warnings = Vec::new();
        let records = emit_records(&rows, "a.pdf", &mut warnings);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].current_status, "Out");
        assert_eq!(records[0].source_file, "a.pdf");
        assert_eq!(
            records.iter().map(|r| r.row_order).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(warnings[0].code, WarningCode::DuplicatePlayer);
    }

    #[test]
    fn batch_finalize_dedups_across_documents() {
        let first = vec![record("Doe, John", "a.pdf"), record("Roe, Jane", "a.pdf")];
        let second = vec![record("Doe, John", "b.pdf"), record("Poe, Ed", "b.pdf")];

        let records = finalize_batch(vec![first, second]);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source_file, "a.pdf");
        assert_eq!(records[2].player_name, "Poe, Ed");
        assert_eq!(
            records.iter().map(|r| r.row_order).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}
