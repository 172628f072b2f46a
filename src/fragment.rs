use crate::model::{CanonicalField, ClassifiedRow, FieldValues};
use crate::warning::{ReportWarning, WarningCode};

fn has_primary_signal(fields: &FieldValues) -> bool {
    fields.has(CanonicalField::PlayerName)
        || fields.has(CanonicalField::Team)
        || (fields.has(CanonicalField::GameDate) && fields.has(CanonicalField::Matchup))
        || (fields.has(CanonicalField::GameTime) && fields.has(CanonicalField::Matchup))
        || fields.non_empty_count() >= 3
}

/// Status or reason text that never found a player.
fn is_stranded_status(fields: &FieldValues) -> bool {
    fields.non_empty_count() == 1 && fields.has(CanonicalField::CurrentStatus)
}

pub(crate) fn is_valid_row(fields: &FieldValues) -> bool {
    has_primary_signal(fields) && !is_stranded_status(fields)
}

#[derive(Debug, Default)]
pub(crate) struct Filtered {
    pub rows: Vec<ClassifiedRow>,
    pub dropped: usize,
}

/// Keeps player records and context rows; drops residue left over after
/// consolidation.
pub(crate) fn filter_fragments(
    rows: Vec<ClassifiedRow>,
    warnings: &mut Vec<ReportWarning>,
) -> Filtered {
    let mut out = Filtered::default();
    for row in rows {
        if is_valid_row(&row.fields) {
            out.rows.push(row);
            continue;
        }

        if is_stranded_status(&row.fields) {
            warnings.push(
                ReportWarning::new(
                    WarningCode::UnattachedFragment,
                    format!(
                        "dropped status text with no player: '{}'",
                        row.fields.get(CanonicalField::CurrentStatus)
                    ),
                )
                .with_page(row.page_number)
                .with_row(row.original_index),
            );
        }
        out.dropped += 1;
    }
    out
}
