use crate::header::FieldMap;
use crate::model::{CanonicalField, ClassifiedRow, FieldValues, RowRole};
use crate::vocab::{
    has_header_signal, is_game_date, is_game_time, is_matchup, is_player_name, mentions_team,
    split_trailing_status, status_token,
};

const FRAGMENT_SEPARATOR: &str = "; ";

fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

fn join_non_empty<'a>(cells: impl Iterator<Item = &'a String>, separator: &str) -> String {
    cells
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Name found in a cell, plus a status word glued to its end.
fn player_in_cell(cell: &str) -> Option<(String, Option<&'static str>)> {
    let trimmed = cell.trim();
    if let Some((name, status)) = split_trailing_status(trimmed) {
        return Some((name.to_string(), Some(status)));
    }
    is_player_name(trimmed).then(|| (trimmed.to_string(), None))
}

/// A player row realigned so the name sits in the player column.
struct GuidedPlayer {
    row: Vec<String>,
    name: String,
    glued_status: Option<&'static str>,
}

fn guided_player(row: &[String], map: &FieldMap) -> Option<GuidedPlayer> {
    let column = map.column(CanonicalField::PlayerName)?;
    let cell = row.get(column).map_or("", String::as_str);
    if !is_blank(cell) {
        let (name, glued_status) = player_in_cell(cell)?;
        return Some(GuidedPlayer {
            row: row.to_vec(),
            name,
            glued_status,
        });
    }

    // Stream extraction shifts a name left into an empty team cell.
    let left = column
        .checked_sub(1)
        .filter(|left| map.column(CanonicalField::CurrentStatus) != Some(*left));
    if let Some(left) = left {
        if let Some((name, glued_status)) = row.get(left).and_then(|cell| player_in_cell(cell)) {
            // The name moves back, leaving the team cell it occupied empty.
            let mut aligned = row.to_vec();
            if aligned.len() <= column {
                aligned.resize(column + 1, String::new());
            }
            aligned.swap(left, column);
            return Some(GuidedPlayer {
                row: aligned,
                name,
                glued_status,
            });
        }
    }

    // A row with no reason text is padded on the left, which pushes the name
    // right. It still reads name then status.
    let (offset, cell) = row
        .iter()
        .enumerate()
        .skip(column + 1)
        .find(|(_, cell)| !is_blank(cell))?;
    let (name, glued_status) = player_in_cell(cell)?;
    let status_follows = glued_status.is_some()
        || row
            .get(offset + 1)
            .is_some_and(|next| status_token(next).is_some());
    if !status_follows {
        return None;
    }

    let mut aligned = row[..column].to_vec();
    aligned.extend(row[offset..].iter().cloned());
    aligned.resize(row.len(), String::new());
    Some(GuidedPlayer {
        row: aligned,
        name,
        glued_status,
    })
}

/// Status plus any reason text printed to its right.
fn guided_status_text(row: &[String], status_column: usize) -> String {
    join_non_empty(row.iter().skip(status_column), FRAGMENT_SEPARATOR)
}

fn guided_fields(row: &[String], map: &FieldMap) -> FieldValues {
    let mut fields = map.project(row);
    if let Some(column) = map.column(CanonicalField::CurrentStatus) {
        fields.set(CanonicalField::CurrentStatus, guided_status_text(row, column));
    }
    fields
}

fn classify_guided(row: &[String], map: &FieldMap) -> (RowRole, FieldValues) {
    if let Some(player) = guided_player(row, map) {
        let mut fields = guided_fields(&player.row, map);
        fields.set(CanonicalField::PlayerName, player.name);
        if let Some(status) = player.glued_status {
            if !fields.has(CanonicalField::CurrentStatus) {
                fields.set(CanonicalField::CurrentStatus, status);
            }
        }
        return (RowRole::Player, fields);
    }

    let status_column = map.column(CanonicalField::CurrentStatus);
    let mut fields = guided_fields(row, map);
    fields.set(CanonicalField::PlayerName, "");

    let context_present = CanonicalField::CONTEXT
        .iter()
        .any(|field| fields.has(*field));
    if context_present || row.iter().any(|cell| has_header_signal(cell)) {
        return (RowRole::Header, fields);
    }

    match status_column {
        Some(_) if fields.has(CanonicalField::CurrentStatus) => {
            let fragment = fields.get(CanonicalField::CurrentStatus).to_string();
            (
                RowRole::Orphan,
                FieldValues::default().with(CanonicalField::CurrentStatus, fragment),
            )
        }
        Some(_) => (RowRole::Noise, fields),
        None => classify_fragment_by_patterns(row, fields),
    }
}

fn first_cell<'a>(
    row: &'a [String],
    skip: Option<usize>,
    predicate: impl Fn(&str) -> bool,
) -> Option<&'a str> {
    row.iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != skip)
        .map(|(_, cell)| cell.trim())
        .find(|cell| !cell.is_empty() && predicate(cell))
}

/// Header-less extraction: every field is located by its content pattern.
fn fields_by_patterns(row: &[String], player_column: Option<usize>) -> FieldValues {
    let mut fields = FieldValues::default();
    if let Some(date) = first_cell(row, player_column, is_game_date) {
        fields.set(CanonicalField::GameDate, date);
    }
    if let Some(time) = first_cell(row, player_column, is_game_time) {
        fields.set(CanonicalField::GameTime, time);
    }
    if let Some(matchup) = first_cell(row, player_column, is_matchup) {
        fields.set(CanonicalField::Matchup, matchup);
    }
    if let Some(team) = first_cell(row, player_column, mentions_team) {
        fields.set(CanonicalField::Team, team);
    }
    if let Some(status) = row
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != player_column)
        .find_map(|(_, cell)| status_token(cell))
    {
        fields.set(CanonicalField::CurrentStatus, status);
    }
    fields
}

fn classify_fragment_by_patterns(row: &[String], fields: FieldValues) -> (RowRole, FieldValues) {
    if let Some(status) = row.iter().find_map(|cell| status_token(cell)) {
        return (
            RowRole::Orphan,
            FieldValues::default().with(CanonicalField::CurrentStatus, status),
        );
    }

    // Wrapped reason text lands in the trailing column.
    if row.last().is_some_and(|cell| !is_blank(cell)) {
        let fragment = join_non_empty(row.iter(), " ");
        return (
            RowRole::Orphan,
            FieldValues::default().with(CanonicalField::CurrentStatus, fragment),
        );
    }

    (RowRole::Noise, fields)
}

fn classify_by_patterns(row: &[String]) -> (RowRole, FieldValues) {
    let player = row
        .iter()
        .enumerate()
        .find_map(|(index, cell)| player_in_cell(cell).map(|found| (index, found)));

    if let Some((index, (name, glued_status))) = player {
        let mut fields = fields_by_patterns(row, Some(index));
        fields.set(CanonicalField::PlayerName, name);
        if let Some(status) = glued_status {
            if !fields.has(CanonicalField::CurrentStatus) {
                fields.set(CanonicalField::CurrentStatus, status);
            }
        }
        return (RowRole::Player, fields);
    }

    let fields = fields_by_patterns(row, None);
    if row.iter().any(|cell| has_header_signal(cell)) {
        let mut header = fields;
        header.set(CanonicalField::CurrentStatus, "");
        return (RowRole::Header, header);
    }

    classify_fragment_by_patterns(row, FieldValues::default())
}

/// Labels one grid row. Without a field map every cell is searched by
/// pattern; with one, cells are read by column and patterns only break ties.
pub(crate) fn classify_row(
    row: &[String],
    field_map: Option<&FieldMap>,
    page_number: u32,
    original_index: usize,
) -> ClassifiedRow {
    let blank = row.iter().all(|cell| is_blank(cell));
    let (role, fields) = if blank {
        (RowRole::Noise, FieldValues::default())
    } else {
        match field_map {
            Some(map) if map.is_resolved() => classify_guided(row, map),
            _ => classify_by_patterns(row),
        }
    };

    ClassifiedRow {
        role,
        fields,
        page_number,
        original_index,
        blank,
    }
}
