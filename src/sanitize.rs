use crate::model::CanonicalField;

/// Warehouse-safe column name: lowercase, spaces to underscores, only
/// `[a-z0-9_]`, no repeated or edge underscores.
#[must_use]
pub fn sanitize_column_name(raw: &str, position: usize) -> String {
    let lowered = raw.trim().to_lowercase().replace(' ', "_");
    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            continue;
        }
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        format!("col_{position}")
    } else {
        trimmed.to_string()
    }
}

/// Output columns in load order.
#[must_use]
pub fn record_columns() -> Vec<String> {
    CanonicalField::ALL
        .iter()
        .map(|field| field.label())
        .chain(["Source File", "Row Order"])
        .enumerate()
        .map(|(position, label)| sanitize_column_name(label, position))
        .collect()
}
