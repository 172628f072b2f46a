use crate::model::{CanonicalField, ClassifiedRow, FieldValues, RowRole};

const STATUS_SEPARATOR: &str = "; ";

/// Running game context: date > time > matchup > team.
#[derive(Debug, Default)]
struct GameContext {
    fields: FieldValues,
}

impl GameContext {
    fn observe(&mut self, fields: &FieldValues) {
        for (level, field) in CanonicalField::CONTEXT.iter().enumerate() {
            let value = fields.get(*field).trim();
            if value.is_empty() || value == self.fields.get(*field) {
                continue;
            }

            self.fields.set(*field, value);
            for lower in &CanonicalField::CONTEXT[level + 1..] {
                if !fields.has(*lower) {
                    self.fields.set(*lower, "");
                }
            }
        }
    }

    fn fill(&self, fields: &mut FieldValues) {
        for field in CanonicalField::CONTEXT {
            if !fields.has(field) {
                fields.set(field, self.fields.get(field));
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Consolidated {
    pub rows: Vec<ClassifiedRow>,
    pub attached_fragments: usize,
}

/// Single forward pass: each player row absorbs the orphan rows that follow
/// it, up to the next header, player or non-blank noise row.
pub(crate) fn consolidate_rows(rows: Vec<ClassifiedRow>, propagate_context: bool) -> Consolidated {
    let mut out = Consolidated::default();
    let mut context = GameContext::default();
    let mut rows = rows.into_iter().peekable();

    while let Some(row) = rows.next() {
        match row.role {
            RowRole::Player => {
                let mut merged = row;
                context.observe(&merged.fields);
                if propagate_context {
                    context.fill(&mut merged.fields);
                }

                let mut fragments = Vec::new();
                let own_status = merged.fields.get(CanonicalField::CurrentStatus).trim();
                if !own_status.is_empty() {
                    fragments.push(own_status.to_string());
                }

                while let Some(next) = rows.peek() {
                    match next.role {
                        RowRole::Orphan => {
                            let fragment = next.fields.get(CanonicalField::CurrentStatus).trim();
                            if !fragment.is_empty() {
                                fragments.push(fragment.to_string());
                            }
                            out.attached_fragments += 1;
                        }
                        RowRole::Noise if next.blank => {}
                        _ => break,
                    }
                    rows.next();
                }

                merged
                    .fields
                    .set(CanonicalField::CurrentStatus, fragments.join(STATUS_SEPARATOR));
                out.rows.push(merged);
            }
            RowRole::Header => {
                context.observe(&row.fields);
                out.rows.push(row);
            }
            RowRole::Orphan | RowRole::Noise => {
                if !row.blank {
                    out.rows.push(row);
                }
            }
        }
    }

    out
}
