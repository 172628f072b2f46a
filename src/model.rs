use serde::{Deserialize, Serialize};

pub type RawRow = Vec<String>;
pub type RawGrid = Vec<RawRow>;

/// The six attributes every emitted record carries, in report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    GameDate,
    GameTime,
    Matchup,
    Team,
    PlayerName,
    CurrentStatus,
}

impl CanonicalField {
    pub const ALL: [Self; 6] = [
        Self::GameDate,
        Self::GameTime,
        Self::Matchup,
        Self::Team,
        Self::PlayerName,
        Self::CurrentStatus,
    ];

    /// Game-context fields, highest level first.
    pub const CONTEXT: [Self; 4] = [Self::GameDate, Self::GameTime, Self::Matchup, Self::Team];

    /// Header text printed by the report provider.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GameDate => "Game Date",
            Self::GameTime => "Game Time",
            Self::Matchup => "Matchup",
            Self::Team => "Team",
            Self::PlayerName => "Player Name",
            Self::CurrentStatus => "Current Status",
        }
    }

    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::GameDate => "game_date",
            Self::GameTime => "game_time",
            Self::Matchup => "matchup",
            Self::Team => "team",
            Self::PlayerName => "player_name",
            Self::CurrentStatus => "current_status",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: [String; 6],
}

impl FieldValues {
    #[must_use]
    pub fn get(&self, field: CanonicalField) -> &str {
        &self.values[field.slot()]
    }

    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        self.values[field.slot()] = value.into();
    }

    #[must_use]
    pub fn with(mut self, field: CanonicalField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    #[must_use]
    pub fn has(&self, field: CanonicalField) -> bool {
        !self.get(field).trim().is_empty()
    }

    #[must_use]
    pub fn non_empty_count(&self) -> usize {
        CanonicalField::ALL
            .iter()
            .filter(|field| self.has(**field))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    /// Game or team section row, not a column header.
    Header,
    Player,
    Orphan,
    Noise,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub role: RowRole,
    pub fields: FieldValues,
    pub page_number: u32,
    pub original_index: usize,
    pub blank: bool,
}

impl ClassifiedRow {
    #[must_use]
    pub fn player_name(&self) -> &str {
        self.fields.get(CanonicalField::PlayerName)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub game_date: String,
    pub game_time: String,
    pub matchup: String,
    pub team: String,
    pub player_name: String,
    pub current_status: String,
    pub source_file: String,
    pub row_order: usize,
}

impl CanonicalRecord {
    #[must_use]
    pub fn from_fields(fields: &FieldValues, source_file: &str, row_order: usize) -> Self {
        Self {
            game_date: fields.get(CanonicalField::GameDate).to_string(),
            game_time: fields.get(CanonicalField::GameTime).to_string(),
            matchup: fields.get(CanonicalField::Matchup).to_string(),
            team: fields.get(CanonicalField::Team).to_string(),
            player_name: fields.get(CanonicalField::PlayerName).to_string(),
            current_status: fields.get(CanonicalField::CurrentStatus).to_string(),
            source_file: source_file.to_string(),
            row_order,
        }
    }

    #[must_use]
    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::GameDate => &self.game_date,
            CanonicalField::GameTime => &self.game_time,
            CanonicalField::Matchup => &self.matchup,
            CanonicalField::Team => &self.team,
            CanonicalField::PlayerName => &self.player_name,
            CanonicalField::CurrentStatus => &self.current_status,
        }
    }
}
