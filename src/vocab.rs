use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

pub const STATUS_VOCABULARY: [&str; 5] = ["Out", "Available", "Questionable", "Probable", "Doubtful"];

pub const TEAM_VOCABULARY: [&str; 30] = [
    "76ers",
    "Bucks",
    "Bulls",
    "Cavaliers",
    "Celtics",
    "Clippers",
    "Grizzlies",
    "Hawks",
    "Heat",
    "Hornets",
    "Jazz",
    "Kings",
    "Knicks",
    "Lakers",
    "Magic",
    "Mavericks",
    "Nets",
    "Nuggets",
    "Pacers",
    "Pelicans",
    "Pistons",
    "Raptors",
    "Rockets",
    "Spurs",
    "Suns",
    "Thunder",
    "Timberwolves",
    "Trail Blazers",
    "Warriors",
    "Wizards",
];

static TEAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = TEAM_VOCABULARY
        .iter()
        .map(|team| regex::escape(team))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?:^|[^\w])(?:{alternatives})(?:$|[^\w])"))
        .expect("hardcoded team vocabulary regex is valid")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("hardcoded date regex is valid")
});

static MATCHUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,4}\s*@\s*[A-Za-z]{2,4}$").expect("hardcoded matchup regex is valid")
});

/// Surname and given name separated by exactly one comma.
#[must_use]
pub fn is_player_name(value: &str) -> bool {
    let Some((surname, given)) = value.trim().split_once(',') else {
        return false;
    };
    if given.contains(',') {
        return false;
    }

    let surname = surname.trim();
    let given = given.trim();
    surname.chars().count() >= 2
        && surname.chars().any(char::is_alphabetic)
        && !given.is_empty()
}

/// Returns the canonical spelling of a status token.
#[must_use]
pub fn status_token(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    STATUS_VOCABULARY
        .iter()
        .find(|status| status.eq_ignore_ascii_case(trimmed))
        .copied()
}

/// Splits `"James, LeBron Out"` into the name and its trailing status word.
#[must_use]
pub fn split_trailing_status(value: &str) -> Option<(&str, &'static str)> {
    let trimmed = value.trim();
    let (head, last) = trimmed.rsplit_once(char::is_whitespace)?;
    let status = status_token(last)?;
    let head = head.trim_end();
    is_player_name(head).then_some((head, status))
}

#[must_use]
pub fn mentions_team(value: &str) -> bool {
    TEAM_RE.is_match(value.trim())
}

#[must_use]
pub fn is_game_date(value: &str) -> bool {
    let Some(captures) = DATE_RE.captures(value.trim()) else {
        return false;
    };
    let part = |index: usize| {
        captures
            .get(index)
            .and_then(|value| value.as_str().parse::<u32>().ok())
    };
    match (part(1), part(2), part(3)) {
        (Some(month), Some(day), Some(year)) => i32::try_from(year)
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
            .is_some(),
        _ => false,
    }
}

#[must_use]
pub fn is_game_time(value: &str) -> bool {
    value.contains("(ET)") && value.contains(':')
}

#[must_use]
pub fn is_matchup(value: &str) -> bool {
    MATCHUP_RE.is_match(value.trim())
}

/// True when a cell carries any game/section header signal.
#[must_use]
pub fn has_header_signal(value: &str) -> bool {
    mentions_team(value) || is_game_date(value) || is_game_time(value) || is_matchup(value)
}

#[cfg(test)]
mod tests {
    use super::{
        has_header_signal, is_game_date, is_game_time, is_matchup, is_player_name,
        mentions_team, split_trailing_status, status_token,
    };

    #[test]
    fn recognizes_surname_given_name_pairs() {
        assert!(is_player_name("James, LeBron"));
        assert!(is_player_name("  Ball, Lonzo "));
        assert!(is_player_name("Yi, J"));
        assert!(!is_player_name("LeBron James"));
        assert!(!is_player_name("A, B"));
        assert!(!is_player_name("Smith, John, Jr"));
        assert!(!is_player_name("12, 3"));
        assert!(!is_player_name("James,"));
    }

    #[test]
    fn status_tokens_are_case_insensitive_and_canonicalized() {
        assert_eq!(status_token("out"), Some("Out"));
        assert_eq!(status_token(" QUESTIONABLE "), Some("Questionable"));
        assert_eq!(status_token("Outstanding"), None);
    }

    #[test]
    fn splits_status_glued_to_name() {
        assert_eq!(
            split_trailing_status("James, LeBron Out"),
            Some(("James, LeBron", "Out"))
        );
        assert_eq!(split_trailing_status("James, LeBron"), None);
        assert_eq!(split_trailing_status("Knee soreness Out"), None);
    }

    #[test]
    fn team_vocabulary_matches_whole_words() {
        assert!(mentions_team("Los Angeles Lakers"));
        assert!(mentions_team("Portland Trail Blazers"));
        assert!(mentions_team("Philadelphia 76ers"));
        assert!(!mentions_team("Heatwave"));
        assert!(!mentions_team("lakers"));
    }

    #[test]
    fn detects_game_header_patterns() {
        assert!(is_game_date("10/22/2025"));
        assert!(!is_game_date("02/30/2025"));
        assert!(!is_game_date("10/22"));
        assert!(is_game_time("07:30 (ET)"));
        assert!(!is_game_time("07:30"));
        assert!(is_matchup("LAL@GSW"));
        assert!(is_matchup("NY @ BOS"));
        assert!(!is_matchup("email@example.com"));
        assert!(has_header_signal("Boston Celtics"));
        assert!(!has_header_signal("Left Knee; Soreness"));
    }
}
