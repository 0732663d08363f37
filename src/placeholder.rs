//! Placeholder row detection
//!
//! Result sheets are maintained by hand and the athlete list region routinely
//! picks up legend rows, "Athlete 23" stand-ins and threshold annotations.
//! The detector errs on the side of rejecting a row: roster-size logic
//! downstream depends on an accurate athlete count.

use crate::models::FieldValue;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STAND_IN_RE: Regex = Regex::new(r"^(?:athlete|climber|competitor)\s+\d+").unwrap();
    static ref VALUE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^\d+$").unwrap(),
        Regex::new(r"^\d+\.\d+$").unwrap(),
        Regex::new(r"^\d+\+$").unwrap(),
        Regex::new(r"^(?:tbd|tba|n/a|na)$").unwrap(),
        Regex::new(r"^hold\s+\d+").unwrap(),
        Regex::new(r"^zone\s+\d+").unwrap(),
        Regex::new(r"^top\s+\d+").unwrap(),
    ];
}

/// Column-legend and annotation words that never appear in the name column of a real athlete.
const ANNOTATION_WORDS: [&str; 8] = [
    "qualification",
    "threshold",
    "worst",
    "best",
    "average",
    "points",
    "score",
    "rank",
];

const MIN_NAME_LEN: usize = 3;

/// True when `name` is a placeholder or reference entry rather than an athlete.
pub fn is_placeholder(name: impl AsRef<str>) -> bool {
    let name = name.as_ref().trim().to_lowercase();

    if STAND_IN_RE.is_match(&name) {
        return true;
    }

    if VALUE_PATTERNS.iter().any(|pattern| pattern.is_match(&name)) {
        return true;
    }

    if ANNOTATION_WORDS.iter().any(|word| name.contains(word)) {
        return true;
    }

    if name.chars().count() < MIN_NAME_LEN {
        return true;
    }

    !name.chars().any(char::is_alphabetic)
}

/// Same check for a cell of any type, using its display form.
pub fn is_placeholder_value(value: &FieldValue) -> bool {
    is_placeholder(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_placeholders() {
        for name in [
            "Athlete 12",
            "athlete 7 ",
            "Climber 3",
            "Competitor 21",
            "Hold 25",
            "Zone 40",
            "Top 50",
            "N/A",
            "na",
            "25+",
            "TBD",
            "tba",
            "17",
            "24.5",
            "Qualification threshold",
            "Worst case",
            "Points needed",
            "Rank",
            "Jo",
            "---",
            "",
        ] {
            assert!(is_placeholder(name), "expected placeholder: {:?}", name);
        }
    }

    #[test]
    fn real_names_pass() {
        for name in [
            "Janja Garnbret",
            "Brooke Raboutou",
            "Ai Mori",
            "Oriane Bertone",
            "Jessica Pilz",
            "Natalia Grossman",
            "Athlete",
            "Zoe",
        ] {
            assert!(!is_placeholder(name), "expected athlete: {:?}", name);
        }
    }

    #[test]
    fn idempotent_under_normalization() {
        for name in ["  Athlete 12 ", "JANJA GARNBRET", "\tHold 3", "Ai Mori", "  n/A"] {
            let normalized = name.trim().to_lowercase();
            assert_eq!(is_placeholder(name), is_placeholder(&normalized), "{:?}", name);
        }
    }

    #[test]
    fn non_text_values_are_coerced() {
        assert!(is_placeholder_value(&FieldValue::Number(12.0)));
        assert!(is_placeholder_value(&FieldValue::Absent));
        assert!(!is_placeholder_value(&FieldValue::Text("Ai Mori".to_string())));
    }
}
