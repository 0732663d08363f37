//! Active athlete selection
//!
//! Picks the athletes competing in a stage out of a cleaned sheet. Resolution
//! cascades from the most specific signal to the crudest one: rank column,
//! then name shape, then (lead only) whether a score has been entered. A stage
//! that fails hands over to the next one; nothing here returns an error.

use crate::cleaner::parse_rank;
use crate::models::{AthleteRecord, CompetitionStage};
use crate::placeholder::is_placeholder;
use thiserror::Error;

/// Annotation fragments that mark threshold rows such as "Hold for 1st".
const ADMIN_MARKERS: [&str; 7] = [
    "hold for",
    "min to",
    "max to",
    "needed to",
    "to qualify",
    "cutoff",
    "cut-off",
];

/// Words that disqualify a name in pattern-based resolution. Matched per token.
const ADMIN_KEYWORDS: [&str; 13] = [
    "hold",
    "min",
    "max",
    "qualification",
    "threshold",
    "zone",
    "top",
    "points",
    "score",
    "rank",
    "position",
    "place",
    "finish",
];

const MIN_SINGLE_TOKEN_LEN: usize = 5;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("column '{0}' not present in sheet")]
    MissingColumn(String),
    #[error("rank column resolved {found} athletes, expected {expected}")]
    RosterMismatch { found: usize, expected: usize },
    #[error("no name matched the athlete name pattern")]
    NoNameMatches,
}

/// Select the athletes taking part in `stage`, at most `expected_roster_size` of them.
pub fn filter_active(rows: &[AthleteRecord], stage: &CompetitionStage) -> Vec<AthleteRecord> {
    let roster_size = stage.expected_roster_size;
    let candidates = coarse_exclusion(rows);
    log::debug!(
        "{}: {} of {} rows survive coarse exclusion",
        stage,
        candidates.len(),
        rows.len()
    );

    match resolve_by_rank(&candidates, stage) {
        Ok(active) => {
            log::debug!("{}: resolved {} athletes by rank", stage, active.len());
            return active;
        }
        Err(e) => log::debug!("{}: rank resolution not usable: {}", stage, e),
    }

    match resolve_by_pattern(&candidates, stage) {
        Ok(active) => {
            log::debug!("{}: resolved {} athletes by name pattern", stage, active.len());
            active
        }
        Err(e) => {
            log::warn!("{}: falling back to coarse exclusion: {}", stage, e);
            candidates.into_iter().take(roster_size).collect()
        }
    }
}

/// Drop rows that cannot be athletes regardless of the rest of the sheet.
pub fn coarse_exclusion(rows: &[AthleteRecord]) -> Vec<AthleteRecord> {
    rows.iter()
        .filter(|record| is_candidate_name(&record.name))
        .cloned()
        .collect()
}

fn is_candidate_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let lowered = trimmed.to_lowercase();
    if ADMIN_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return false;
    }

    !is_placeholder(trimmed)
}

/// Keep athletes ranked inside the roster, ordered by rank. Only trusted when
/// it accounts for exactly the expected roster.
fn resolve_by_rank(
    candidates: &[AthleteRecord],
    stage: &CompetitionStage,
) -> Result<Vec<AthleteRecord>, FilterError> {
    let rank_column = &stage.columns.rank;
    let roster_size = stage.expected_roster_size;

    if !candidates.iter().any(|record| record.has_field(rank_column)) {
        return Err(FilterError::MissingColumn(rank_column.clone()));
    }

    let mut ranked: Vec<(i64, &AthleteRecord)> = candidates
        .iter()
        .filter_map(|record| {
            let rank = record.field(rank_column).and_then(parse_rank)?;
            (1..=roster_size as i64).contains(&rank).then_some((rank, record))
        })
        .collect();

    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.truncate(roster_size);

    if ranked.len() != roster_size {
        return Err(FilterError::RosterMismatch {
            found: ranked.len(),
            expected: roster_size,
        });
    }

    Ok(ranked.into_iter().map(|(_, record)| record.clone()).collect())
}

/// Keep rows whose name looks like a person's name, in sheet order.
fn resolve_by_pattern(
    candidates: &[AthleteRecord],
    stage: &CompetitionStage,
) -> Result<Vec<AthleteRecord>, FilterError> {
    let mut active: Vec<AthleteRecord> = candidates
        .iter()
        .filter(|record| looks_like_athlete_name(&record.name))
        .cloned()
        .collect();

    if active.is_empty() && !candidates.is_empty() {
        return Err(FilterError::NoNameMatches);
    }

    if stage.is_lead() && active.len() > stage.expected_roster_size {
        match resolve_by_score_presence(&active, stage) {
            Ok(scored_first) => active = scored_first,
            Err(e) => log::warn!("{}: score presence resolution failed: {}", stage, e),
        }
    }

    active.truncate(stage.expected_roster_size);
    Ok(active)
}

fn looks_like_athlete_name(name: &str) -> bool {
    let tokens: Vec<&str> = name.split_whitespace().collect();

    let has_admin_keyword = tokens.iter().any(|token| {
        let word = token
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        ADMIN_KEYWORDS.contains(&word.as_str())
    });
    if has_admin_keyword {
        return false;
    }

    match tokens.as_slice() {
        [] => false,
        [single] => is_alphabetic_token(single) && single.chars().count() >= MIN_SINGLE_TOKEN_LEN,
        many => many.iter().all(|token| is_alphabetic_token(token)),
    }
}

/// Letters plus the punctuation found in names ("O'Brien", "Jean-Luc", "St.").
fn is_alphabetic_token(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
        && token
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, '-' | '\'' | '.'))
}

/// Scored athletes first, then unscored ones, each group in sheet order.
fn resolve_by_score_presence(
    athletes: &[AthleteRecord],
    stage: &CompetitionStage,
) -> Result<Vec<AthleteRecord>, FilterError> {
    let score_column = &stage.columns.score;
    if !athletes.iter().any(|record| record.has_field(score_column)) {
        return Err(FilterError::MissingColumn(score_column.clone()));
    }

    let (scored, unscored): (Vec<&AthleteRecord>, Vec<&AthleteRecord>) = athletes
        .iter()
        .partition(|record| record.field(score_column).is_some_and(|value| !value.is_blank()));

    Ok(scored
        .into_iter()
        .chain(unscored)
        .take(stage.expected_roster_size)
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Discipline, FieldValue, Round};

    fn ranked(name: &str, rank: f64) -> AthleteRecord {
        AthleteRecord::new(name).with_field("Current Rank", FieldValue::Number(rank))
    }

    fn athlete_names(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let first = ["Anna", "Beatriz", "Chloe", "Dora", "Elena", "Freya"][i % 6];
                let last = ["Berger", "Costa", "Dubois", "Evans", "Fischer", "Garcia", "Hansen"][i % 7];
                format!("{} {}{}", first, last, "s".repeat(i / 42))
            })
            .collect()
    }

    #[test]
    fn coarse_exclusion_drops_annotations() {
        let rows = vec![
            AthleteRecord::new("Janja Garnbret"),
            AthleteRecord::new("Hold for 1st"),
            AthleteRecord::new("Min to qualify"),
            AthleteRecord::new("Athlete 21"),
            AthleteRecord::new(""),
            AthleteRecord::new("42"),
            AthleteRecord::new("Ai Mori"),
        ];
        let names: Vec<String> = coarse_exclusion(&rows).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Janja Garnbret", "Ai Mori"]);
    }

    #[test]
    fn rank_resolution_orders_by_rank() {
        let stage = CompetitionStage::new(Discipline::Boulder, Round::Final, "Women");
        let mut rows: Vec<AthleteRecord> = athlete_names(8)
            .iter()
            .enumerate()
            .map(|(i, name)| ranked(name, (8 - i) as f64))
            .collect();
        rows.push(ranked("Late Entry", 9.0));

        let active = filter_active(&rows, &stage);
        assert_eq!(active.len(), 8);
        assert_eq!(active[0].name, rows[7].name);
        assert!(active.iter().all(|r| r.name != "Late Entry"));
    }

    #[test]
    fn partial_ranks_fall_back_to_pattern() {
        let stage = CompetitionStage::new(Discipline::Boulder, Round::Final, "Women");
        let rows = vec![
            ranked("Janja Garnbret", 1.0),
            AthleteRecord::new("Ai Mori").with_field("Current Rank", FieldValue::Absent),
            AthleteRecord::new("Garnbret").with_field("Current Rank", FieldValue::Absent),
            AthleteRecord::new("Place Holder").with_field("Current Rank", FieldValue::Absent),
            AthleteRecord::new("Mia").with_field("Current Rank", FieldValue::Absent),
        ];

        let names: Vec<String> = filter_active(&rows, &stage).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Janja Garnbret", "Ai Mori", "Garnbret"]);
    }

    #[test]
    fn pattern_keywords_match_whole_tokens() {
        assert!(looks_like_athlete_name("Jasmine Dominguez"));
        assert!(looks_like_athlete_name("Jean-Luc O'Brien"));
        assert!(!looks_like_athlete_name("Top Finish"));
        assert!(!looks_like_athlete_name("Zone (min)"));
        assert!(!looks_like_athlete_name("Anna 2"));
        assert!(!looks_like_athlete_name("Anna"));
    }

    #[test]
    fn lead_prefers_scored_athletes() {
        let mut stage = CompetitionStage::new(Discipline::Lead, Round::Final, "Men");
        stage.expected_roster_size = 3;
        let rows = vec![
            AthleteRecord::new("Adam Ondra").with_field("Manual Score", FieldValue::Absent),
            AthleteRecord::new("Jakob Schubert").with_field("Manual Score", FieldValue::Text("38+".to_string())),
            AthleteRecord::new("Sorato Anraku").with_field("Manual Score", FieldValue::Text("-".to_string())),
            AthleteRecord::new("Toby Roberts").with_field("Manual Score", FieldValue::Number(41.0)),
            AthleteRecord::new("Alberto Gines"),
        ];

        let names: Vec<String> = filter_active(&rows, &stage).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Jakob Schubert", "Toby Roberts", "Adam Ondra"]);
    }

    #[test]
    fn degrades_to_coarse_exclusion() {
        let mut stage = CompetitionStage::new(Discipline::Boulder, Round::Final, "Women");
        stage.expected_roster_size = 2;
        let rows = vec![
            AthleteRecord::new("Mia"),
            AthleteRecord::new("Ana3"),
            AthleteRecord::new("Lou"),
        ];

        let names: Vec<String> = filter_active(&rows, &stage).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Mia", "Ana3"]);
    }

    #[test]
    fn output_never_exceeds_roster() {
        let stage = CompetitionStage::new(Discipline::Lead, Round::Semis, "Women");
        let rows: Vec<AthleteRecord> = athlete_names(60).iter().map(|n| AthleteRecord::new(n)).collect();

        let active = filter_active(&rows, &stage);
        assert_eq!(active.len(), stage.expected_roster_size);
        assert!(active.iter().all(|r| !is_placeholder(&r.name)));
    }

    #[test]
    fn empty_input_is_empty_output() {
        let stage = CompetitionStage::new(Discipline::Boulder, Round::Semis, "Men");
        assert!(filter_active(&[], &stage).is_empty());
    }
}
