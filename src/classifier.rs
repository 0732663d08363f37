//! Status classification
//!
//! Maps an athlete's provisional rank and progress onto a display label. The
//! decision table is evaluated top to bottom and the first matching rule wins.
//!
//! Boulder semi-finals carry the one subtle rule: a provisional rank inside the
//! qualification cutoff is not enough. When the worst finish still reachable
//! lies outside the cutoff the athlete stays "in contention" rather than being
//! shown as qualified. The worst finish only ever moves a label towards caution,
//! never towards elimination.

use crate::models::{
    BoulderCompletion, ClassificationLabel, ClassificationResult, CompetitionStage, Discipline,
    Round, PODIUM_CUTOFF, QUALIFICATION_CUTOFF,
};

/// Classify one athlete. `completion` is only consulted for boulder stages and
/// `explicit_status` only for lead stages.
pub fn classify(
    rank: Option<i64>,
    completion: Option<&BoulderCompletion>,
    explicit_status: Option<&str>,
    stage: &CompetitionStage,
) -> ClassificationResult {
    let rank = match rank {
        Some(rank) if rank > 0 => rank,
        _ => return ClassificationResult::awaiting(),
    };

    let label = match stage.discipline {
        Discipline::Boulder => classify_boulder(rank, completion, stage.round),
        Discipline::Lead => explicit_status
            .and_then(label_from_status)
            .unwrap_or_else(|| classify_by_rank(rank)),
    };

    ClassificationResult {
        label,
        rank: Some(rank),
    }
}

fn classify_boulder(rank: i64, completion: Option<&BoulderCompletion>, round: Round) -> ClassificationLabel {
    let completion = completion.copied().unwrap_or_default();
    if !completion.is_complete() {
        return ClassificationLabel::PodiumContention;
    }

    match round {
        Round::Semis => {
            let at_risk = completion
                .worst_possible_finish
                .is_some_and(|worst| worst > QUALIFICATION_CUTOFF as f64);
            if at_risk {
                ClassificationLabel::PodiumContention
            } else if rank <= QUALIFICATION_CUTOFF {
                ClassificationLabel::Qualified
            } else {
                ClassificationLabel::Eliminated
            }
        }
        Round::Final => {
            if rank <= PODIUM_CUTOFF {
                ClassificationLabel::PodiumPosition
            } else {
                ClassificationLabel::NoPodium
            }
        }
    }
}

/// Read the label out of the free-text status column. Returns `None` when the
/// text names no known state.
pub fn label_from_status(status: &str) -> Option<ClassificationLabel> {
    let status = status.trim().to_lowercase();
    if status.is_empty() {
        return None;
    }

    if status.contains("podium") && !status.contains("no podium") && !status.contains("contention") {
        Some(ClassificationLabel::PodiumPosition)
    } else if status.contains("qualified") {
        Some(ClassificationLabel::Qualified)
    } else if status.contains("eliminated") {
        Some(ClassificationLabel::Eliminated)
    } else if status.contains("no podium") {
        Some(ClassificationLabel::NoPodium)
    } else if status.contains("contention") {
        Some(ClassificationLabel::PodiumContention)
    } else {
        None
    }
}

fn classify_by_rank(rank: i64) -> ClassificationLabel {
    if rank <= PODIUM_CUTOFF {
        ClassificationLabel::PodiumPosition
    } else if rank <= QUALIFICATION_CUTOFF {
        ClassificationLabel::Qualified
    } else {
        ClassificationLabel::Eliminated
    }
}
