use crate::cleaner::parse_number;
use crate::models::{AthleteRecord, BoulderCompletion, ColumnSet, FieldValue, BOULDER_COUNT};

/// Count the boulders an athlete has climbed and, once all are in, read the
/// worst rank they can still finish at.
pub fn evaluate(record: &AthleteRecord, columns: &ColumnSet) -> BoulderCompletion {
    let attempts_completed = columns
        .attempts
        .iter()
        .take(BOULDER_COUNT)
        .filter(|header| record.field(header).is_some_and(|value| !value.is_blank()))
        .count() as u8;

    let mut completion = BoulderCompletion {
        attempts_completed,
        worst_possible_finish: None,
    };

    if completion.is_complete() {
        completion.worst_possible_finish = worst_possible_finish(record, columns);
    }

    completion
}

// Header wording varies between sheets ("Worst Finish", "worst possible finish"),
// so the column is matched on keywords rather than exact text.
fn worst_possible_finish(record: &AthleteRecord, columns: &ColumnSet) -> Option<f64> {
    let (header, value) = record.field_containing(&columns.worst_finish_keywords)?;
    match value {
        FieldValue::Text(text) if !value.is_blank() && parse_number(value).is_none() => {
            log::warn!("{}: unparsable {} '{}'", record.name, header, text);
            None
        }
        _ => parse_number(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Discipline;

    fn boulder_columns() -> ColumnSet {
        ColumnSet::for_discipline(Discipline::Boulder)
    }

    fn with_attempts(scores: [&str; 4]) -> AthleteRecord {
        scores
            .iter()
            .enumerate()
            .fold(AthleteRecord::new("Brooke Raboutou"), |record, (i, score)| {
                let value = if score.is_empty() {
                    FieldValue::Absent
                } else {
                    FieldValue::Text(score.to_string())
                };
                record.with_field(&format!("Boulder {}", i + 1), value)
            })
    }

    #[test]
    fn counts_completed_attempts() {
        let record = with_attempts(["24.9", "-", "", "10.1"]);
        let completion = evaluate(&record, &boulder_columns());
        assert_eq!(completion.attempts_completed, 2);
        assert_eq!(completion.worst_possible_finish, None);
    }

    #[test]
    fn worst_finish_ignored_until_complete() {
        let record = with_attempts(["24.9", "25", "-", "10.1"])
            .with_field("Worst Finish", FieldValue::Number(12.0));
        let completion = evaluate(&record, &boulder_columns());
        assert_eq!(completion.attempts_completed, 3);
        assert_eq!(completion.worst_possible_finish, None);
    }

    #[test]
    fn worst_finish_read_when_complete() {
        let record = with_attempts(["24.9", "0", "9.9", "10.1"])
            .with_field("WORST possible Finish", FieldValue::Number(6.0));
        let completion = evaluate(&record, &boulder_columns());
        assert!(completion.is_complete());
        assert_eq!(completion.worst_possible_finish, Some(6.0));
    }

    #[test]
    fn worst_finish_sentinels_are_absent() {
        let columns = boulder_columns();
        for value in [
            FieldValue::Text("-".to_string()),
            FieldValue::Text("tbc".to_string()),
            FieldValue::Absent,
        ] {
            let record = with_attempts(["1", "2", "3", "4"]).with_field("Worst Finish", value);
            assert_eq!(evaluate(&record, &columns).worst_possible_finish, None);
        }

        let missing = with_attempts(["1", "2", "3", "4"]);
        assert_eq!(evaluate(&missing, &columns).worst_possible_finish, None);
    }
}
