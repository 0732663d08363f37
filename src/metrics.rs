use crate::boulder;
use crate::cleaner::{parse_number, parse_rank};
use crate::models::{AthleteRecord, CompetitionMetrics, CompetitionStage, LEADER_TBD};

/// Roll-up statistics over the active athletes of a stage.
///
/// An athlete counts as completed once every boulder is in (boulder) or once a
/// score has been entered (lead). Unparsable scores are left out of the mean
/// instead of counting as zero.
pub fn aggregate(active: &[AthleteRecord], stage: &CompetitionStage) -> CompetitionMetrics {
    if active.is_empty() {
        return CompetitionMetrics::default();
    }

    let columns = &stage.columns;

    let completed_count = active
        .iter()
        .filter(|record| {
            if stage.is_boulder() {
                boulder::evaluate(record, columns).is_complete()
            } else {
                record.field(&columns.score).is_some_and(|value| !value.is_blank())
            }
        })
        .count();

    let scores: Vec<f64> = active
        .iter()
        .filter_map(|record| record.field(&columns.score).and_then(parse_number))
        .collect();

    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    let leader_name = active
        .iter()
        .find(|record| record.field(&columns.rank).and_then(parse_rank) == Some(1))
        .map(|record| record.name.clone())
        .unwrap_or_else(|| LEADER_TBD.to_string());

    CompetitionMetrics {
        total_athletes: active.len(),
        completed_count,
        average_score,
        leader_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Discipline, FieldValue, Round};

    fn lead_record(name: &str, rank: Option<f64>, score: FieldValue) -> AthleteRecord {
        let rank = rank.map(FieldValue::Number).unwrap_or(FieldValue::Absent);
        AthleteRecord::new(name)
            .with_field("Current Rank", rank)
            .with_field("Manual Score", score)
    }

    #[test]
    fn average_skips_non_numeric_scores() {
        let stage = CompetitionStage::new(Discipline::Lead, Round::Final, "Men");
        let active = vec![
            lead_record("Adam Ondra", Some(2.0), FieldValue::Number(10.0)),
            lead_record("Jakob Schubert", Some(1.0), FieldValue::Number(20.0)),
            lead_record("Toby Roberts", None, FieldValue::Text("N/A".to_string())),
            lead_record("Sorato Anraku", Some(3.0), FieldValue::Number(30.0)),
        ];

        let metrics = aggregate(&active, &stage);
        assert_eq!(metrics.total_athletes, 4);
        assert_eq!(metrics.average_score, 20.0);
        assert_eq!(metrics.leader_name, "Jakob Schubert");
        assert_eq!(metrics.completed_count, 4);
    }

    #[test]
    fn leader_is_tbd_without_rank_one() {
        let stage = CompetitionStage::new(Discipline::Lead, Round::Semis, "Women");
        let active = vec![
            lead_record("Jessica Pilz", Some(2.0), FieldValue::Absent),
            lead_record("Ai Mori", None, FieldValue::Text("-".to_string())),
        ];

        let metrics = aggregate(&active, &stage);
        assert_eq!(metrics.leader_name, LEADER_TBD);
        assert_eq!(metrics.completed_count, 0);
        assert_eq!(metrics.average_score, 0.0);
    }

    #[test]
    fn boulder_completion_counts_full_rounds() {
        let stage = CompetitionStage::new(Discipline::Boulder, Round::Semis, "Women");
        let full = (1..=4).fold(AthleteRecord::new("Janja Garnbret"), |record, i| {
            record.with_field(&format!("Boulder {}", i), FieldValue::Number(24.9))
        });
        let partial = AthleteRecord::new("Ai Mori").with_field("Boulder 1", FieldValue::Number(10.0));

        let metrics = aggregate(&[full, partial], &stage);
        assert_eq!(metrics.completed_count, 1);
        assert_eq!(metrics.total_athletes, 2);
    }

    #[test]
    fn empty_input_yields_zeroed_metrics() {
        let stage = CompetitionStage::new(Discipline::Boulder, Round::Final, "Men");
        assert_eq!(aggregate(&[], &stage), CompetitionMetrics::default());
    }
}
