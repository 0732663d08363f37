use crate::boulder;
use crate::classifier::classify;
use crate::cleaner::{clean_table, parse_rank};
use crate::filter::filter_active;
use crate::metrics::aggregate;
use crate::models::{
    AthleteRecord, BoulderCompletion, ClassificationLabel, ClassificationResult, CompetitionMetrics,
    CompetitionStage, Table,
};

#[derive(Debug, Clone)]
pub struct ClassifiedAthlete {
    pub record: AthleteRecord,
    pub completion: Option<BoulderCompletion>, // boulder stages only
    pub result: ClassificationResult,
}

#[derive(Debug, Clone)]
pub struct StageAnalysis {
    pub stage: CompetitionStage,
    pub athletes: Vec<ClassifiedAthlete>,
    pub metrics: CompetitionMetrics,
}

impl StageAnalysis {
    /// Number of athletes per label, in display order, labels with no athletes omitted.
    pub fn label_counts(&self) -> Vec<(ClassificationLabel, usize)> {
        ClassificationLabel::ALL
            .iter()
            .map(|label| {
                let count = self.athletes.iter().filter(|a| a.result.label == *label).count();
                (*label, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn athletes_with_label(&self, label: ClassificationLabel) -> impl Iterator<Item = &ClassifiedAthlete> {
        self.athletes.iter().filter(move |a| a.result.label == label)
    }
}

/// Runs the whole classification pass for one stage. Holds no state between
/// calls: every `analyze` works only on the table it is given.
pub struct StageAnalyzer<'a> {
    pub stage: &'a CompetitionStage,
}

impl<'a> StageAnalyzer<'a> {
    pub fn new(stage: &'a CompetitionStage) -> Self {
        Self { stage }
    }

    /// Main analysis: clean, select active athletes, classify, aggregate
    pub fn analyze(&self, table: &Table) -> StageAnalysis {
        // Step 1: Clean raw cells into records
        let records = clean_table(table, &self.stage.columns);

        // Step 2: Keep only the athletes competing in this stage
        let active = filter_active(&records, self.stage);

        // Step 3: Classify each athlete
        let athletes: Vec<ClassifiedAthlete> = active
            .iter()
            .map(|record| self.classify_record(record))
            .collect();

        // Step 4: Roll-up metrics
        let metrics = aggregate(&active, self.stage);

        log::info!(
            "{}: {} rows, {} active athletes, leader {}",
            self.stage,
            table.rows.len(),
            athletes.len(),
            metrics.leader_name
        );

        StageAnalysis {
            stage: self.stage.clone(),
            athletes,
            metrics,
        }
    }

    /// Classify a single, already cleaned record.
    pub fn classify_record(&self, record: &AthleteRecord) -> ClassifiedAthlete {
        let columns = &self.stage.columns;

        let rank = record.field(&columns.rank).and_then(parse_rank);

        let completion = if self.stage.is_boulder() {
            Some(boulder::evaluate(record, columns))
        } else {
            None
        };

        let explicit_status = columns
            .status
            .as_ref()
            .and_then(|header| record.field(header))
            .filter(|value| !value.is_blank())
            .map(|value| value.to_string());

        let result = classify(rank, completion.as_ref(), explicit_status.as_deref(), self.stage);

        ClassifiedAthlete {
            record: record.clone(),
            completion,
            result,
        }
    }
}
