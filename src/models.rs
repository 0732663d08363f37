use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rank at or below which a semi-final athlete advances to the final.
pub const QUALIFICATION_CUTOFF: i64 = 8;
/// Rank at or below which a finalist stands on the podium.
pub const PODIUM_CUTOFF: i64 = 3;
/// Number of boulders (per-attempt score columns) in every boulder round.
pub const BOULDER_COUNT: usize = 4;
/// Leader name reported while nobody holds rank 1.
pub const LEADER_TBD: &str = "TBD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Data source configuration
    pub data_source_mode: DataSourceMode,
    pub output_directory: Option<String>,
    pub stages: Vec<StageConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceMode {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "internet")]
    Internet,
    #[serde(rename = "both")]
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub id: String,
    pub discipline: Discipline,
    pub round: Round,
    pub gender_category: String,
    pub csv_path: Option<String>,
    pub url: Option<String>,
    pub expected_roster_size: Option<usize>,
    pub columns: Option<ColumnOverrides>,
}

impl StageConfig {
    fn sample(id: &str, discipline: Discipline, round: Round) -> Self {
        Self {
            id: id.to_string(),
            discipline,
            round,
            gender_category: "Women".to_string(),
            csv_path: Some(format!("data-source/{}.csv", id)),
            url: Some(format!("https://example.com/sheets/{}.csv", id)),
            expected_roster_size: None,
            columns: None,
        }
    }

    /// Builds the competition context for this stage, applying any overrides.
    pub fn competition_stage(&self) -> CompetitionStage {
        let mut stage = CompetitionStage::new(self.discipline, self.round, &self.gender_category);
        if let Some(size) = self.expected_roster_size {
            stage.expected_roster_size = size;
        }
        if let Some(overrides) = &self.columns {
            stage.columns = stage.columns.with_overrides(overrides);
        }
        stage
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source_mode: DataSourceMode::Local,
            output_directory: Some("output".to_string()),
            stages: vec![
                StageConfig::sample("boulder_semis", Discipline::Boulder, Round::Semis),
                StageConfig::sample("boulder_final", Discipline::Boulder, Round::Final),
                StageConfig::sample("lead_semis", Discipline::Lead, Round::Semis),
                StageConfig::sample("lead_final", Discipline::Lead, Round::Final),
            ],
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Boulder,
    Lead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Semis,
    Final,
}

/// Header names used to locate fields in one stage's sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSet {
    pub name: String,
    pub rank: String,
    pub score: String,
    pub attempts: Vec<String>,
    pub worst_finish_keywords: Vec<String>,
    pub status: Option<String>,
}

/// Partial column mapping read from the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnOverrides {
    pub name: Option<String>,
    pub rank: Option<String>,
    pub score: Option<String>,
    pub attempts: Option<Vec<String>>,
    pub worst_finish_keywords: Option<Vec<String>>,
    pub status: Option<String>,
}

impl ColumnSet {
    pub fn for_discipline(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Boulder => Self {
                name: "Name".to_string(),
                rank: "Current Rank".to_string(),
                score: "Total Score".to_string(),
                attempts: (1..=BOULDER_COUNT).map(|i| format!("Boulder {}", i)).collect(),
                worst_finish_keywords: vec!["worst".to_string(), "finish".to_string()],
                status: None,
            },
            Discipline::Lead => Self {
                name: "Name".to_string(),
                rank: "Current Rank".to_string(),
                score: "Manual Score".to_string(),
                attempts: Vec::new(),
                worst_finish_keywords: vec!["worst".to_string(), "finish".to_string()],
                status: Some("Status".to_string()),
            },
        }
    }

    pub fn with_overrides(mut self, overrides: &ColumnOverrides) -> Self {
        if let Some(name) = &overrides.name {
            self.name = name.clone();
        }
        if let Some(rank) = &overrides.rank {
            self.rank = rank.clone();
        }
        if let Some(score) = &overrides.score {
            self.score = score.clone();
        }
        if let Some(attempts) = &overrides.attempts {
            self.attempts = attempts.clone();
        }
        if let Some(keywords) = &overrides.worst_finish_keywords {
            self.worst_finish_keywords = keywords.clone();
        }
        if overrides.status.is_some() {
            self.status = overrides.status.clone();
        }
        self
    }
}

/// Context for one round of one discipline, supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionStage {
    pub discipline: Discipline,
    pub round: Round,
    pub gender_category: String,
    pub expected_roster_size: usize,
    pub columns: ColumnSet,
}

impl CompetitionStage {
    pub fn new(discipline: Discipline, round: Round, gender_category: &str) -> Self {
        Self {
            discipline,
            round,
            gender_category: gender_category.to_string(),
            expected_roster_size: default_roster_size(discipline, round),
            columns: ColumnSet::for_discipline(discipline),
        }
    }

    pub fn is_boulder(&self) -> bool {
        self.discipline == Discipline::Boulder
    }

    pub fn is_lead(&self) -> bool {
        self.discipline == Discipline::Lead
    }
}

impl fmt::Display for CompetitionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let discipline = match self.discipline {
            Discipline::Boulder => "Boulder",
            Discipline::Lead => "Lead",
        };
        let round = match self.round {
            Round::Semis => "Semis",
            Round::Final => "Final",
        };
        write!(f, "{} {} ({})", discipline, round, self.gender_category)
    }
}

/// 20 for Boulder Semis, 24 for Lead Semis, 8 for any Final.
pub fn default_roster_size(discipline: Discipline, round: Round) -> usize {
    match (discipline, round) {
        (Discipline::Boulder, Round::Semis) => 20,
        (Discipline::Lead, Round::Semis) => 24,
        (_, Round::Final) => 8,
    }
}

/// A single sheet cell after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Absent,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// True for absent cells and the `-` sentinel the sheets use for "not yet climbed".
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty() || trimmed == "-"
            }
            FieldValue::Number(value) => value.is_nan(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) if value.is_finite() => Some(*value),
            FieldValue::Text(text) => text.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Absent => Ok(()),
        }
    }
}

/// Raw sheet contents: a header row plus data rows of string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row of the source table after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteRecord {
    pub name: String,
    pub raw_fields: BTreeMap<String, FieldValue>,
}

impl AthleteRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, header: &str, value: FieldValue) -> Self {
        self.raw_fields.insert(header.to_string(), value);
        self
    }

    /// Exact, case-sensitive header lookup.
    pub fn field(&self, header: &str) -> Option<&FieldValue> {
        self.raw_fields.get(header)
    }

    /// First header (in sorted order) containing every keyword, ignoring case.
    pub fn field_containing(&self, keywords: &[String]) -> Option<(&str, &FieldValue)> {
        self.raw_fields
            .iter()
            .find(|(header, _)| {
                let header = header.to_lowercase();
                keywords.iter().all(|keyword| header.contains(&keyword.to_lowercase()))
            })
            .map(|(header, value)| (header.as_str(), value))
    }

    pub fn has_field(&self, header: &str) -> bool {
        self.raw_fields.contains_key(header)
    }
}

/// Per-athlete boulder progress, derived from the per-boulder score cells.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoulderCompletion {
    pub attempts_completed: u8,
    pub worst_possible_finish: Option<f64>,
}

impl BoulderCompletion {
    pub fn is_complete(&self) -> bool {
        self.attempts_completed as usize >= BOULDER_COUNT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationLabel {
    AwaitingResult,
    PodiumPosition,
    Qualified,
    PodiumContention,
    Eliminated,
    NoPodium,
}

impl ClassificationLabel {
    pub const ALL: [ClassificationLabel; 6] = [
        ClassificationLabel::PodiumPosition,
        ClassificationLabel::Qualified,
        ClassificationLabel::PodiumContention,
        ClassificationLabel::AwaitingResult,
        ClassificationLabel::NoPodium,
        ClassificationLabel::Eliminated,
    ];

    pub fn css_class(&self) -> &'static str {
        match self {
            ClassificationLabel::AwaitingResult => "status-awaiting",
            ClassificationLabel::PodiumPosition => "status-podium",
            ClassificationLabel::Qualified => "status-qualified",
            ClassificationLabel::PodiumContention => "status-contention",
            ClassificationLabel::Eliminated => "status-eliminated",
            ClassificationLabel::NoPodium => "status-no-podium",
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            ClassificationLabel::AwaitingResult => "Awaiting Result",
            ClassificationLabel::PodiumPosition => "Podium",
            ClassificationLabel::Qualified => "Qualified",
            ClassificationLabel::PodiumContention => "In Contention",
            ClassificationLabel::Eliminated => "Eliminated",
            ClassificationLabel::NoPodium => "No Podium",
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: ClassificationLabel,
    pub rank: Option<i64>,
}

impl ClassificationResult {
    pub fn awaiting() -> Self {
        Self {
            label: ClassificationLabel::AwaitingResult,
            rank: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionMetrics {
    pub total_athletes: usize,
    pub completed_count: usize,
    pub average_score: f64,
    pub leader_name: String,
}

impl Default for CompetitionMetrics {
    fn default() -> Self {
        Self {
            total_athletes: 0,
            completed_count: 0,
            average_score: 0.0,
            leader_name: LEADER_TBD.to_string(),
        }
    }
}
