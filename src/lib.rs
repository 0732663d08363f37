//! Climbing competition status
//!
//! Turns live result sheets into per-athlete qualification and podium status.
//!
//! This library provides:
//! - `cleaner`: cell normalization and numeric coercion
//! - `placeholder`: detection of non-athlete rows in the name column
//! - `filter`: cascading selection of the athletes active in a stage
//! - `boulder`: per-boulder completion and worst possible finish
//! - `classifier`: the status decision table
//! - `metrics`: roll-up statistics per stage
//! - `analyzer`: the full pass for one stage
//! - `source`: CSV sheet loading from disk or HTTP
//! - `report`: CSV and text output for the binary

pub mod analyzer;
pub mod boulder;
pub mod classifier;
pub mod cleaner;
pub mod filter;
pub mod metrics;
pub mod models;
pub mod placeholder;
pub mod report;
pub mod source;

pub use analyzer::{ClassifiedAthlete, StageAnalysis, StageAnalyzer};
pub use models::{
    AthleteRecord, BoulderCompletion, ClassificationLabel, ClassificationResult, CompetitionMetrics,
    CompetitionStage, Discipline, FieldValue, Round, Table,
};
