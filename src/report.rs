use crate::analyzer::StageAnalysis;
use crate::models::ClassificationLabel;
use anyhow::{Context, Result};
use csv::Writer;
use std::path::{Path, PathBuf};

pub fn status_csv_path(output_dir: &Path, stage_id: &str) -> PathBuf {
    output_dir.join(format!("{}_status.csv", stage_id))
}

/// Write one row per active athlete, in the order the analysis produced them.
pub fn write_status_csv(analysis: &StageAnalysis, output_dir: &Path, stage_id: &str) -> Result<PathBuf> {
    let csv_path = status_csv_path(output_dir, stage_id);
    let mut writer = Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;

    // Write headers
    writer.write_record([
        "Rank",
        "Name",
        "Status",
        "CSS Class",
        "Attempts",
        "Worst Finish",
        "Score",
    ])?;

    let score_column = &analysis.stage.columns.score;

    // Write data
    for athlete in &analysis.athletes {
        let rank = athlete.result.rank.map(|r| r.to_string()).unwrap_or_default();
        let attempts = athlete
            .completion
            .map(|c| c.attempts_completed.to_string())
            .unwrap_or_default();
        let worst_finish = athlete
            .completion
            .and_then(|c| c.worst_possible_finish)
            .map(|w| w.to_string())
            .unwrap_or_default();
        let score = athlete
            .record
            .field(score_column)
            .map(|value| value.to_string())
            .unwrap_or_default();

        writer.write_record([
            rank.as_str(),
            athlete.record.name.as_str(),
            athlete.result.label.display_text(),
            athlete.result.label.css_class(),
            attempts.as_str(),
            worst_finish.as_str(),
            score.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(csv_path)
}

/// Plain-text summary block for one stage.
pub fn format_summary(analysis: &StageAnalysis) -> String {
    let metrics = &analysis.metrics;
    let mut content = String::new();

    content.push_str(&format!("📊 {}\n", analysis.stage));
    content.push_str(&format!(
        "   Athletes: {} (completed: {})\n   Average score: {:.2}\n   Leader: {}\n",
        metrics.total_athletes, metrics.completed_count, metrics.average_score, metrics.leader_name
    ));

    let counts: Vec<String> = analysis
        .label_counts()
        .iter()
        .map(|(label, count)| format!("{} {}: {}", label_icon(*label), label, count))
        .collect();
    if !counts.is_empty() {
        content.push_str(&format!("   {}\n", counts.join("  ")));
    }

    for athlete in &analysis.athletes {
        let rank = athlete
            .result
            .rank
            .map(|r| format!("{:>3}", r))
            .unwrap_or_else(|| "  -".to_string());
        content.push_str(&format!(
            "   {}. {} {} - {}\n",
            rank,
            label_icon(athlete.result.label),
            athlete.record.name,
            athlete.result.label
        ));
    }

    content
}

fn label_icon(label: ClassificationLabel) -> &'static str {
    match label {
        ClassificationLabel::AwaitingResult => "⏳",
        ClassificationLabel::PodiumPosition => "🏆",
        ClassificationLabel::Qualified => "✅",
        ClassificationLabel::PodiumContention => "⚠️",
        ClassificationLabel::Eliminated => "❌",
        ClassificationLabel::NoPodium => "➖",
    }
}
