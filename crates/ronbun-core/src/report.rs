//! Score report types with JSON persistence and progress comparison.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::EssayResult;
use crate::statistics::AggregateStats;

/// A complete batch scoring report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the essay set.
    pub essay_set: EssaySetSummary,
    /// Name of the scorer that produced the results.
    pub scorer: String,
    /// Per-essay results in essay-set order.
    pub results: Vec<EssayResult>,
    /// Aggregate statistics.
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of an essay set (without the essay bodies).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssaySetSummary {
    pub id: String,
    pub name: String,
    pub essay_count: usize,
}

impl ScoreReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse report JSON: {}", path.display()))
    }

    /// Compare this report against an earlier baseline.
    ///
    /// Essays are matched by id. A change in total score counts only when it
    /// exceeds `threshold_points` in either direction.
    pub fn compare(&self, baseline: &ScoreReport, threshold_points: u32) -> ProgressComparison {
        let totals = |report: &ScoreReport| -> BTreeMap<String, u32> {
            report
                .results
                .iter()
                .map(|r| (r.essay_id.clone(), r.score.total))
                .collect()
        };

        let baseline_totals = totals(baseline);
        let current_totals = totals(self);
        let threshold = i64::from(threshold_points);

        let mut comparison = ProgressComparison::default();

        for (essay_id, &current) in &current_totals {
            let Some(&before) = baseline_totals.get(essay_id) else {
                comparison.new_essays += 1;
                continue;
            };

            let delta = i64::from(current) - i64::from(before);
            let change = ScoreChange {
                essay_id: essay_id.clone(),
                baseline_total: before,
                current_total: current,
                delta,
            };
            if delta < -threshold {
                comparison.regressions.push(change);
            } else if delta > threshold {
                comparison.improvements.push(change);
            } else {
                comparison.unchanged += 1;
            }
        }

        comparison.removed_essays = baseline_totals
            .keys()
            .filter(|id| !current_totals.contains_key(*id))
            .count();

        comparison.baseline_mean = baseline.aggregate.mean_total;
        comparison.current_mean = self.aggregate.mean_total;

        comparison
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressComparison {
    /// Essays whose total went down.
    pub regressions: Vec<ScoreChange>,
    /// Essays whose total went up.
    pub improvements: Vec<ScoreChange>,
    /// Essays with no significant change.
    pub unchanged: usize,
    /// Essays in current but not baseline.
    pub new_essays: usize,
    /// Essays in baseline but not current.
    pub removed_essays: usize,
    pub baseline_mean: f64,
    pub current_mean: f64,
}

/// A total-score change for one essay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub essay_id: String,
    pub baseline_total: u32,
    pub current_total: u32,
    pub delta: i64,
}

impl ProgressComparison {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged (mean {:.1} → {:.1})\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged,
            self.baseline_mean,
            self.current_mean
        ));

        let sections = [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ];
        for (title, changes) in sections {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Essay | Baseline | Current | Delta |\n");
            md.push_str("|-------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {} | {} | {:+} |\n",
                    c.essay_id, c.baseline_total, c.current_total, c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
