//! Aggregate statistics over a batch of scored essays.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::engine::EssayResult;
use crate::model::{Dimension, Grade};

/// Aggregate statistics across all results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of scored essays.
    pub count: usize,
    /// Mean total score (0.0 when nothing was scored).
    pub mean_total: f64,
    /// Per-dimension statistics.
    pub dimensions: BTreeMap<Dimension, DimensionStats>,
    /// Number of essays per letter grade.
    pub grade_distribution: BTreeMap<Grade, usize>,
    /// Suggestions ordered by frequency, most common first.
    pub suggestion_frequencies: Vec<SuggestionCount>,
    /// Essays written past their time limit.
    pub overtime_count: usize,
}

/// Spread of one sub-score across a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionStats {
    pub mean: f64,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionCount {
    pub suggestion: String,
    pub count: usize,
}

/// Compute aggregate statistics from all results.
pub fn compute_aggregate_stats(results: &[EssayResult]) -> AggregateStats {
    if results.is_empty() {
        return AggregateStats::default();
    }

    let count = results.len();
    let mean = |sum: u64| sum as f64 / count as f64;

    let mean_total = mean(results.iter().map(|r| u64::from(r.score.total)).sum());

    let dimensions = Dimension::ALL
        .iter()
        .map(|&dimension| {
            let values = results.iter().map(|r| r.score.dimension(dimension));
            let stats = DimensionStats {
                mean: mean(values.clone().map(u64::from).sum()),
                min: values.clone().min().unwrap_or(0),
                max: values.max().unwrap_or(0),
            };
            (dimension, stats)
        })
        .collect();

    let mut grade_distribution = BTreeMap::new();
    for r in results {
        *grade_distribution.entry(r.grade).or_insert(0) += 1;
    }

    // Ties keep the order in which suggestions first appeared.
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SuggestionCount> = Vec::new();
    for suggestion in results.iter().flat_map(|r| &r.score.suggestions) {
        match first_seen.get(suggestion.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                first_seen.insert(suggestion.as_str(), counts.len());
                counts.push(SuggestionCount {
                    suggestion: suggestion.clone(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    AggregateStats {
        count,
        mean_total,
        dimensions,
        grade_distribution,
        suggestion_frequencies: counts,
        overtime_count: results.iter().filter(|r| r.overtime).count(),
    }
}
