//! Batch scoring engine.
//!
//! Scores every essay of an essay set concurrently and assembles a
//! `ScoreReport`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::features::character_count;
use crate::model::{Essay, EssayScore, EssaySet, Grade};
use crate::report::{EssaySetSummary, ScoreReport};
use crate::statistics::compute_aggregate_stats;
use crate::traits::EssayScorer;

/// Configuration for the scoring engine.
#[derive(Debug, Clone)]
pub struct ScoringEngineConfig {
    /// Maximum essays scored at once.
    pub parallelism: usize,
}

impl Default for ScoringEngineConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// The scored outcome of a single essay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayResult {
    pub essay_id: String,
    pub theme: String,
    /// Non-whitespace characters in the essay body.
    pub character_count: usize,
    pub time_spent_secs: u64,
    pub time_limit_minutes: u32,
    /// Whether the writer went past the time limit.
    pub overtime: bool,
    pub score: EssayScore,
    pub grade: Grade,
}

impl EssayResult {
    fn new(essay: &Essay, score: EssayScore) -> Self {
        Self {
            essay_id: essay.id.clone(),
            theme: essay.theme.clone(),
            character_count: character_count(&essay.content),
            time_spent_secs: essay.time_spent_secs,
            time_limit_minutes: essay.time_limit_minutes,
            overtime: essay.is_overtime(),
            grade: score.grade(),
            score,
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_essay_start(&self, essay_id: &str);
    fn on_essay_complete(&self, result: &EssayResult);
    fn on_essay_error(&self, essay_id: &str, error: &str);
    fn on_set_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_essay_start(&self, _: &str) {}
    fn on_essay_complete(&self, _: &EssayResult) {}
    fn on_essay_error(&self, _: &str, _: &str) {}
    fn on_set_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Scores essay sets with a shared scorer.
pub struct ScoringEngine {
    scorer: Arc<dyn EssayScorer>,
    config: ScoringEngineConfig,
}

impl ScoringEngine {
    pub fn new(scorer: Arc<dyn EssayScorer>, config: ScoringEngineConfig) -> Self {
        Self { scorer, config }
    }

    /// Score every essay in `essay_set`.
    ///
    /// Results keep the order of the essays in the set. Essays whose scoring
    /// fails are reported through `progress` and left out of the report.
    pub async fn run(
        &self,
        essay_set: &EssaySet,
        progress: &dyn ProgressReporter,
    ) -> Result<ScoreReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Semaphore::new(self.config.parallelism.max(1));

        tracing::info!(
            essay_set = %essay_set.id,
            essays = essay_set.essays.len(),
            scorer = self.scorer.name(),
            "starting batch"
        );

        let mut futures = FuturesUnordered::new();
        for (index, essay) in essay_set.essays.iter().enumerate() {
            let scorer = Arc::clone(&self.scorer);
            let semaphore = &semaphore;

            futures.push(async move {
                let outcome = async {
                    let _permit = semaphore
                        .acquire()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_essay_start(&essay.id);
                    scorer.score(&essay.content, &essay.theme).await
                }
                .await;
                (index, essay, outcome)
            });
        }

        let total = futures.len();
        let mut scored = Vec::with_capacity(total);
        let mut failed = 0usize;

        while let Some((index, essay, outcome)) = futures.next().await {
            match outcome {
                Ok(score) => {
                    let result = EssayResult::new(essay, score);
                    progress.on_essay_complete(&result);
                    scored.push((index, result));
                }
                Err(e) => {
                    tracing::error!("scoring failed for {}: {e:#}", essay.id);
                    progress.on_essay_error(&essay.id, &format!("{e:#}"));
                    failed += 1;
                }
            }
        }

        scored.sort_by_key(|(index, _)| *index);
        let results: Vec<EssayResult> = scored.into_iter().map(|(_, r)| r).collect();

        let elapsed = start.elapsed();
        progress.on_set_complete(total, results.len(), failed, elapsed);
        tracing::info!(
            completed = results.len(),
            failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "batch finished"
        );

        let aggregate = compute_aggregate_stats(&results);

        Ok(ScoreReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            essay_set: EssaySetSummary {
                id: essay_set.id.clone(),
                name: essay_set.name.clone(),
                essay_count: essay_set.essays.len(),
            },
            scorer: self.scorer.name().to_string(),
            results,
            aggregate,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}
