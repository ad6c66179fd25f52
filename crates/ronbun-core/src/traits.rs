//! Core trait definitions for essay scorers and prompt generators.
//!
//! The batch engine works against `EssayScorer` so alternative scorers can be
//! swapped in; `PromptGenerator` keeps randomness at the caller's side.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{EssayScore, GeneratedPrompt, PastPrompt};
use crate::scorer::score_essay;

// ---------------------------------------------------------------------------
// Essay scorer trait
// ---------------------------------------------------------------------------

/// Trait for backends that score a written essay against its theme.
#[async_trait]
pub trait EssayScorer: Send + Sync {
    /// Human-readable scorer name (e.g. "rubric").
    fn name(&self) -> &str;

    /// Score `content` written against `theme`.
    async fn score(&self, content: &str, theme: &str) -> anyhow::Result<EssayScore>;
}

/// The built-in rule-based scorer.
///
/// Scoring never blocks or fails, so the async wrapper exists only for
/// callers that drive scoring from an async context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubricScorer;

#[async_trait]
impl EssayScorer for RubricScorer {
    fn name(&self) -> &str {
        "rubric"
    }

    async fn score(&self, content: &str, theme: &str) -> anyhow::Result<EssayScore> {
        Ok(score_essay(content, theme))
    }
}

// ---------------------------------------------------------------------------
// Prompt generator trait
// ---------------------------------------------------------------------------

/// Inputs for predicting a new prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Historical prompts for the target department, newest first.
    pub past_prompts: Vec<PastPrompt>,
    pub university: String,
    pub faculty: String,
    pub department: String,
}

/// Trait for predicting a prompt from historical prompts.
///
/// Implementations draw all randomness from `rng` so that a seeded
/// generator reproduces the same theme.
pub trait PromptGenerator: Send + Sync {
    fn generate(&self, request: &PromptRequest, rng: &mut fastrand::Rng) -> GeneratedPrompt;
}
