//! ronbun-core: Rubric scoring engine, prompt generation, and reporting.
//!
//! This crate defines the essay data model, the surface-feature extractor,
//! the fixed scoring rubric, and the feedback synthesizer that the rest of
//! ronbun builds on.

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod feedback;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod report;
pub mod rubric;
pub mod scorer;
pub mod statistics;
pub mod traits;

pub use model::{Dimension, EssayScore, Grade, ScoreTier};
pub use scorer::score_essay;
