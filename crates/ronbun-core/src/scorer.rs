//! Essay scoring: extract features, apply the rubric, synthesize feedback.

use crate::features::FeatureSet;
use crate::feedback::{length_outcome, FeedbackCollector};
use crate::model::EssayScore;
use crate::rubric::{Tally, RUBRIC};

/// Score an essay against the fixed rubric.
///
/// Total over every input: an empty essay still yields a well-formed score
/// at the floor values along with the suggestions its unmet rules produce.
/// Identical `(content, theme)` pairs always produce identical scores.
pub fn score_essay(content: &str, theme: &str) -> EssayScore {
    let features = FeatureSet::extract(content, theme);
    score_features(&features)
}

/// Score pre-extracted features.
pub fn score_features(features: &FeatureSet<'_>) -> EssayScore {
    let mut collector = FeedbackCollector::new();
    let mut tally = Tally::default();

    if let Some(outcome) = length_outcome(features) {
        collector.record(outcome);
    }

    for rule in RUBRIC {
        let outcome = rule.evaluate(features);
        for &(dimension, points) in outcome.awards {
            tally.add(dimension, points);
        }
        collector.record(outcome);
    }

    let capped = tally.capped();
    let total = capped.total();
    tracing::debug!(
        characters = features.character_count,
        paragraphs = features.paragraph_count(),
        structure = capped.structure,
        content = capped.content,
        logic = capped.logic,
        expression = capped.expression,
        total,
        "scored essay"
    );

    let (feedback, suggestions) = collector.finish(total);

    EssayScore {
        total,
        structure: capped.structure,
        content: capped.content,
        logic: capped.logic,
        expression: capped.expression,
        feedback,
        suggestions,
    }
}
