//! Feedback synthesis.
//!
//! Collects the feedback sentences and suggestions produced while scoring,
//! and picks the closing sentence from the total-score band.

use serde::{Deserialize, Serialize};

use crate::features::FeatureSet;
use crate::rubric::Outcome;

/// Below this many characters the essay is flagged as too short.
pub const MIN_CHARACTERS: usize = 100;

/// Above this many characters the essay is flagged as too long.
pub const MAX_CHARACTERS: usize = 1200;

static TOO_SHORT: Outcome = Outcome {
    awards: &[],
    feedback: Some("文字数が不足しています。より詳細な論述が必要です。"),
    suggestion: Some("具体例や根拠を追加して、論述を充実させてください。"),
};

static TOO_LONG: Outcome = Outcome {
    awards: &[],
    feedback: Some("文字数が多すぎます。要点を絞って簡潔に論述してください。"),
    suggestion: Some("重要なポイントに焦点を当て、冗長な表現を削除してください。"),
};

/// Length notes, which come before any rubric feedback.
pub fn length_outcome(features: &FeatureSet<'_>) -> Option<&'static Outcome> {
    if features.character_count < MIN_CHARACTERS {
        Some(&TOO_SHORT)
    } else if features.character_count > MAX_CHARACTERS {
        Some(&TOO_LONG)
    } else {
        None
    }
}

/// Total-score band that selects the closing sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    Good,
    Adequate,
    NeedsImprovement,
}

impl Band {
    pub fn from_total(total: u32) -> Self {
        if total >= 90 {
            Band::Excellent
        } else if total >= 75 {
            Band::Good
        } else if total >= 60 {
            Band::Adequate
        } else {
            Band::NeedsImprovement
        }
    }

    pub fn closing_sentence(self) -> &'static str {
        match self {
            Band::Excellent => "非常に優秀な小論文です。論理構成、内容、表現ともに高いレベルです。",
            Band::Good => "良好な小論文です。いくつかの改善点はありますが、全体的に評価できます。",
            Band::Adequate => "基本的な要素は満たしていますが、さらなる改善が必要です。",
            Band::NeedsImprovement => "大幅な改善が必要です。構成と論証を見直してください。",
        }
    }
}

/// Accumulates feedback and suggestions in evaluation order.
#[derive(Debug, Default)]
pub struct FeedbackCollector {
    feedback: Vec<&'static str>,
    suggestions: Vec<&'static str>,
}

impl FeedbackCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &Outcome) {
        if let Some(feedback) = outcome.feedback {
            self.feedback.push(feedback);
        }
        if let Some(suggestion) = outcome.suggestion {
            self.suggestions.push(suggestion);
        }
    }

    /// Append the closing sentence for `total` and produce the final
    /// feedback string and suggestion list.
    pub fn finish(mut self, total: u32) -> (String, Vec<String>) {
        self.feedback.push(Band::from_total(total).closing_sentence());
        let feedback = self.feedback.join(" ");
        let suggestions = self.suggestions.into_iter().map(String::from).collect();
        (feedback, suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features_with_count(character_count: usize) -> FeatureSet<'static> {
        let mut features = FeatureSet::extract("", "");
        features.character_count = character_count;
        features
    }

    #[test]
    fn length_boundaries_are_strict() {
        assert!(length_outcome(&features_with_count(0)).is_some());
        assert!(length_outcome(&features_with_count(99)).is_some());
        assert!(length_outcome(&features_with_count(100)).is_none());
        assert!(length_outcome(&features_with_count(101)).is_none());
        assert!(length_outcome(&features_with_count(1199)).is_none());
        assert!(length_outcome(&features_with_count(1200)).is_none());
        let long = length_outcome(&features_with_count(1201)).unwrap();
        assert!(long.feedback.unwrap().contains("多すぎます"));
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(Band::from_total(100), Band::Excellent);
        assert_eq!(Band::from_total(90), Band::Excellent);
        assert_eq!(Band::from_total(89), Band::Good);
        assert_eq!(Band::from_total(75), Band::Good);
        assert_eq!(Band::from_total(74), Band::Adequate);
        assert_eq!(Band::from_total(60), Band::Adequate);
        assert_eq!(Band::from_total(59), Band::NeedsImprovement);
        assert_eq!(Band::from_total(0), Band::NeedsImprovement);
    }

    #[test]
    fn collector_joins_in_order() {
        let mut collector = FeedbackCollector::new();
        collector.record(&TOO_SHORT);
        collector.record(&Outcome {
            awards: &[],
            feedback: Some("二つ目。"),
            suggestion: None,
        });
        let (feedback, suggestions) = collector.finish(95);
        assert_eq!(
            feedback,
            format!(
                "{} 二つ目。 {}",
                TOO_SHORT.feedback.unwrap(),
                Band::Excellent.closing_sentence()
            )
        );
        assert_eq!(suggestions, vec![TOO_SHORT.suggestion.unwrap().to_string()]);
    }
}
