//! The fixed scoring rubric.
//!
//! Every rule is an independent predicate over a [`FeatureSet`] with a fixed
//! outcome for each branch. Rules are evaluated in table order, and that
//! order is also the order in which feedback and suggestions are emitted.

use crate::features::FeatureSet;
use crate::model::Dimension;

/// Predicate a rubric rule checks.
pub type RuleCheck = fn(&FeatureSet<'_>) -> bool;

/// What a rule contributes when one of its branches fires.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    /// Points added per dimension (before capping).
    pub awards: &'static [(Dimension, u32)],
    pub feedback: Option<&'static str>,
    pub suggestion: Option<&'static str>,
}

impl Outcome {
    pub const NOTHING: Outcome = Outcome {
        awards: &[],
        feedback: None,
        suggestion: None,
    };
}

/// A single rubric rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable identifier, used in logs.
    pub id: &'static str,
    pub check: RuleCheck,
    /// Outcome when `check` holds.
    pub met: Outcome,
    /// Outcome when `check` does not hold.
    pub unmet: Outcome,
}

impl Rule {
    /// Evaluate the rule and return the branch that fired.
    pub fn evaluate(&self, features: &FeatureSet<'_>) -> &Outcome {
        if (self.check)(features) {
            &self.met
        } else {
            &self.unmet
        }
    }
}

/// The rubric, in evaluation order.
pub const RUBRIC: &[Rule] = &[
    Rule {
        id: "paragraphs",
        check: |f| f.paragraph_count() >= 3,
        met: Outcome {
            awards: &[(Dimension::Structure, 15)],
            feedback: Some("適切な段落構成が確認できます。"),
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[(Dimension::Structure, 5)],
            feedback: Some(
                "段落構成を改善する必要があります。序論・本論・結論の構成を意識してください。",
            ),
            suggestion: Some(
                "序論で問題提起、本論で論証、結論でまとめという構成を心がけてください。",
            ),
        },
    },
    Rule {
        id: "introduction",
        check: |f| f.has_intro_phrase,
        met: Outcome {
            awards: &[(Dimension::Structure, 5)],
            feedback: None,
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[],
            feedback: None,
            suggestion: Some("序論で明確な問題提起を行ってください。"),
        },
    },
    Rule {
        id: "conclusion",
        check: |f| f.has_conclusion_phrase,
        met: Outcome {
            awards: &[(Dimension::Structure, 5)],
            feedback: None,
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[],
            feedback: None,
            suggestion: Some("結論部分で自分の主張を明確にまとめてください。"),
        },
    },
    Rule {
        id: "examples",
        check: |f| f.has_example_phrase,
        met: Outcome {
            awards: &[(Dimension::Content, 10)],
            feedback: Some("具体例が適切に使用されています。"),
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[],
            feedback: None,
            suggestion: Some("具体例を挙げて論証を強化してください。"),
        },
    },
    Rule {
        id: "numeric-data",
        check: |f| f.has_numeric_data,
        met: Outcome {
            awards: &[(Dimension::Content, 10)],
            feedback: Some("データや数値を用いた客観的な論証が見られます。"),
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[],
            feedback: None,
            suggestion: Some("可能であれば、統計データや数値を用いて論証を補強してください。"),
        },
    },
    Rule {
        id: "counter-argument",
        check: |f| f.has_counter_argument,
        met: Outcome {
            awards: &[(Dimension::Content, 5), (Dimension::Logic, 10)],
            feedback: Some("反対意見への言及が見られ、多角的な視点が示されています。"),
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[],
            feedback: None,
            suggestion: Some("反対意見にも触れ、より多角的な論述を心がけてください。"),
        },
    },
    Rule {
        id: "logical-connectors",
        check: |f| f.logical_connector_count >= 2,
        met: Outcome {
            awards: &[(Dimension::Logic, 15)],
            feedback: Some("論理的な接続詞が適切に使用されています。"),
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[(Dimension::Logic, 5)],
            feedback: None,
            suggestion: Some(
                "「そのため」「なぜなら」などの接続詞を使って論理的な流れを明確にしてください。",
            ),
        },
    },
    Rule {
        id: "repetition",
        check: |f| f.repetition_count > 2,
        met: Outcome {
            awards: &[(Dimension::Expression, 5)],
            feedback: Some("表現に重複が見られます。より多様な表現を心がけてください。"),
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[(Dimension::Expression, 15)],
            feedback: None,
            suggestion: None,
        },
    },
    Rule {
        id: "sentence-length",
        check: |f| f.long_sentence_count > 0,
        met: Outcome {
            awards: &[(Dimension::Expression, 10)],
            feedback: Some("文章の長さが適切で読みやすい構成です。"),
            suggestion: None,
        },
        unmet: Outcome {
            awards: &[],
            feedback: None,
            suggestion: Some("文章の長さを調整し、読みやすさを向上させてください。"),
        },
    },
    Rule {
        id: "target-length",
        check: |f| (400..=800).contains(&f.character_count),
        met: Outcome {
            awards: &[(Dimension::Content, 5)],
            feedback: None,
            suggestion: None,
        },
        unmet: Outcome::NOTHING,
    },
    Rule {
        id: "extra-paragraphs",
        check: |f| f.paragraph_count() >= 4,
        met: Outcome {
            awards: &[(Dimension::Structure, 5)],
            feedback: None,
            suggestion: None,
        },
        unmet: Outcome::NOTHING,
    },
    Rule {
        id: "theme-relevance",
        check: |f| f.mentions_theme_prefix,
        met: Outcome {
            awards: &[(Dimension::Content, 5)],
            feedback: None,
            suggestion: None,
        },
        unmet: Outcome::NOTHING,
    },
];

/// Raw (uncapped) points accumulated per dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub structure: u32,
    pub content: u32,
    pub logic: u32,
    pub expression: u32,
}

impl Tally {
    pub fn add(&mut self, dimension: Dimension, points: u32) {
        let slot = match dimension {
            Dimension::Structure => &mut self.structure,
            Dimension::Content => &mut self.content,
            Dimension::Logic => &mut self.logic,
            Dimension::Expression => &mut self.expression,
        };
        *slot += points;
    }

    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Structure => self.structure,
            Dimension::Content => self.content,
            Dimension::Logic => self.logic,
            Dimension::Expression => self.expression,
        }
    }

    /// Clamp every dimension to its maximum.
    pub fn capped(self) -> Self {
        Self {
            structure: self.structure.min(Dimension::Structure.max()),
            content: self.content.min(Dimension::Content.max()),
            logic: self.logic.min(Dimension::Logic.max()),
            expression: self.expression.min(Dimension::Expression.max()),
        }
    }

    pub fn total(&self) -> u32 {
        self.structure + self.content + self.logic + self.expression
    }
}
