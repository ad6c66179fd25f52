//! Template-based prompt prediction.
//!
//! Combines a current-affairs trend with a subject context drawn from the
//! faculty and department names, then slots both into one of a handful of
//! exam-style templates.

use chrono::Utc;

use crate::model::{GeneratedPrompt, DEFAULT_TIME_LIMIT_MINUTES};
use crate::traits::{PromptGenerator, PromptRequest};

/// Current-affairs keywords a predicted prompt may revolve around.
pub const TRENDS: &[&str] = &[
    "デジタル化",
    "AI・人工知能",
    "持続可能性",
    "グローバル化",
    "多様性と包摂",
    "少子高齢化",
    "環境問題",
    "働き方改革",
    "コロナ後の社会",
    "イノベーション",
];

/// Subject keywords and the contexts they contribute, in lookup order.
pub const SUBJECT_CONTEXTS: &[(&str, [&str; 5])] = &[
    ("政治", ["民主主義", "政策", "国際関係", "社会制度", "公共政策"]),
    ("経済", ["経済成長", "市場", "金融", "グローバル経済", "産業構造"]),
    ("法", ["法の支配", "人権", "司法制度", "国際法", "社会規範"]),
    ("文学", ["表現", "文化", "コミュニケーション", "芸術", "言語"]),
    ("教育", ["学習", "人材育成", "教育制度", "知識社会", "生涯学習"]),
    ("医学", ["健康", "医療技術", "予防医学", "高齢化", "医療倫理"]),
    ("工学", ["技術革新", "ものづくり", "環境技術", "インフラ", "デザイン"]),
    ("理学", ["科学技術", "研究", "発見", "自然科学", "データサイエンス"]),
];

/// Contexts used when no subject keyword matches.
pub const FALLBACK_CONTEXTS: &[&str] = &["社会", "現代", "課題", "解決策", "将来"];

type Template = fn(&str, &str) -> String;

const TEMPLATES: &[Template] = &[
    |trend, context| {
        format!("{trend}が進む現代において、{context}はどのような課題に直面し、どのような解決策が考えられるか、具体例を挙げて論じなさい。")
    },
    |trend, context| {
        format!("{trend}の発展が{context}に与える影響について、メリットとデメリットを比較検討し、今後の在り方を論じなさい。")
    },
    |trend, context| {
        format!("現代社会における{trend}の重要性を踏まえ、{context}の分野でどのような革新が必要か、あなたの考えを述べなさい。")
    },
    |trend, context| {
        format!("{trend}を背景とした社会変化の中で、{context}が果たすべき役割と課題について論じなさい。")
    },
    |trend, context| {
        format!("{trend}と{context}の関係性を分析し、持続可能な社会の実現に向けた提言を行いなさい。")
    },
];

/// Contexts relevant to a faculty/department pair.
///
/// Every subject keyword contained in either name contributes its contexts.
pub fn relevant_contexts(faculty: &str, department: &str) -> Vec<&'static str> {
    let contexts: Vec<&'static str> = SUBJECT_CONTEXTS
        .iter()
        .filter(|(subject, _)| faculty.contains(subject) || department.contains(subject))
        .flat_map(|(_, values)| values.iter().copied())
        .collect();

    if contexts.is_empty() {
        FALLBACK_CONTEXTS.to_vec()
    } else {
        contexts
    }
}

/// Predicts prompts by filling fixed templates with random keywords.
#[derive(Debug, Clone, Copy)]
pub struct TemplatePromptGenerator {
    /// Time limit used when no historical prompt is available.
    pub default_time_limit_minutes: u32,
}

impl Default for TemplatePromptGenerator {
    fn default() -> Self {
        Self {
            default_time_limit_minutes: DEFAULT_TIME_LIMIT_MINUTES,
        }
    }
}

impl PromptGenerator for TemplatePromptGenerator {
    fn generate(&self, request: &PromptRequest, rng: &mut fastrand::Rng) -> GeneratedPrompt {
        // A zero limit on the newest prompt counts as missing.
        let time_limit_minutes = request
            .past_prompts
            .first()
            .map(|p| p.time_limit_minutes)
            .filter(|&minutes| minutes > 0)
            .unwrap_or(self.default_time_limit_minutes);

        let contexts = relevant_contexts(&request.faculty, &request.department);
        let trend = TRENDS[rng.usize(..TRENDS.len())];
        let context = contexts[rng.usize(..contexts.len())];
        let template = TEMPLATES[rng.usize(..TEMPLATES.len())];

        let generated_at = Utc::now();
        tracing::debug!(trend, context, "generated prompt");

        GeneratedPrompt {
            id: format!("predicted-{}", generated_at.timestamp_millis()),
            theme: template(trend, context),
            time_limit_minutes,
            generated_at,
            based_on: request.past_prompts.iter().map(|p| p.id.clone()).collect(),
            university: request.university.clone(),
            faculty: request.faculty.clone(),
            department: request.department.clone(),
        }
    }
}
