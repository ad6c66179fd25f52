//! Core data model types for ronbun.
//!
//! These are the fundamental types that the entire ronbun system uses to
//! represent scores, rubric dimensions, the prompt catalog, and essays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// One of the four independently capped rubric dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Structure,
    Content,
    Logic,
    Expression,
}

impl Dimension {
    /// All dimensions in rubric order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Structure,
        Dimension::Content,
        Dimension::Logic,
        Dimension::Expression,
    ];

    /// Maximum points this dimension can contribute to the total.
    pub fn max(self) -> u32 {
        match self {
            Dimension::Structure => 25,
            Dimension::Content => 30,
            Dimension::Logic => 25,
            Dimension::Expression => 20,
        }
    }

    /// Label shown to students.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Structure => "構成",
            Dimension::Content => "内容",
            Dimension::Logic => "論理性",
            Dimension::Expression => "表現",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Structure => write!(f, "structure"),
            Dimension::Content => write!(f, "content"),
            Dimension::Logic => write!(f, "logic"),
            Dimension::Expression => write!(f, "expression"),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "structure" => Ok(Dimension::Structure),
            "content" => Ok(Dimension::Content),
            "logic" => Ok(Dimension::Logic),
            "expression" => Ok(Dimension::Expression),
            other => Err(format!("unknown dimension: {other}")),
        }
    }
}

/// The result of scoring one essay.
///
/// `total` always equals the sum of the four sub-scores, and each sub-score
/// lies within `0..=Dimension::max()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayScore {
    /// Sum of the four sub-scores (0–100).
    pub total: u32,
    /// Structure sub-score (0–25).
    pub structure: u32,
    /// Content sub-score (0–30).
    pub content: u32,
    /// Logic sub-score (0–25).
    pub logic: u32,
    /// Expression sub-score (0–20).
    pub expression: u32,
    /// Collected feedback sentences joined by a single space.
    pub feedback: String,
    /// Improvement suggestions in evaluation order.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl EssayScore {
    /// The sub-score for a single dimension.
    pub fn dimension(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Structure => self.structure,
            Dimension::Content => self.content,
            Dimension::Logic => self.logic,
            Dimension::Expression => self.expression,
        }
    }

    pub fn grade(&self) -> Grade {
        Grade::from_total(self.total)
    }
}

/// Letter grade derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_total(total: u32) -> Self {
        if total >= 90 {
            Grade::A
        } else if total >= 80 {
            Grade::B
        } else if total >= 70 {
            Grade::C
        } else if total >= 60 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// Display tier of a sub-score relative to its dimension maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    /// At least 80% of the maximum.
    High,
    /// At least 60% of the maximum.
    Middle,
    Low,
}

impl ScoreTier {
    pub fn classify(score: u32, max: u32) -> Self {
        if max == 0 {
            return ScoreTier::Low;
        }
        // Integer form of `score / max >= 0.8` and `>= 0.6`.
        if score * 5 >= max * 4 {
            ScoreTier::High
        } else if score * 5 >= max * 3 {
            ScoreTier::Middle
        } else {
            ScoreTier::Low
        }
    }

    pub fn for_dimension(score: &EssayScore, dimension: Dimension) -> Self {
        Self::classify(score.dimension(dimension), dimension.max())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Middle => "middle",
            ScoreTier::Low => "low",
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt catalog
// ---------------------------------------------------------------------------

/// A catalog of universities and their historical essay prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub universities: Vec<University>,
}

impl Catalog {
    /// Resolve a department by id or name at each level.
    pub fn find_department(
        &self,
        university: &str,
        faculty: &str,
        department: &str,
    ) -> Result<(&University, &Faculty, &Department), CatalogError> {
        let uni = self
            .universities
            .iter()
            .find(|u| u.id == university || u.name == university)
            .ok_or_else(|| CatalogError::UnknownUniversity(university.to_string()))?;

        let fac = uni
            .faculties
            .iter()
            .find(|f| f.id == faculty || f.name == faculty)
            .ok_or_else(|| CatalogError::UnknownFaculty {
                university: uni.name.clone(),
                faculty: faculty.to_string(),
            })?;

        let dept = fac
            .departments
            .iter()
            .find(|d| d.id == department || d.name == department)
            .ok_or_else(|| CatalogError::UnknownDepartment {
                university: uni.name.clone(),
                faculty: fac.name.clone(),
                department: department.to_string(),
            })?;

        Ok((uni, fac, dept))
    }

    /// Every historical prompt in the catalog.
    pub fn past_prompts(&self) -> impl Iterator<Item = &PastPrompt> {
        self.universities
            .iter()
            .flat_map(|u| &u.faculties)
            .flat_map(|f| &f.departments)
            .flat_map(|d| &d.past_prompts)
    }

    /// Departments open to AO admissions whose university, faculty, or
    /// department matches `query`.
    ///
    /// Matching is a case-insensitive substring test on names and ids. A
    /// match at the university or faculty level brings in every AO
    /// department beneath it. An empty query lists every AO department.
    pub fn search(&self, query: &str) -> Vec<CatalogEntry<'_>> {
        let query = query.trim().to_lowercase();
        let matches = |id: &str, name: &str| {
            id.to_lowercase().contains(&query) || name.to_lowercase().contains(&query)
        };

        let mut entries = Vec::new();
        for university in &self.universities {
            let university_hit = matches(&university.id, &university.name);
            for faculty in university.faculties.iter().filter(|f| f.has_ao) {
                let faculty_hit = university_hit || matches(&faculty.id, &faculty.name);
                entries.extend(
                    faculty
                        .departments
                        .iter()
                        .filter(|d| d.has_ao && (faculty_hit || matches(&d.id, &d.name)))
                        .map(|department| CatalogEntry {
                            university,
                            faculty,
                            department,
                        }),
                );
            }
        }
        entries
    }
}

/// A department together with the faculty and university it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry<'a> {
    pub university: &'a University,
    pub faculty: &'a Faculty,
    pub department: &'a Department,
}

/// A university and the faculties it admits students into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct University {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub faculties: Vec<Faculty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    pub id: String,
    pub name: String,
    /// Whether the faculty runs comprehensive-selection (AO) admissions.
    #[serde(default)]
    pub has_ao: bool,
    #[serde(default)]
    pub departments: Vec<Department>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub has_ao: bool,
    /// Historical essay prompts, newest first.
    #[serde(default)]
    pub past_prompts: Vec<PastPrompt>,
}

/// An essay prompt set in a previous entrance exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PastPrompt {
    pub id: String,
    pub year: u16,
    pub theme: String,
    pub time_limit_minutes: u32,
    pub university: String,
    pub faculty: String,
    pub department: String,
}

/// A prompt predicted from historical prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    pub id: String,
    pub theme: String,
    pub time_limit_minutes: u32,
    pub generated_at: DateTime<Utc>,
    /// Ids of the historical prompts this prediction was informed by.
    pub based_on: Vec<String>,
    pub university: String,
    pub faculty: String,
    pub department: String,
}

// ---------------------------------------------------------------------------
// Essays
// ---------------------------------------------------------------------------

/// A written essay submitted for scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Essay {
    pub id: String,
    /// The theme the essay was written against.
    pub theme: String,
    pub content: String,
    /// Seconds the student spent writing.
    #[serde(default)]
    pub time_spent_secs: u64,
    #[serde(default = "default_time_limit")]
    pub time_limit_minutes: u32,
}

impl Essay {
    /// Whether the essay was written past its time limit.
    pub fn is_overtime(&self) -> bool {
        self.time_spent_secs > u64::from(self.time_limit_minutes) * 60
    }
}

/// A collection of essays scored together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssaySet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub essays: Vec<Essay>,
}

/// Time limit used when no historical prompt supplies one.
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 90;

pub(crate) fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_display_and_parse() {
        assert_eq!(Dimension::Structure.to_string(), "structure");
        assert_eq!("Logic".parse::<Dimension>().unwrap(), Dimension::Logic);
        assert!("style".parse::<Dimension>().is_err());
    }

    #[test]
    fn dimension_maxima_sum_to_hundred() {
        let sum: u32 = Dimension::ALL.iter().map(|d| Dimension::max(*d)).sum();
        assert_eq!(sum, 100);
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_total(100), Grade::A);
        assert_eq!(Grade::from_total(90), Grade::A);
        assert_eq!(Grade::from_total(89), Grade::B);
        assert_eq!(Grade::from_total(80), Grade::B);
        assert_eq!(Grade::from_total(79), Grade::C);
        assert_eq!(Grade::from_total(70), Grade::C);
        assert_eq!(Grade::from_total(69), Grade::D);
        assert_eq!(Grade::from_total(60), Grade::D);
        assert_eq!(Grade::from_total(59), Grade::F);
        assert_eq!(Grade::from_total(0), Grade::F);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(ScoreTier::classify(20, 25), ScoreTier::High);
        assert_eq!(ScoreTier::classify(19, 25), ScoreTier::Middle);
        assert_eq!(ScoreTier::classify(15, 25), ScoreTier::Middle);
        assert_eq!(ScoreTier::classify(14, 25), ScoreTier::Low);
        assert_eq!(ScoreTier::classify(24, 30), ScoreTier::High);
        assert_eq!(ScoreTier::classify(18, 30), ScoreTier::Middle);
        assert_eq!(ScoreTier::classify(0, 0), ScoreTier::Low);
    }

    fn department(id: &str, name: &str, has_ao: bool) -> Department {
        Department {
            id: id.into(),
            name: name.into(),
            has_ao,
            past_prompts: vec![],
        }
    }

    fn search_catalog() -> Catalog {
        Catalog {
            id: "c".into(),
            name: "C".into(),
            universities: vec![
                University {
                    id: "waseda".into(),
                    name: "早稲田大学".into(),
                    faculties: vec![
                        Faculty {
                            id: "political-science".into(),
                            name: "政治経済学部".into(),
                            has_ao: true,
                            departments: vec![
                                department("politics", "政治学科", true),
                                department("economics", "経済学科", false),
                            ],
                        },
                        Faculty {
                            id: "commerce".into(),
                            name: "商学部".into(),
                            has_ao: false,
                            departments: vec![department("commerce", "商学科", true)],
                        },
                    ],
                },
                University {
                    id: "keio".into(),
                    name: "慶應義塾大学".into(),
                    faculties: vec![Faculty {
                        id: "economics".into(),
                        name: "経済学部".into(),
                        has_ao: true,
                        departments: vec![department("economics", "経済学科", true)],
                    }],
                },
            ],
        }
    }

    fn paths(entries: &[CatalogEntry<'_>]) -> Vec<String> {
        entries
            .iter()
            .map(|e| format!("{}/{}/{}", e.university.id, e.faculty.id, e.department.id))
            .collect()
    }

    #[test]
    fn search_by_university_keeps_only_ao_entries() {
        let catalog = search_catalog();
        assert_eq!(
            paths(&catalog.search("早稲田")),
            vec!["waseda/political-science/politics"]
        );
    }

    #[test]
    fn search_matches_faculty_and_department_names() {
        let catalog = search_catalog();
        // 政治経済学部 contains 経済学部, so its AO department matches as well.
        assert_eq!(
            paths(&catalog.search("経済学部")),
            vec!["waseda/political-science/politics", "keio/economics/economics"]
        );
        // The non-AO department at waseda never shows up.
        assert_eq!(paths(&catalog.search("経済学科")), vec!["keio/economics/economics"]);
        // Departments under a non-AO faculty are hidden too.
        assert!(catalog.search("商学").is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_empty_lists_everything() {
        let catalog = search_catalog();
        assert_eq!(paths(&catalog.search("KEIO")), vec!["keio/economics/economics"]);
        assert_eq!(catalog.search("").len(), 2);
        assert_eq!(catalog.search("  ").len(), 2);
        assert!(catalog.search("東京大学").is_empty());
    }

    #[test]
    fn essay_overtime() {
        let mut essay = Essay {
            id: "e1".into(),
            theme: String::new(),
            content: String::new(),
            time_spent_secs: 90 * 60,
            time_limit_minutes: 90,
        };
        assert!(!essay.is_overtime());
        essay.time_spent_secs += 1;
        assert!(essay.is_overtime());
    }

    #[test]
    fn essay_score_serde_roundtrip() {
        let score = EssayScore {
            total: 25,
            structure: 5,
            content: 0,
            logic: 5,
            expression: 15,
            feedback: "a b".into(),
            suggestions: vec!["x".into()],
        };
        let json = serde_json::to_string(&score).unwrap();
        assert!(json.contains("\"total\":25"));
        let back: EssayScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, score);
        assert_eq!(back.dimension(Dimension::Expression), 15);
        assert_eq!(back.grade(), Grade::F);
    }
}
