//! TOML catalog and essay-set parser.
//!
//! Loads prompt catalogs and essay sets from TOML files and directories,
//! and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::model::{
    default_time_limit, Catalog, Department, Essay, EssaySet, Faculty, PastPrompt, University,
};

// ---------------------------------------------------------------------------
// Intermediate TOML structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    catalog: TomlCatalogHeader,
    #[serde(default)]
    universities: Vec<TomlUniversity>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogHeader {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlUniversity {
    id: String,
    name: String,
    #[serde(default)]
    faculties: Vec<TomlFaculty>,
}

#[derive(Debug, Deserialize)]
struct TomlFaculty {
    id: String,
    name: String,
    #[serde(default)]
    has_ao: bool,
    #[serde(default)]
    departments: Vec<TomlDepartment>,
}

#[derive(Debug, Deserialize)]
struct TomlDepartment {
    id: String,
    name: String,
    #[serde(default)]
    has_ao: bool,
    #[serde(default)]
    past_prompts: Vec<TomlPastPrompt>,
}

#[derive(Debug, Deserialize)]
struct TomlPastPrompt {
    id: String,
    year: u16,
    theme: String,
    #[serde(default = "default_time_limit")]
    time_limit_minutes: u32,
}

#[derive(Debug, Deserialize)]
struct TomlEssayFile {
    essay_set: TomlEssaySetHeader,
    #[serde(default)]
    essays: Vec<TomlEssay>,
}

#[derive(Debug, Deserialize)]
struct TomlEssaySetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_time_limit")]
    default_time_limit_minutes: u32,
}

#[derive(Debug, Deserialize)]
struct TomlEssay {
    id: String,
    theme: String,
    content: String,
    #[serde(default)]
    time_spent_secs: u64,
    #[serde(default)]
    time_limit_minutes: Option<u32>,
}

fn parse_toml<T: DeserializeOwned>(content: &str, source_path: &Path) -> Result<T> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file: {}", path.display()))
}

/// Recursively collect `.toml` files under `dir`, parsing each with `parse`.
/// Files that fail to parse are skipped with a warning.
fn load_directory<T>(dir: &Path, parse: &dyn Fn(&Path) -> Result<T>) -> Result<Vec<T>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut items = Vec::new();
    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            items.extend(load_directory(&path, parse)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse(&path) {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(items)
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = read_file(path, "catalog")?;
    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
///
/// Each historical prompt inherits the university, faculty, and department
/// names of the tables it is nested under.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = parse_toml(content, source_path)?;

    let universities = parsed
        .universities
        .into_iter()
        .map(|u| {
            let faculties = u
                .faculties
                .into_iter()
                .map(|f| {
                    let departments = f
                        .departments
                        .into_iter()
                        .map(|d| {
                            let past_prompts = d
                                .past_prompts
                                .into_iter()
                                .map(|p| PastPrompt {
                                    id: p.id,
                                    year: p.year,
                                    theme: p.theme,
                                    time_limit_minutes: p.time_limit_minutes,
                                    university: u.name.clone(),
                                    faculty: f.name.clone(),
                                    department: d.name.clone(),
                                })
                                .collect();
                            Department {
                                id: d.id,
                                name: d.name,
                                has_ao: d.has_ao,
                                past_prompts,
                            }
                        })
                        .collect();
                    Faculty {
                        id: f.id,
                        name: f.name,
                        has_ao: f.has_ao,
                        departments,
                    }
                })
                .collect();
            University {
                id: u.id,
                name: u.name,
                faculties,
            }
        })
        .collect();

    Ok(Catalog {
        id: parsed.catalog.id,
        name: parsed.catalog.name,
        universities,
    })
}

/// Recursively load all `.toml` catalog files from a directory.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<Catalog>> {
    load_directory(dir, &parse_catalog)
}

/// Load a catalog file, or merge every catalog found under a directory.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.is_dir() {
        return parse_catalog(path);
    }

    let catalogs = load_catalog_directory(path)?;
    anyhow::ensure!(
        !catalogs.is_empty(),
        "no catalog files found in {}",
        path.display()
    );

    let mut merged = Catalog {
        id: catalogs
            .iter()
            .map(|c| c.id.as_str())
            .collect::<Vec<_>>()
            .join("+"),
        name: path.display().to_string(),
        universities: Vec::new(),
    };
    for catalog in catalogs {
        merged.universities.extend(catalog.universities);
    }
    Ok(merged)
}

/// A warning from catalog or essay-set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The entry the warning refers to (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common issues.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_universities = HashSet::new();
    for uni in &catalog.universities {
        if !seen_universities.insert(&uni.id) {
            warnings.push(ValidationWarning {
                item_id: Some(uni.id.clone()),
                message: format!("duplicate university ID: {}", uni.id),
            });
        }
    }

    let mut seen_prompts = HashSet::new();
    for prompt in catalog.past_prompts() {
        if !seen_prompts.insert(&prompt.id) {
            warnings.push(ValidationWarning {
                item_id: Some(prompt.id.clone()),
                message: format!("duplicate prompt ID: {}", prompt.id),
            });
        }
        if prompt.theme.trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(prompt.id.clone()),
                message: "theme is empty".into(),
            });
        }
        if prompt.time_limit_minutes == 0 {
            warnings.push(ValidationWarning {
                item_id: Some(prompt.id.clone()),
                message: "time limit is zero".into(),
            });
        }
    }

    for uni in &catalog.universities {
        for fac in &uni.faculties {
            for dept in &fac.departments {
                if dept.past_prompts.is_empty() {
                    warnings.push(ValidationWarning {
                        item_id: Some(dept.id.clone()),
                        message: format!(
                            "{} / {} / {} has no past prompts; predictions use the configured default time limit",
                            uni.name, fac.name, dept.name
                        ),
                    });
                }
            }
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Essay sets
// ---------------------------------------------------------------------------

/// Parse a single TOML file into an `EssaySet`.
pub fn parse_essay_set(path: &Path) -> Result<EssaySet> {
    let content = read_file(path, "essay set")?;
    parse_essay_set_str(&content, path)
}

/// Parse a TOML string into an `EssaySet` (useful for testing).
pub fn parse_essay_set_str(content: &str, source_path: &Path) -> Result<EssaySet> {
    let parsed: TomlEssayFile = parse_toml(content, source_path)?;
    let default_limit = parsed.essay_set.default_time_limit_minutes;

    let essays = parsed
        .essays
        .into_iter()
        .map(|e| Essay {
            id: e.id,
            theme: e.theme,
            content: e.content,
            time_spent_secs: e.time_spent_secs,
            time_limit_minutes: e.time_limit_minutes.unwrap_or(default_limit),
        })
        .collect();

    Ok(EssaySet {
        id: parsed.essay_set.id,
        name: parsed.essay_set.name,
        description: parsed.essay_set.description,
        essays,
    })
}

/// Recursively load all `.toml` essay-set files from a directory.
pub fn load_essay_directory(dir: &Path) -> Result<Vec<EssaySet>> {
    load_directory(dir, &parse_essay_set)
}

/// Validate an essay set for common issues.
pub fn validate_essay_set(set: &EssaySet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for essay in &set.essays {
        if !seen_ids.insert(&essay.id) {
            warnings.push(ValidationWarning {
                item_id: Some(essay.id.clone()),
                message: format!("duplicate essay ID: {}", essay.id),
            });
        }
    }

    for essay in &set.essays {
        if essay.content.trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(essay.id.clone()),
                message: "content is empty".into(),
            });
        }
        if essay.theme.trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(essay.id.clone()),
                message: "theme is empty; every essay will count as on-theme".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::path::PathBuf;

    const VALID_CATALOG: &str = r#"
[catalog]
id = "test-catalog"
name = "Test Catalog"

[[universities]]
id = "waseda"
name = "早稲田大学"

[[universities.faculties]]
id = "political-science"
name = "政治経済学部"
has_ao = true

[[universities.faculties.departments]]
id = "politics"
name = "政治学科"
has_ao = true

[[universities.faculties.departments.past_prompts]]
id = "waseda-pol-2023"
year = 2023
theme = "デジタル社会における民主主義の課題と可能性について、具体例を挙げて論じなさい。"
time_limit_minutes = 90

[[universities.faculties.departments.past_prompts]]
id = "waseda-pol-2022"
year = 2022
theme = "グローバル化が進む現代において、国家の役割はどのように変化すべきか論じなさい。"
"#;

    const VALID_ESSAYS: &str = r#"
[essay_set]
id = "week-1"
name = "Week 1"
default_time_limit_minutes = 60

[[essays]]
id = "essay-1"
theme = "環境問題について論じなさい。"
content = """
環境問題について考える。
例えば、
"""
time_spent_secs = 1800

[[essays]]
id = "essay-2"
theme = "教育について論じなさい。"
content = "教育は重要である。"
time_limit_minutes = 90
"#;

    #[test]
    fn parse_valid_catalog() {
        let catalog = parse_catalog_str(VALID_CATALOG, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(catalog.id, "test-catalog");
        assert_eq!(catalog.universities.len(), 1);
        let dept = &catalog.universities[0].faculties[0].departments[0];
        assert_eq!(dept.past_prompts.len(), 2);
        assert_eq!(dept.past_prompts[0].university, "早稲田大学");
        assert_eq!(dept.past_prompts[0].department, "政治学科");
        // Missing time limits default to 90 minutes.
        assert_eq!(dept.past_prompts[1].time_limit_minutes, 90);
    }

    #[test]
    fn find_department_by_id_or_name() {
        let catalog = parse_catalog_str(VALID_CATALOG, &PathBuf::from("test.toml")).unwrap();
        let (_, _, dept) = catalog
            .find_department("waseda", "政治経済学部", "politics")
            .unwrap();
        assert_eq!(dept.name, "政治学科");

        let err = catalog
            .find_department("早稲田大学", "political-science", "経済学科")
            .unwrap_err();
        assert_eq!(err.level(), "department");

        let err = catalog.find_department("keio", "x", "y").unwrap_err();
        assert_eq!(err, CatalogError::UnknownUniversity("keio".into()));
    }

    #[test]
    fn validate_catalog_flags_issues() {
        let toml = r#"
[catalog]
id = "dupes"
name = "Dupes"

[[universities]]
id = "u"
name = "U"

[[universities.faculties]]
id = "f"
name = "F"

[[universities.faculties.departments]]
id = "d1"
name = "D1"

[[universities.faculties.departments.past_prompts]]
id = "same"
year = 2023
theme = ""
time_limit_minutes = 0

[[universities.faculties.departments.past_prompts]]
id = "same"
year = 2022
theme = "テーマ"

[[universities.faculties.departments]]
id = "d2"
name = "D2"
"#;
        let catalog = parse_catalog_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_catalog(&catalog);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate prompt")));
        assert!(warnings.iter().any(|w| w.message == "theme is empty"));
        assert!(warnings.iter().any(|w| w.message == "time limit is zero"));
        let empty = warnings
            .iter()
            .find(|w| w.item_id.as_deref() == Some("d2"))
            .unwrap();
        assert!(empty.message.contains("no past prompts"));
        // The limit comes from config, so the warning must not name a number.
        assert!(empty.message.contains("configured default time limit"));
        assert!(!empty.message.contains("90"));
    }

    #[test]
    fn parse_essay_set_applies_default_limit() {
        let set = parse_essay_set_str(VALID_ESSAYS, &PathBuf::from("essays.toml")).unwrap();
        assert_eq!(set.id, "week-1");
        assert_eq!(set.essays.len(), 2);
        assert_eq!(set.essays[0].time_limit_minutes, 60);
        assert_eq!(set.essays[0].time_spent_secs, 1800);
        assert!(set.essays[0].content.contains("例えば"));
        assert_eq!(set.essays[1].time_limit_minutes, 90);
        assert!(validate_essay_set(&set).is_empty());
    }

    #[test]
    fn validate_essay_set_flags_issues() {
        let toml = r#"
[essay_set]
id = "bad"
name = "Bad"

[[essays]]
id = "x"
theme = ""
content = "  "

[[essays]]
id = "x"
theme = "テーマ"
content = "本文"
"#;
        let set = parse_essay_set_str(toml, &PathBuf::from("bad.toml")).unwrap();
        let warnings = validate_essay_set(&set);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message == "content is empty"));
        assert!(warnings.iter().any(|w| w.message.starts_with("theme is empty")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_catalog_str(bad, &PathBuf::from("bad.toml")).is_err());
        assert!(parse_essay_set_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("catalog.toml"), VALID_CATALOG).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [toml").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalogs = load_catalog_directory(dir.path()).unwrap();
        assert_eq!(catalogs.len(), 1);
        assert_eq!(catalogs[0].id, "test-catalog");

        let merged = load_catalog(dir.path()).unwrap();
        assert_eq!(merged.past_prompts().count(), 2);
    }

    #[test]
    fn load_essay_directory_recurses() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("week1.toml"), VALID_ESSAYS).unwrap();

        let sets = load_essay_directory(dir.path()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].essays.len(), 2);
    }
}
