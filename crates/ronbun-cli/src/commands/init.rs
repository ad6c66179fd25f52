//! The `ronbun init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("ronbun.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("catalogs").context("failed to create catalogs/")?;
    write_if_missing(Path::new("catalogs/universities.toml"), SAMPLE_CATALOG)?;

    std::fs::create_dir_all("essays").context("failed to create essays/")?;
    write_if_missing(Path::new("essays/example.toml"), SAMPLE_ESSAYS)?;

    println!("\nNext steps:");
    println!("  1. Run: ronbun validate --catalog catalogs --essays essays");
    println!("  2. Run: ronbun search 早稲田");
    println!("  3. Run: ronbun predict --university waseda --faculty political-science --department politics");
    println!("  4. Write your essay in essays/example.toml");
    println!("  5. Run: ronbun batch --essays essays/example.toml --format all");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# ronbun configuration

# Catalog file or directory used by `ronbun predict` and `ronbun search`.
# ${VAR} references are expanded from the environment.
catalog = "catalogs"

parallelism = 4
output_dir = "./ronbun-results"
default_time_limit_minutes = 90
"#;

const SAMPLE_CATALOG: &str = r#"[catalog]
id = "starter"
name = "Starter catalog"

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
time_limit_minutes = 90
"#;

const SAMPLE_ESSAYS: &str = r#"[essay_set]
id = "example"
name = "Example essays"
description = "Replace the content with your own practice essays"
default_time_limit_minutes = 90

[[essays]]
id = "first-draft"
theme = "デジタル社会における民主主義の課題と可能性について、具体例を挙げて論じなさい。"
time_spent_secs = 3600
content = """
デジタル社会において、民主主義は新たな局面を迎えている。
例えば、SNSを通じた政治参加は若い世代にも広がった。
しかし、誤情報の拡散という課題もある。そのため、情報を見極める力が求められる。
以上のように、技術と制度の両面から考える必要がある。
"""
"#;
