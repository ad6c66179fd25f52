//! The `ronbun predict` command.

use std::path::PathBuf;

use anyhow::Result;

use ronbun_core::config::load_config_from;
use ronbun_core::prompt::TemplatePromptGenerator;
use ronbun_core::traits::{PromptGenerator, PromptRequest};

pub fn execute(
    university: String,
    faculty: String,
    department: String,
    catalog_path: Option<PathBuf>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let catalog = super::load_catalog(catalog_path, &config)?;

    let (uni, fac, dept) = catalog.find_department(&university, &faculty, &department)?;
    if !(fac.has_ao && dept.has_ao) {
        tracing::warn!(
            "{} / {} / {} does not run AO admissions; `ronbun search` lists those that do",
            uni.name,
            fac.name,
            dept.name
        );
    }

    let request = PromptRequest {
        past_prompts: dept.past_prompts.clone(),
        university: uni.name.clone(),
        faculty: fac.name.clone(),
        department: dept.name.clone(),
    };

    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let generator = TemplatePromptGenerator {
        default_time_limit_minutes: config.default_time_limit_minutes,
    };
    let prompt = generator.generate(&request, &mut rng);

    tracing::debug!(
        past_prompts = request.past_prompts.len(),
        "predicted prompt for {} / {} / {}",
        uni.name,
        fac.name,
        dept.name
    );

    println!("{}", serde_json::to_string_pretty(&prompt)?);
    Ok(())
}
