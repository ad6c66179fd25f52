//! The `ronbun score` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use ronbun_core::features::FeatureSet;
use ronbun_core::scorer::score_features;
use ronbun_core::{Dimension, EssayScore};

#[derive(Serialize)]
struct ScoreOutput<'a> {
    #[serde(flatten)]
    score: &'a EssayScore,
    grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<&'a FeatureSet<'a>>,
}

pub fn execute(
    file: Option<PathBuf>,
    theme: String,
    format: String,
    show_features: bool,
) -> Result<()> {
    let content = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read essay: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read essay from stdin")?;
            buf
        }
    };

    let features = FeatureSet::extract(&content, &theme);
    let score = score_features(&features);

    match format.as_str() {
        "json" => {
            let output = ScoreOutput {
                score: &score,
                grade: score.grade().to_string(),
                features: show_features.then_some(&features),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "text" => {
            print_text(&score);
            if show_features {
                print_features(&features);
            }
        }
        other => anyhow::bail!("unknown format '{other}' (expected json or text)"),
    }

    Ok(())
}

fn print_text(score: &EssayScore) {
    println!("Total: {} / 100 ({})", score.total, score.grade());
    for dimension in Dimension::ALL {
        println!(
            "  {} ({dimension}): {} / {}",
            dimension.label(),
            score.dimension(dimension),
            dimension.max()
        );
    }

    println!("\nFeedback:");
    println!("  {}", score.feedback);

    if !score.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &score.suggestions {
            println!("  - {suggestion}");
        }
    }
}

fn print_features(features: &FeatureSet<'_>) {
    println!("\nFeatures:");
    println!("  characters:         {}", features.character_count);
    println!("  paragraphs:         {}", features.paragraph_count());
    println!("  introduction:       {}", features.has_intro_phrase);
    println!("  conclusion:         {}", features.has_conclusion_phrase);
    println!("  example:            {}", features.has_example_phrase);
    println!("  numeric data:       {}", features.has_numeric_data);
    println!("  counter-argument:   {}", features.has_counter_argument);
    println!("  logical connectors: {}", features.logical_connector_count);
    println!("  repetitions:        {}", features.repetition_count);
    println!("  long sentences:     {}", features.long_sentence_count);
    println!("  mentions theme:     {}", features.mentions_theme_prefix);
}
