//! The `ronbun compare` command.

use std::path::PathBuf;

use anyhow::Result;

use ronbun_core::report::ScoreReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: u32,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = ScoreReport::load_json(&baseline_path)?;
    let current = ScoreReport::load_json(&current_path)?;

    let comparison = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", comparison.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                comparison.regressions.len(),
                comparison.improvements.len(),
                comparison.unchanged
            );
            println!(
                "Mean total: {:.1} -> {:.1}",
                comparison.baseline_mean, comparison.current_mean
            );

            if !comparison.regressions.is_empty() {
                println!("\nRegressions:");
                for r in &comparison.regressions {
                    println!(
                        "  {} {} -> {} ({:+})",
                        r.essay_id, r.baseline_total, r.current_total, r.delta
                    );
                }
            }

            if !comparison.improvements.is_empty() {
                println!("\nImprovements:");
                for i in &comparison.improvements {
                    println!(
                        "  {} {} -> {} ({:+})",
                        i.essay_id, i.baseline_total, i.current_total, i.delta
                    );
                }
            }

            if comparison.new_essays > 0 {
                println!("\n{} new essay(s)", comparison.new_essays);
            }
            if comparison.removed_essays > 0 {
                println!("{} removed essay(s)", comparison.removed_essays);
            }
        }
    }

    if fail_on_regression && comparison.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
