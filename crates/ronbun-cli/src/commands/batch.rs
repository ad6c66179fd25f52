//! The `ronbun batch` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};

use ronbun_core::config::load_config_from;
use ronbun_core::engine::{EssayResult, ProgressReporter, ScoringEngine, ScoringEngineConfig};
use ronbun_core::parser;
use ronbun_core::report::ScoreReport;
use ronbun_core::traits::RubricScorer;
use ronbun_core::Dimension;
use ronbun_report::html::write_html_report;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_essay_start(&self, essay_id: &str) {
        eprintln!("  Scoring: {essay_id}");
    }

    fn on_essay_complete(&self, result: &EssayResult) {
        let overtime = if result.overtime { " OVERTIME" } else { "" };
        eprintln!(
            "  Done: {} {} / 100 ({}){overtime}",
            result.essay_id, result.score.total, result.grade
        );
    }

    fn on_essay_error(&self, essay_id: &str, error: &str) {
        eprintln!("  ERROR: {essay_id}: {error}");
    }

    fn on_set_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} scored, {failed} failed ({:.2}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Json,
    Html,
}

fn parse_formats(format: &str) -> Result<Vec<ReportFormat>> {
    if format == "all" {
        return Ok(vec![ReportFormat::Json, ReportFormat::Html]);
    }
    format
        .split(',')
        .map(|f| match f.trim() {
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            other => Err(anyhow::anyhow!(
                "unknown format '{other}' (expected json, html, or all)"
            )),
        })
        .collect()
}

pub async fn execute(
    essays_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = output.unwrap_or(config.output_dir);

    let formats = parse_formats(&format)?;

    let essay_sets = if essays_path.is_dir() {
        parser::load_essay_directory(&essays_path)?
    } else {
        vec![parser::parse_essay_set(&essays_path)?]
    };

    let engine = ScoringEngine::new(
        Arc::new(RubricScorer),
        ScoringEngineConfig { parallelism },
    );
    let reporter = ConsoleReporter;

    for essay_set in &essay_sets {
        eprintln!(
            "ronbun v{}: scoring {} essays from {}",
            env!("CARGO_PKG_VERSION"),
            essay_set.essays.len(),
            essay_set.name
        );
        eprintln!();

        let report = engine.run(essay_set, &reporter).await?;

        print_summary(&report);

        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let stem = format!("{}-{timestamp}", essay_set.id);

        for fmt in &formats {
            match fmt {
                ReportFormat::Json => {
                    let path = output.join(format!("{stem}.json"));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                ReportFormat::Html => {
                    let path = output.join(format!("{stem}.html"));
                    write_html_report(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn print_summary(report: &ScoreReport) {
    let mut table = Table::new();
    let mut header = vec!["Essay".to_string(), "Total".into(), "Grade".into()];
    header.extend(Dimension::ALL.iter().map(|d| d.label().to_string()));
    header.push("Time".into());
    table.set_header(header);

    for r in &report.results {
        let mut row = vec![
            Cell::new(&r.essay_id),
            Cell::new(r.score.total),
            Cell::new(r.grade),
        ];
        row.extend(
            Dimension::ALL
                .iter()
                .map(|&d| Cell::new(format!("{}/{}", r.score.dimension(d), d.max()))),
        );
        let minutes = r.time_spent_secs / 60;
        let time = if r.overtime {
            format!("{minutes}m (over {}m)", r.time_limit_minutes)
        } else {
            format!("{minutes}m")
        };
        row.push(Cell::new(time));
        table.add_row(row);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Mean total: {:.1} across {} essays",
        report.aggregate.mean_total, report.aggregate.count
    );
}
