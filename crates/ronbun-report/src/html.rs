//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined. Sub-scores
//! are coloured by their tier relative to the dimension maximum.

use std::path::Path;

use anyhow::{Context, Result};

use ronbun_core::engine::EssayResult;
use ronbun_core::report::ScoreReport;
use ronbun_core::statistics::AggregateStats;
use ronbun_core::{Dimension, ScoreTier};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a score report.
pub fn generate_html(report: &ScoreReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>ronbun report: {}</title>\n",
        html_escape(&report.essay_set.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>ronbun report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Essay set: <strong>{}</strong> | {} essays | scorer: {} | {}</p>\n",
        html_escape(&report.essay_set.name),
        report.essay_set.essay_count,
        html_escape(&report.scorer),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&summary_table(&report.aggregate));
    if report.aggregate.count > 0 {
        html.push_str(&dimension_chart(&report.aggregate));
    }
    html.push_str(&top_suggestions(&report.aggregate));
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n<thead><tr>");
    let headers = ["Essay", "Grade", "Total"]
        .into_iter()
        .map(str::to_string)
        .chain(
            Dimension::ALL
                .iter()
                .map(|d| format!("{} /{}", d.label(), Dimension::max(*d))),
        )
        .chain(["Time".to_string()]);
    for (col, header) in headers.enumerate() {
        html.push_str(&format!(
            "<th onclick=\"sortTable({col})\">{}</th>",
            html_escape(&header)
        ));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for r in &report.results {
        html.push_str(&result_row(r));
    }
    html.push_str("</tbody></table>\n");

    for r in &report.results {
        html.push_str(&result_details(r));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ScoreReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn summary_table(stats: &AggregateStats) -> String {
    let grades = stats
        .grade_distribution
        .iter()
        .map(|(grade, n)| format!("{grade}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "<table class=\"summary\">\n\
         <thead><tr><th>Essays</th><th>Mean total</th><th>Grades</th><th>Overtime</th></tr></thead>\n\
         <tbody><tr><td>{}</td><td>{:.1}</td><td>{}</td><td>{}</td></tr></tbody></table>\n",
        stats.count,
        stats.mean_total,
        if grades.is_empty() { "-".to_string() } else { grades },
        stats.overtime_count
    )
}

/// Horizontal bars of the mean sub-score per dimension.
fn dimension_chart(stats: &AggregateStats) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 120;

    let total_height = Dimension::ALL.len() * (bar_height + padding) + padding;
    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        total_height
    );

    for (i, dimension) in Dimension::ALL.iter().enumerate() {
        let Some(dim_stats) = stats.dimensions.get(dimension) else {
            continue;
        };
        let y = i * (bar_height + padding) + padding;
        let ratio = dim_stats.mean / f64::from(Dimension::max(*dimension));
        let width = (ratio * max_width as f64) as usize;
        let tier = ScoreTier::classify(dim_stats.mean.round() as u32, Dimension::max(*dimension));

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            dimension.label()
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" class=\"bar-{}\" rx=\"4\"/>\n",
            label_width,
            y,
            width,
            bar_height,
            tier.as_str()
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1} / {}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            dim_stats.mean,
            Dimension::max(*dimension)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn top_suggestions(stats: &AggregateStats) -> String {
    if stats.suggestion_frequencies.is_empty() {
        return String::new();
    }
    let mut html = String::from("<h3>Most frequent suggestions</h3>\n<ol class=\"suggestions\">\n");
    for s in stats.suggestion_frequencies.iter().take(5) {
        html.push_str(&format!(
            "<li>{} <span class=\"count\">×{}</span></li>\n",
            html_escape(&s.suggestion),
            s.count
        ));
    }
    html.push_str("</ol>\n");
    html
}

fn result_row(r: &EssayResult) -> String {
    let mut row = format!(
        "<tr><td><a href=\"#essay-{id}\">{id}</a></td><td class=\"grade\">{}</td><td>{}</td>",
        r.grade,
        r.score.total,
        id = html_escape(&r.essay_id),
    );
    for dimension in Dimension::ALL {
        let tier = ScoreTier::for_dimension(&r.score, dimension);
        row.push_str(&format!(
            "<td class=\"tier-{}\">{}</td>",
            tier.as_str(),
            r.score.dimension(dimension)
        ));
    }
    let time_class = if r.overtime { " class=\"overtime\"" } else { "" };
    row.push_str(&format!(
        "<td{time_class}>{}:{:02} / {}:00</td></tr>\n",
        r.time_spent_secs / 60,
        r.time_spent_secs % 60,
        r.time_limit_minutes
    ));
    row
}

fn result_details(r: &EssayResult) -> String {
    let mut html = format!(
        "<details class=\"essay\" id=\"essay-{}\">\n<summary>{} ({} / 100, {}字)</summary>\n",
        html_escape(&r.essay_id),
        html_escape(&r.essay_id),
        r.score.total,
        r.character_count
    );
    html.push_str(&format!(
        "<p class=\"theme\">{}</p>\n<p class=\"feedback\">{}</p>\n",
        html_escape(&r.theme),
        html_escape(&r.score.feedback)
    ));
    if !r.score.suggestions.is_empty() {
        html.push_str("<ul class=\"suggestions\">\n");
        for suggestion in &r.score.suggestions {
            html.push_str(&format!("<li>{}</li>\n", html_escape(suggestion)));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</details>\n");
    html
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --high: #dcfce7; --middle: #fef9c3; --low: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --high: #064e3b; --middle: #713f12; --low: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Hiragino Sans', 'Noto Sans JP', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .theme, .count { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.tier-high { background: var(--high); }
.tier-middle { background: var(--middle); }
.tier-low { background: var(--low); }
.bar-high { fill: #22c55e; }
.bar-middle { fill: #eab308; }
.bar-low { fill: #ef4444; }
.grade { font-weight: bold; text-align: center; }
.overtime { color: #ef4444; font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
