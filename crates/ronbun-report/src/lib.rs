//! ronbun-report: Self-contained HTML rendering of batch score reports.

pub mod html;

pub use html::{generate_html, write_html_report};
