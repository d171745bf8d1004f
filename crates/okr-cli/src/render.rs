//! Markdown output: merged reports and fresh report skeletons.
//!
//! Rendered reports use the same grammar the parser reads, so `cat`
//! output can be linted and aggregated again. Skeletons only promise to
//! pass the line format rules; their placeholders are meant to be edited
//! before the report is ever linted structurally.

use okr_report::Report;

use crate::config::{Config, PLACEHOLDER};

/// Section title used for merged output, which has no source sections.
const AGGREGATE_SECTION: &str = "Aggregate";

/// Render an aggregated report back to report markdown.
#[must_use]
pub(crate) fn report_markdown(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {AGGREGATE_SECTION}\n"));
    for project in report.projects() {
        out.push_str(&format!("\n## {}\n\n", project.title()));
        for kr in project.krs() {
            out.push_str(&format!("- {}\n", kr.title()));
            if !kr.time().is_empty() {
                out.push_str(&format!("  - {}\n", kr.time()));
            }
            for item in kr.work() {
                out.push_str(&format!("  - {item}\n"));
            }
        }
    }
    out
}

/// Render a fresh report skeleton from the configuration.
#[must_use]
pub(crate) fn skeleton(config: &Config) -> String {
    let mut out = String::from("# Last week\n");
    for project in &config.projects {
        out.push_str(&format!("\n## {}\n\n", project.title()));
        if project.items().is_empty() {
            out.push_str(&format!("- {PLACEHOLDER}\n"));
            out.push_str("  - @username (X days)\n");
            out.push_str("  - TODO describe the work done\n");
        } else {
            for item in project.items() {
                out.push_str(&format!("- {item}\n"));
            }
        }
    }
    if !config.locations.is_empty() {
        out.push_str("\n# Locations\n\n");
        for line in &config.locations {
            out.push_str(line);
            out.push('\n');
        }
    }
    if let Some(footer) = &config.footer {
        out.push('\n');
        out.push_str(footer.trim_end());
        out.push('\n');
    }
    out
}
