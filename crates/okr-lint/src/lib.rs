//! # OKR Lint
//!
//! Linting for OKR status reports, in two stages:
//!
//! - **Format rules** check raw lines for whitespace and bullet habits
//!   that make the structure ambiguous. Any violation blocks parsing.
//! - **Structural parsing** rebuilds sections, projects and KRs from the
//!   markdown tree and validates time entries, work items and KR IDs.
//!
//! [`lint`] runs both stages and attaches a best-effort source line to
//! structural errors, since the tree walk itself has no positions.

pub mod error;
pub mod parser;
pub mod rules;

pub use error::{LintError, LintFailure, Violation};

// Re-exported so callers need only one crate for the common flow.
pub use okr_report::{KrEntry, KrKind, Report, SectionFilter};

/// Version of the lint crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lint a report document.
///
/// Runs the format rules first and, only when the document is clean,
/// parses it into KR entries under the given section filter. Format
/// failures collect every violating line; structural failures stop at
/// the first error in document order.
pub fn lint(text: &str, filter: &SectionFilter) -> Result<Vec<KrEntry>, LintFailure> {
    let violations = rules::check(text);
    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "format violations");
        return Err(LintFailure::format(violations));
    }
    match parser::parse(text, filter) {
        Ok(entries) => Ok(entries),
        Err(error) => {
            let line = error.context().and_then(|ctx| locate_line(text, ctx));
            Err(LintFailure::structural(error, line))
        }
    }
}

/// First line whose text contains `needle`, compared case insensitively.
/// 1-based. This is approximate: a context string that occurs earlier in
/// another role attributes the wrong line.
fn locate_line(text: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let needle = needle.to_lowercase();
    text.lines()
        .position(|line| line.to_lowercase().contains(&needle))
        .map(|idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report_yields_entries() {
        let text = "\
# Last week

## Platform

- Cache (PLAT1)
  - @alice (1 day)
  - Warmed the cache
";
        let entries = lint(text, &SectionFilter::new()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn format_violations_block_parsing() {
        // The tab would also trip the structural KR checks, but format
        // errors must win.
        let text = "# Last week\n\n## P\n\n-\tCache (PLAT1)\n";
        let failure = lint(text, &SectionFilter::new()).unwrap_err();
        assert!(failure.error().is_format());
        assert_eq!(failure.to_string(), "Line 5: tabs not allowed, use spaces");
    }

    #[test]
    fn structural_errors_carry_an_attributed_line() {
        let text = "\
# Last week

**Platform**

- Cache hit rate (PLAT1)
  - Warmed the cache
";
        let failure = lint(text, &SectionFilter::new()).unwrap_err();
        assert_eq!(
            failure.error(),
            &LintError::NoTimeFound("Cache hit rate (PLAT1)".to_string())
        );
        // First occurrence of the title text is the KR line itself here.
        assert_eq!(failure.line(), Some(5));
        assert_eq!(
            failure.to_string(),
            "Line 5: no time entry found for KR \"Cache hit rate (PLAT1)\""
        );
    }

    #[test]
    fn attribution_can_hit_an_earlier_mention() {
        // The project heading repeats the KR title, so the search lands
        // on the heading line. Attribution is best effort only.
        let text = "\
# Last week

## Cache hit rate (PLAT1)

- Cache hit rate (PLAT1)
  - Warmed the cache
";
        let failure = lint(text, &SectionFilter::new()).unwrap_err();
        assert_eq!(failure.line(), Some(3));
    }

    #[test]
    fn attribution_is_case_insensitive() {
        assert_eq!(locate_line("abc\nThe CACHE line\n", "cache"), Some(2));
    }

    #[test]
    fn unattributable_errors_default_to_line_one() {
        let text = "# Other section\n";
        let filter = SectionFilter::new().with_includes(["Last week"]);
        let failure = lint(text, &filter).unwrap_err();
        assert_eq!(failure.line(), None);
        assert!(failure.to_string().starts_with("Line 1: "));
    }

    #[test]
    fn lint_is_deterministic() {
        let text = "\
# Last week

## Platform

- Cache (PLAT1)
  - @alice (1 day)
  - Warmed the cache
";
        let filter = SectionFilter::new();
        assert_eq!(lint(text, &filter).unwrap(), lint(text, &filter).unwrap());
    }
}
