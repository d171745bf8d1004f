//! Line-level format rules.
//!
//! These catch whitespace and bullet habits that markdown renders fine
//! but that make the structural grammar ambiguous, so they run first and
//! block parsing. Every rule is a pure predicate on one line; a line can
//! trip several rules and each match is reported once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Violation;

struct Rule {
    pattern: Regex,
    message: &'static str,
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let rule = |pattern: &str, message: &'static str| Rule {
        pattern: Regex::new(pattern).unwrap(),
        message,
    };
    vec![
        rule(r"\t", "tabs not allowed, use spaces"),
        rule(r"^ *- {2,}\S", "ambiguous double space after bullet"),
        rule(r"^ -", "single-space indentation is ambiguous"),
        rule(r"^ *\*( |$)", "asterisk bullets not allowed, use `-`"),
        rule(r"^ *\+( |$)", "plus bullets not allowed, use `-`"),
        rule(r"^\s+#", "headings must start at column 0"),
    ]
});

/// Check every line of a document against the format rules.
///
/// Returns violations in line order, with rule order as the tie break
/// inside a line. Line numbers are 1-based.
#[must_use]
pub fn check(text: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        for rule in RULES.iter() {
            if rule.pattern.is_match(line) {
                violations.push(Violation::new(idx + 1, rule.message));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(text: &str) -> Vec<(usize, String)> {
        check(text).into_iter().map(|v| (v.line, v.message)).collect()
    }

    #[test]
    fn clean_document_passes() {
        let text = "# Last week\n\n## Platform\n\n- Cache (PLAT1)\n  - @alice (1 day)\n  - Warmed the cache\n";
        assert!(check(text).is_empty());
    }

    #[test]
    fn flags_tabs_anywhere_in_line() {
        let violations = messages("ok line\nbad\tline\n");
        assert_eq!(
            violations,
            vec![(2, "tabs not allowed, use spaces".to_string())]
        );
    }

    #[test]
    fn flags_double_space_after_bullet() {
        let violations = messages("-  two spaces\n");
        assert_eq!(violations[0].1, "ambiguous double space after bullet");
    }

    #[test]
    fn flags_double_space_after_nested_bullet() {
        let violations = messages("  -  nested\n");
        assert_eq!(violations[0].1, "ambiguous double space after bullet");
    }

    #[test]
    fn flags_single_space_indent() {
        let violations = messages(" - one space\n");
        assert_eq!(violations[0].1, "single-space indentation is ambiguous");
    }

    #[test]
    fn two_space_indent_is_fine() {
        assert!(check("  - nested item\n").is_empty());
    }

    #[test]
    fn flags_asterisk_bullets() {
        let violations = messages("* item\n  * nested\n");
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|(_, m)| m == "asterisk bullets not allowed, use `-`"));
    }

    #[test]
    fn bold_text_is_not_an_asterisk_bullet() {
        assert!(check("**Project title**\n").is_empty());
    }

    #[test]
    fn flags_plus_bullets() {
        let violations = messages("+ item\n");
        assert_eq!(violations[0].1, "plus bullets not allowed, use `-`");
    }

    #[test]
    fn flags_indented_heading() {
        let violations = messages("  # Last week\n");
        assert_eq!(violations[0].1, "headings must start at column 0");
    }

    #[test]
    fn heading_at_column_zero_is_fine() {
        assert!(check("# Last week\n## Project\n").is_empty());
    }

    #[test]
    fn one_line_can_trip_several_rules() {
        // Tab plus indented heading.
        let violations = messages("\t# Heading\n");
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].1, "tabs not allowed, use spaces");
        assert_eq!(violations[1].1, "headings must start at column 0");
    }

    #[test]
    fn violations_are_ordered_by_line() {
        let text = "fine\n\tbad\nfine\n * also bad\n";
        let lines: Vec<usize> = check(text).into_iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn lone_bullet_characters_are_flagged() {
        assert_eq!(messages("*\n").len(), 1);
        assert_eq!(messages("+\n").len(), 1);
    }

    #[test]
    fn inline_punctuation_is_not_flagged() {
        assert!(check("- 2 + 2 = 4 and 3 * 3 = 9\n").is_empty());
        assert!(check("a plain # character mid-line\n").is_empty());
    }
}
