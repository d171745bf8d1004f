//! Property tests for filtering and aggregation laws.

use okr_lint::{lint, Report, SectionFilter};
use proptest::prelude::*;

const SECTIONS: [&str; 3] = ["Done", "Doing", "Later"];

/// One valid section holding a single project and KR.
fn section(name: &str, days: u32) -> String {
    format!(
        "# {name}\n\n## {name} project\n\n\
         - Keep {name} moving (KR1)\n  - @pat ({days} days)\n  - Moved {name} along\n\n"
    )
}

fn document() -> String {
    SECTIONS
        .iter()
        .enumerate()
        .map(|(i, name)| section(name, i as u32 + 1))
        .collect()
}

proptest! {
    /// Including a set of sections reads the same entries as ignoring
    /// its complement.
    #[test]
    fn include_equals_complement_ignore(
        subset in proptest::collection::btree_set(0usize..3, 1..=3)
    ) {
        let doc = document();
        let include: Vec<&str> = subset.iter().map(|&i| SECTIONS[i]).collect();
        let ignore: Vec<&str> = (0..3)
            .filter(|i| !subset.contains(i))
            .map(|i| SECTIONS[i])
            .collect();
        let with_include =
            lint(&doc, &SectionFilter::new().with_includes(include)).unwrap();
        let with_ignore =
            lint(&doc, &SectionFilter::new().with_ignores(ignore)).unwrap();
        prop_assert_eq!(with_include, with_ignore);
    }

    /// Day totals survive aggregation unchanged.
    #[test]
    fn aggregation_preserves_day_totals(
        days in proptest::collection::vec(1u32..=5, 1..=4)
    ) {
        let mut doc = String::from("# Last week\n\n## Platform\n\n");
        for (i, d) in days.iter().enumerate() {
            doc.push_str(&format!(
                "- Task number {i} (KR{i})\n  - @pat ({d} days)\n  - Did task {i}\n"
            ));
        }
        let entries = lint(&doc, &SectionFilter::new()).unwrap();
        let report = Report::from_entries(entries);
        let expected: f32 = days.iter().map(|&d| d as f32).sum();
        prop_assert_eq!(report.total_days(), expected);
    }

    /// Ignoring a section that never occurs is a no-op.
    #[test]
    fn ignoring_unknown_sections_changes_nothing(name in "[A-Z][a-z]{1,10}") {
        prop_assume!(!SECTIONS.contains(&name.as_str()));
        let doc = document();
        let plain = lint(&doc, &SectionFilter::new()).unwrap();
        let ignored =
            lint(&doc, &SectionFilter::new().with_ignores([name])).unwrap();
        prop_assert_eq!(plain, ignored);
    }

    /// Linting is a pure function of its input.
    #[test]
    fn lint_is_deterministic(seed in 0u32..50) {
        let doc = document();
        let filter = SectionFilter::new().with_includes([SECTIONS[seed as usize % 3]]);
        prop_assert_eq!(
            lint(&doc, &filter).unwrap(),
            lint(&doc, &filter).unwrap()
        );
    }
}
