//! Section filtering: which top-level sections of a report are read.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Selects the sections a parse descends into.
///
/// With a non-empty include set only those sections are read and each
/// included name must actually occur in the document. With an empty
/// include set every section is read except the ignored ones. Matching
/// is by exact section title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFilter {
    include: BTreeSet<String>,
    ignore: BTreeSet<String>,
}

impl SectionFilter {
    /// Filter that visits every section.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add section titles to the include set.
    #[must_use]
    pub fn with_includes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add section titles to the ignore set.
    #[must_use]
    pub fn with_ignores<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether an include set was given.
    #[inline]
    #[must_use]
    pub fn has_includes(&self) -> bool {
        !self.include.is_empty()
    }

    /// Whether a section with this title should be read.
    #[must_use]
    pub fn should_visit(&self, section: &str) -> bool {
        if self.include.is_empty() {
            !self.ignore.contains(section)
        } else {
            self.include.contains(section)
        }
    }

    /// Included titles that are absent from `seen`, in sorted order.
    /// Empty when no include set was given.
    #[must_use]
    pub fn missing_includes(&self, seen: &[String]) -> Vec<String> {
        self.include
            .iter()
            .filter(|name| !seen.iter().any(|s| s == *name))
            .cloned()
            .collect()
    }
}
