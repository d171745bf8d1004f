//! Key result entries as they appear in a single report document.
//!
//! Each entry is one KR line together with the section and project it was
//! found under, its time entry and its work items. Entries are flat; the
//! aggregation into per-project groups lives in [`crate::report`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::time::TimeEntry;

/// How a KR line identifies itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KrKind {
    /// Identified by an explicit tracker ID, e.g. `(PLAT123)`.
    Id(String),
    /// Marked `New KR`: accepted work that has no ID assigned yet.
    New,
    /// Marked `No KR`: time spent outside any key result.
    NoKr,
}

/// Captures every parenthesized group; the last one is the ID slot.
static PAREN_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]*)\)").unwrap());

impl KrKind {
    /// Classify a KR title.
    ///
    /// The placeholders `New KR` and `No KR` are recognized case
    /// insensitively, either as the whole title or in the ID slot at the
    /// end of it. Otherwise the last parenthesized group is taken as the
    /// tracker ID. Returns `None` when no usable ID or placeholder is
    /// present.
    #[must_use]
    pub fn classify(title: &str) -> Option<KrKind> {
        let trimmed = title.trim();
        if let Some(kind) = Self::placeholder(trimmed) {
            return Some(kind);
        }
        let id = PAREN_GROUP
            .captures_iter(trimmed)
            .last()
            .map(|caps| caps[1].trim().to_string())?;
        if id.is_empty() {
            return None;
        }
        match Self::placeholder(&id) {
            Some(kind) => Some(kind),
            None => Some(KrKind::Id(id)),
        }
    }

    fn placeholder(text: &str) -> Option<KrKind> {
        if text.eq_ignore_ascii_case("new kr") {
            Some(KrKind::New)
        } else if text.eq_ignore_ascii_case("no kr") {
            Some(KrKind::NoKr)
        } else {
            None
        }
    }

    /// The tracker ID, when there is one.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            KrKind::Id(id) => Some(id),
            KrKind::New | KrKind::NoKr => None,
        }
    }

    /// Whether this is the `No KR` placeholder.
    #[inline]
    #[must_use]
    pub fn is_no_kr(&self) -> bool {
        matches!(self, KrKind::NoKr)
    }
}

/// One key result pulled out of a report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrEntry {
    /// Title of the enclosing section heading.
    pub section: String,
    /// Title of the enclosing project.
    pub project: String,
    /// KR title exactly as written.
    pub title: String,
    /// Classification of the title's ID slot.
    pub kind: KrKind,
    /// Time entry for this KR. Empty only for a bare `No KR` line.
    pub time: TimeEntry,
    /// Work item texts in source order.
    pub work: Vec<String>,
}

impl KrEntry {
    /// Create an entry with no time and no work items.
    #[must_use]
    pub fn new(
        section: impl Into<String>,
        project: impl Into<String>,
        title: impl Into<String>,
        kind: KrKind,
    ) -> Self {
        Self {
            section: section.into(),
            project: project.into(),
            title: title.into(),
            kind,
            time: TimeEntry::new(),
            work: Vec::new(),
        }
    }

    /// Set the time entry.
    #[must_use]
    pub fn with_time(mut self, time: TimeEntry) -> Self {
        self.time = time;
        self
    }

    /// Append a work item.
    #[must_use]
    pub fn with_work(mut self, item: impl Into<String>) -> Self {
        self.work.push(item.into());
        self
    }

    /// The tracker ID, when the title carries one.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.kind.id()
    }
}
