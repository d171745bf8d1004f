//! Aggregation of KR entries into a per-project report.
//!
//! Aggregation is a pure regrouping step. Entries are grouped by project
//! title and, inside a project, by KR title. First-seen order is kept at
//! both levels so merged output is stable across runs. Time entries for
//! the same KR are folded into per-person totals and work items are
//! concatenated in input order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entry::{KrEntry, KrKind};
use crate::time::TimeEntry;

/// One aggregated key result inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kr {
    title: String,
    kind: KrKind,
    time: TimeEntry,
    work: Vec<String>,
}

impl Kr {
    fn new(title: String, kind: KrKind) -> Self {
        Self {
            title,
            kind,
            time: TimeEntry::new(),
            work: Vec::new(),
        }
    }

    fn add(&mut self, entry: &KrEntry) {
        self.time.absorb(&entry.time);
        self.work.extend(entry.work.iter().cloned());
    }

    fn absorb(&mut self, other: &Kr) {
        self.time.absorb(&other.time);
        self.work.extend(other.work.iter().cloned());
    }

    /// KR title as written in the source.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// ID classification taken from the first occurrence of this title.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &KrKind {
        &self.kind
    }

    /// Per-person day totals for this KR.
    #[inline]
    #[must_use]
    pub fn time(&self) -> &TimeEntry {
        &self.time
    }

    /// All work items reported against this KR, in input order.
    #[inline]
    #[must_use]
    pub fn work(&self) -> &[String] {
        &self.work
    }

    /// Total days spent on this KR across everyone.
    #[must_use]
    pub fn total_days(&self) -> f32 {
        self.time.total_days()
    }
}

/// A project with its aggregated key results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    title: String,
    krs: IndexMap<String, Kr>,
}

impl Project {
    fn new(title: String) -> Self {
        Self {
            title,
            krs: IndexMap::new(),
        }
    }

    fn add(&mut self, entry: &KrEntry) {
        self.krs
            .entry(entry.title.clone())
            .or_insert_with(|| Kr::new(entry.title.clone(), entry.kind.clone()))
            .add(entry);
    }

    fn absorb(&mut self, other: &Project) {
        for (title, kr) in &other.krs {
            match self.krs.get_mut(title) {
                Some(existing) => existing.absorb(kr),
                None => {
                    self.krs.insert(title.clone(), kr.clone());
                }
            }
        }
    }

    /// Project title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Key results in first-seen order.
    pub fn krs(&self) -> impl Iterator<Item = &Kr> {
        self.krs.values()
    }

    /// Number of distinct KR titles under this project.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.krs.len()
    }

    /// Whether the project holds no KRs.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.krs.is_empty()
    }

    /// Look up a KR by its exact title.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&Kr> {
        self.krs.get(title)
    }

    /// Total days spent on this project across all KRs.
    #[must_use]
    pub fn total_days(&self) -> f32 {
        self.krs.values().map(Kr::total_days).sum()
    }
}

/// Aggregated report over one or more source documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    projects: IndexMap<String, Project>,
}

impl Report {
    /// Create an empty report.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group parsed entries by project title.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = KrEntry>,
    {
        let mut report = Self::new();
        for entry in entries {
            report.push(&entry);
        }
        report
    }

    /// Add a single entry to the report.
    pub fn push(&mut self, entry: &KrEntry) {
        self.projects
            .entry(entry.project.clone())
            .or_insert_with(|| Project::new(entry.project.clone()))
            .add(entry);
    }

    /// Fold another report into this one. Projects and KRs new to `self`
    /// keep their order of appearance in `other`.
    pub fn merge(&mut self, other: &Report) {
        for (title, project) in &other.projects {
            match self.projects.get_mut(title) {
                Some(existing) => existing.absorb(project),
                None => {
                    self.projects.insert(title.clone(), project.clone());
                }
            }
        }
    }

    /// Projects in first-seen order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    /// Number of distinct project titles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the report holds no projects.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Look up a project by its exact title.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&Project> {
        self.projects.get(title)
    }

    /// Total days across the whole report.
    #[must_use]
    pub fn total_days(&self) -> f32 {
        self.projects.values().map(Project::total_days).sum()
    }
}
