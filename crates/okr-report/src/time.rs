//! Time entries: who spent how many days on a key result.
//!
//! A time entry is one bullet line of the form:
//!
//! ```text
//! @alice (2 days), @bob (0.5 days)
//! ```
//!
//! Day counts are restricted to whole and half days. Parsing is strict on
//! punctuation so that malformed handles or day counts surface as errors
//! instead of silently dropping out of the totals.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One `@person (N days)` clause inside a time entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDays {
    /// Engineer handle without the leading `@`.
    pub person: String,
    /// Days spent, in half-day steps.
    pub days: f32,
}

impl PersonDays {
    /// Create a new person/days pair.
    #[inline]
    #[must_use]
    pub fn new(person: impl Into<String>, days: f32) -> Self {
        Self {
            person: person.into(),
            days,
        }
    }
}

impl fmt::Display for PersonDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} ({})", self.person, format_days(self.days))
    }
}

/// A full time entry: the comma-separated list of clauses on one line.
///
/// The pair order of the source line is preserved, including duplicate
/// handles. Use [`TimeEntry::totals`] for a per-person rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry(Vec<PersonDays>);

/// Matches one clause after splitting on commas: `@handle (N day[s])`.
static CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@([A-Za-z0-9][A-Za-z0-9_.-]*)\s+\((\d+(?:\.\d+)?)\s+days?\)$").unwrap()
});

impl TimeEntry {
    /// Create an empty time entry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an entry from pairs, preserving their order.
    #[inline]
    #[must_use]
    pub fn from_pairs(pairs: Vec<PersonDays>) -> Self {
        Self(pairs)
    }

    /// Quick check used to pick time candidates out of KR children:
    /// any line whose first non-space character is `@` is treated as an
    /// attempted time entry and must then parse cleanly.
    #[inline]
    #[must_use]
    pub fn looks_like(line: &str) -> bool {
        line.trim_start().starts_with('@')
    }

    /// The clauses in source order.
    #[inline]
    #[must_use]
    pub fn pairs(&self) -> &[PersonDays] {
        &self.0
    }

    /// Whether the entry has no clauses.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of clauses.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum of all day counts, over every clause.
    #[must_use]
    pub fn total_days(&self) -> f32 {
        self.0.iter().map(|p| p.days).sum()
    }

    /// Per-person totals in first-seen order.
    #[must_use]
    pub fn totals(&self) -> TimeEntry {
        let mut out = TimeEntry::new();
        out.absorb(self);
        out
    }

    /// Fold another entry into this one, summing day counts per person
    /// and appending people not seen before.
    pub fn absorb(&mut self, other: &TimeEntry) {
        for pair in &other.0 {
            match self.0.iter_mut().find(|p| p.person == pair.person) {
                Some(existing) => existing.days += pair.days,
                None => self.0.push(pair.clone()),
            }
        }
    }
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for pair in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{pair}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for TimeEntry {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TimeParseError::Empty);
        }
        let mut pairs = Vec::new();
        for clause in trimmed.split(',') {
            let clause = clause.trim();
            let caps = CLAUSE
                .captures(clause)
                .ok_or_else(|| TimeParseError::Clause {
                    clause: clause.to_string(),
                })?;
            let raw = &caps[2];
            let days: f32 = raw.parse().map_err(|_| TimeParseError::Days {
                value: raw.to_string(),
            })?;
            if (days * 2.0).fract() != 0.0 {
                return Err(TimeParseError::Days {
                    value: raw.to_string(),
                });
            }
            pairs.push(PersonDays::new(&caps[1], days));
        }
        Ok(Self(pairs))
    }
}

/// Errors raised when a time entry line does not follow the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    /// The line was empty after trimming.
    #[error("empty time entry")]
    Empty,

    /// A clause did not match `@handle (N days)`.
    #[error("malformed time clause '{clause}'")]
    Clause {
        /// The offending clause text.
        clause: String,
    },

    /// The day count was not a whole or half number of days.
    #[error("invalid day count '{value}', use whole or half days")]
    Days {
        /// The offending number as written.
        value: String,
    },
}

/// Render a day count the way reports write it: `1 day`, `2 days`, `0.5 days`.
fn format_days(days: f32) -> String {
    if days == 1.0 {
        "1 day".to_string()
    } else if days.fract() == 0.0 {
        format!("{} days", days as i64)
    } else {
        format!("{days} days")
    }
}
