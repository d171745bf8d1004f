//! Lint error taxonomy.
//!
//! Two families of failure exist. Format violations come from the line
//! rules and carry exact 1-based line numbers. Structural errors come
//! from the parser, which walks a markdown tree and has no positions; a
//! context string is carried instead so the orchestrator can attribute a
//! line after the fact.

use std::fmt;

/// A single line-level format violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// 1-based line number.
    pub line: usize,
    /// Rule message, stable across releases.
    pub message: String,
}

impl Violation {
    /// Create a violation at a line.
    #[inline]
    #[must_use]
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Everything that can make a report fail the lint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LintError {
    /// One or more line format rules were violated.
    #[error("{}", render_violations(.0))]
    Format(Vec<Violation>),

    /// A KR has no time entry among its children.
    #[error("no time entry found for KR \"{0}\"")]
    NoTimeFound(String),

    /// A child line started with `@` but did not parse as a time entry.
    #[error("invalid time entry \"{0}\"")]
    InvalidTime(String),

    /// A KR has more than one child parsing as a time entry.
    #[error("multiple time entries for KR \"{0}\"")]
    MultipleTimeEntries(String),

    /// A KR has a time entry but no work items.
    #[error("no work items found for KR \"{0}\"")]
    NoWorkFound(String),

    /// A KR title carries neither a tracker ID nor a placeholder.
    #[error("no KR ID found in \"{0}\"")]
    NoKrId(String),

    /// KR content appeared in a section before any project title.
    #[error("no project found for KR in section \"{0}\"")]
    NoProjectFound(String),

    /// Sections named in the include set never occurred in the input.
    #[error("included sections not found: {}", render_names(.0))]
    NotAllIncludes(Vec<String>),
}

impl LintError {
    /// Text to search for when attributing a source line to this error.
    /// `None` when no line attribution makes sense.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            LintError::Format(_) | LintError::NotAllIncludes(_) => None,
            LintError::NoTimeFound(kr)
            | LintError::MultipleTimeEntries(kr)
            | LintError::NoWorkFound(kr)
            | LintError::NoKrId(kr) => Some(kr),
            LintError::InvalidTime(entry) => Some(entry),
            LintError::NoProjectFound(section) => Some(section),
        }
    }

    /// Whether this is a line format failure.
    #[inline]
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, LintError::Format(_))
    }
}

fn render_violations(violations: &[Violation]) -> String {
    let lines: Vec<String> = violations.iter().map(ToString::to_string).collect();
    lines.join("\n")
}

fn render_names(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("\"{n}\"")).collect();
    quoted.join(", ")
}

/// A lint failure ready for display: the error plus its best-effort
/// source line.
///
/// Format failures already carry per-violation lines. Structural
/// failures get the first line whose text contains the error context,
/// compared case insensitively, and fall back to line 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFailure {
    error: LintError,
    line: Option<usize>,
}

impl LintFailure {
    /// Wrap format violations. They carry their own line numbers.
    #[must_use]
    pub fn format(mut violations: Vec<Violation>) -> Self {
        violations.sort_by_key(|v| v.line);
        Self {
            error: LintError::Format(violations),
            line: None,
        }
    }

    /// Wrap a structural error with an attributed line, if any.
    #[must_use]
    pub fn structural(error: LintError, line: Option<usize>) -> Self {
        Self { error, line }
    }

    /// The underlying error.
    #[inline]
    #[must_use]
    pub fn error(&self) -> &LintError {
        &self.error
    }

    /// The attributed line for structural errors.
    #[inline]
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for LintFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            LintError::Format(_) => write!(f, "{}", self.error),
            other => write!(f, "Line {}: {}", self.line.unwrap_or(1), other),
        }
    }
}

impl std::error::Error for LintFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
