//! # OKR Report
//!
//! Domain model and aggregation for OKR status reports:
//!
//! - **Time entries**: `@person (N days)` lines with per-person totals
//! - **KR entries**: one key result with its section, project, time and work
//! - **Section filters**: include/ignore sets over top-level sections
//! - **Reports**: entries regrouped by project title in first-seen order
//!
//! Parsing report documents into entries lives in the `okr-lint` crate;
//! this crate only defines the shapes those parses produce and how they
//! aggregate.

pub mod entry;
pub mod filter;
pub mod report;
pub mod time;

pub use entry::{KrEntry, KrKind};
pub use filter::SectionFilter;
pub use report::{Kr, Project, Report};
pub use time::{PersonDays, TimeEntry, TimeParseError};

/// Version of the report crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::entry::{KrEntry, KrKind};
    pub use crate::filter::SectionFilter;
    pub use crate::report::{Kr, Project, Report};
    pub use crate::time::{PersonDays, TimeEntry};
}
