//! YAML configuration for report generation.
//!
//! The file lists the projects a fresh report should start from, plus
//! optional locations and a footer:
//!
//! ```yaml
//! projects:
//!   - Platform
//!   - title: Developer experience
//!     items:
//!       - Cut CI wall time in half (DX7)
//! locations:
//!   - "@alice: Berlin office"
//! footer: |
//!   Sent from the weekly report generator.
//! ```
//!
//! A project is either a bare title or a title with pre-filled KR items.
//! Without a config file the defaults apply: one placeholder project and
//! nothing else.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Placeholder used wherever the author still has to fill in a KR.
pub(crate) const PLACEHOLDER: &str = "TODO ADD KR (ID)";

/// Config file read when `--config` is not given.
pub(crate) const DEFAULT_PATH: &str = "okr.yaml";

/// One project template in the config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProjectTemplate {
    /// Just a title; the skeleton gets placeholder items.
    Title(String),
    /// Title plus pre-filled KR items.
    Detailed {
        /// Project title.
        title: String,
        /// KR item lines, one bullet each.
        #[serde(default)]
        items: Vec<String>,
    },
}

impl ProjectTemplate {
    /// The project title.
    #[must_use]
    pub(crate) fn title(&self) -> &str {
        match self {
            ProjectTemplate::Title(title) => title,
            ProjectTemplate::Detailed { title, .. } => title,
        }
    }

    /// Pre-filled KR items, empty for bare titles.
    #[must_use]
    pub(crate) fn items(&self) -> &[String] {
        match self {
            ProjectTemplate::Title(_) => &[],
            ProjectTemplate::Detailed { items, .. } => items,
        }
    }
}

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Config {
    /// Projects for the skeleton, in output order.
    #[serde(default = "default_projects")]
    pub(crate) projects: Vec<ProjectTemplate>,
    /// Free-form location lines appended as their own section.
    #[serde(default)]
    pub(crate) locations: Vec<String>,
    /// Verbatim footer text.
    #[serde(default)]
    pub(crate) footer: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects: default_projects(),
            locations: Vec::new(),
            footer: None,
        }
    }
}

fn default_projects() -> Vec<ProjectTemplate> {
    vec![ProjectTemplate::Title(PLACEHOLDER.to_string())]
}

/// Errors reading or parsing a config file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Path as given on the command line.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid YAML for this schema.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Path as given on the command line.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

impl Config {
    /// Parse a config from YAML text.
    pub(crate) fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Load a config file. A missing file falls back to the defaults;
    /// any other IO or parse problem is an error.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        Self::from_yaml(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }
}
