// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The routing rubric: model capability guidance fed into every classifier prompt.
//!
//! Loaded once when the engine is built and owned by it afterwards. There is
//! no reload; a changed rubric file takes effect on restart.

use std::path::PathBuf;

use concierge_config::RoutingConfig;
use tracing::{info, warn};

const BUILTIN_RUBRIC: &str = include_str!("../prompts/rubric.md");

/// Where the rubric text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubricSource {
    File(PathBuf),
    Inline,
    Builtin,
}

/// Rubric text plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rubric {
    text: String,
    source: RubricSource,
}

impl Rubric {
    /// Resolve the rubric following priority: file > inline > built-in.
    ///
    /// An unreadable or empty file logs a warning and falls through to the
    /// next source.
    pub fn load(config: &RoutingConfig) -> Self {
        if let Some(path) = &config.rubric_file {
            match std::fs::read_to_string(path) {
                Ok(content) if !content.trim().is_empty() => {
                    info!(path = path.as_str(), "loaded routing rubric from file");
                    return Self {
                        text: content.trim().to_string(),
                        source: RubricSource::File(PathBuf::from(path)),
                    };
                }
                Ok(_) => warn!(path = path.as_str(), "rubric file is empty, falling back"),
                Err(e) => warn!(
                    path = path.as_str(),
                    error = %e,
                    "failed to read rubric file, falling back"
                ),
            }
        }

        if let Some(inline) = &config.rubric
            && !inline.trim().is_empty()
        {
            return Self::from_text(inline.trim());
        }

        Self::builtin()
    }

    /// A rubric from literal text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: RubricSource::Inline,
        }
    }

    /// The rubric bundled with the crate.
    pub fn builtin() -> Self {
        Self {
            text: BUILTIN_RUBRIC.trim().to_string(),
            source: RubricSource::Builtin,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &RubricSource {
        &self.source
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::builtin()
    }
}
