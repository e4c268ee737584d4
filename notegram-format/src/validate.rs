//! Pre-send checks on converted text.
//!
//! Validation never fails; it reports issues and leaves the decision to
//! send or not to the caller.
use serde::Serialize;
use thiserror::Error;

use crate::utils::utf16_len;

/// A problem found in converted text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
  #[error("Text is empty after conversion")]
  Empty,

  #[error("Text is too long: {length} characters (limit {limit})")]
  TooLong { length: usize, limit: usize },
}

/// Outcome of [`validate_text`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
  pub valid:  bool,
  pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
  /// Human-readable descriptions of every issue.
  #[must_use]
  pub fn messages(&self) -> Vec<String> {
    self.issues.iter().map(ToString::to_string).collect()
  }
}

/// Check `text` against `limit`, measured in UTF-16 code units.
#[must_use]
pub fn validate_text(text: &str, limit: usize) -> ValidationReport {
  let mut issues = Vec::new();

  if text.trim().is_empty() {
    issues.push(ValidationIssue::Empty);
  }

  let length = utf16_len(text);
  if length > limit {
    issues.push(ValidationIssue::TooLong { length, limit });
  }

  ValidationReport {
    valid: issues.is_empty(),
    issues,
  }
}
