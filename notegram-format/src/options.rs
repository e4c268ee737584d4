//! Conversion options.
//!
//! # Examples
//!
//! ```
//! use notegram_format::{ConversionOptions, ConversionOptionsBuilder};
//!
//! let options = ConversionOptionsBuilder::new()
//!   .max_length(1024)
//!   .keep_links(false)
//!   .build();
//!
//! assert_eq!(options.max_length, 1024);
//! assert!(options.strip_frontmatter);
//! ```
use std::{fs, path::Path};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
  entity::{CAPTION_MAX_LENGTH, MESSAGE_MAX_LENGTH},
  error::{OptionsError, OptionsResult},
};

const fn default_true() -> bool {
  true
}

const fn default_max_length() -> usize {
  MESSAGE_MAX_LENGTH
}

/// Options for configuring a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct ConversionOptions {
  /// Remove a leading `---` fenced frontmatter block.
  #[serde(default = "default_true")]
  pub strip_frontmatter: bool,

  /// Remove level-1 heading lines (`# Title`).
  #[serde(default = "default_true")]
  pub strip_top_heading: bool,

  /// Maximum length of the output text in UTF-16 code units.
  #[serde(default = "default_max_length")]
  pub max_length: usize,

  /// Emit `Pre` annotations for fenced code blocks. The code text is kept
  /// either way.
  #[serde(default = "default_true")]
  pub keep_code_blocks: bool,

  /// Emit `Link` annotations. Link syntax is collapsed to its display text
  /// either way.
  #[serde(default = "default_true")]
  pub keep_links: bool,
}

impl Default for ConversionOptions {
  fn default() -> Self {
    Self {
      strip_frontmatter: true,
      strip_top_heading: true,
      max_length:        MESSAGE_MAX_LENGTH,
      keep_code_blocks:  true,
      keep_links:        true,
    }
  }
}

impl ConversionOptions {
  /// Defaults sized for a message body.
  #[must_use]
  pub fn message() -> Self {
    Self::default()
  }

  /// Defaults sized for a media caption.
  #[must_use]
  pub fn caption() -> Self {
    Self {
      max_length: CAPTION_MAX_LENGTH,
      ..Self::default()
    }
  }

  /// Check that the options describe a usable conversion.
  ///
  /// # Errors
  ///
  /// Returns [`OptionsError::ZeroMaxLength`] if `max_length` is zero.
  pub fn validate(&self) -> OptionsResult<()> {
    if self.max_length == 0 {
      return Err(OptionsError::ZeroMaxLength);
    }
    Ok(())
  }

  /// Load options from a TOML or JSON file, chosen by extension. Missing
  /// fields take their defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, cannot be parsed, has an
  /// unsupported extension, or fails [`ConversionOptions::validate`].
  pub fn from_file<P: AsRef<Path>>(path: P) -> OptionsResult<Self> {
    let options: Self = load_file(path)?;
    options.validate()?;
    Ok(options)
  }
}

/// Deserialize a TOML or JSON file, chosen by extension.
///
/// Shared by [`ConversionOptions::from_file`] and any configuration that
/// embeds the options as a table.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if its
/// extension is neither `toml` nor `json`.
pub fn load_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> OptionsResult<T> {
  let path = path.as_ref();
  let content = fs::read_to_string(path)?;

  let ext = path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_lowercase)
    .unwrap_or_default();

  match ext.as_str() {
    "toml" => Ok(toml::from_str(&content)?),
    "json" => Ok(serde_json::from_str(&content)?),
    _ => Err(OptionsError::UnsupportedFormat(path.display().to_string())),
  }
}

/// Builder for constructing `ConversionOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptionsBuilder {
  options: ConversionOptions,
}

impl ConversionOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub const fn strip_frontmatter(mut self, enabled: bool) -> Self {
    self.options.strip_frontmatter = enabled;
    self
  }

  #[must_use]
  pub const fn strip_top_heading(mut self, enabled: bool) -> Self {
    self.options.strip_top_heading = enabled;
    self
  }

  #[must_use]
  pub const fn max_length(mut self, max_length: usize) -> Self {
    self.options.max_length = max_length;
    self
  }

  #[must_use]
  pub const fn keep_code_blocks(mut self, enabled: bool) -> Self {
    self.options.keep_code_blocks = enabled;
    self
  }

  #[must_use]
  pub const fn keep_links(mut self, enabled: bool) -> Self {
    self.options.keep_links = enabled;
    self
  }

  /// Build the final `ConversionOptions`.
  #[must_use]
  pub fn build(self) -> ConversionOptions {
    self.options
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use std::fs;

  use super::*;

  #[test]
  fn test_partial_toml_uses_defaults() {
    let options: ConversionOptions =
      toml::from_str("max_length = 500\nkeep_links = false\n").unwrap();
    assert_eq!(options.max_length, 500);
    assert!(!options.keep_links);
    assert!(options.strip_frontmatter);
    assert!(options.keep_code_blocks);
  }

  #[test]
  fn test_caption_preset() {
    assert_eq!(ConversionOptions::caption().max_length, CAPTION_MAX_LENGTH);
    assert_eq!(ConversionOptions::message().max_length, MESSAGE_MAX_LENGTH);
  }

  #[test]
  fn test_zero_max_length_rejected() {
    let options = ConversionOptionsBuilder::new().max_length(0).build();
    assert!(matches!(options.validate(), Err(OptionsError::ZeroMaxLength)));
  }

  #[test]
  fn test_from_file_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    fs::write(&path, r#"{ "strip_top_heading": false }"#).unwrap();

    let options = ConversionOptions::from_file(&path).unwrap();
    assert!(!options.strip_top_heading);
    assert_eq!(options.max_length, MESSAGE_MAX_LENGTH);
  }

  #[test]
  fn test_from_file_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.yaml");
    fs::write(&path, "max_length: 10").unwrap();

    assert!(matches!(
      ConversionOptions::from_file(&path),
      Err(OptionsError::UnsupportedFormat(_))
    ));
  }

  #[test]
  fn test_load_file_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options");
    fs::write(&path, "max_length = 10").unwrap();

    assert!(matches!(
      load_file::<ConversionOptions, _>(&path),
      Err(OptionsError::UnsupportedFormat(_))
    ));
  }
}
