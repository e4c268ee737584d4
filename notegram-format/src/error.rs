//! Error types for option loading and validation.
use std::io;

use thiserror::Error;

/// Result type for option operations.
pub type OptionsResult<T> = Result<T, OptionsError>;

/// Errors that can occur while loading or validating [`ConversionOptions`].
///
/// Conversion itself never fails; these only cover configuration.
///
/// [`ConversionOptions`]: crate::ConversionOptions
#[derive(Debug, Error)]
pub enum OptionsError {
  #[error("max_length must be greater than zero")]
  ZeroMaxLength,

  #[error("Unsupported options file format: {0}")]
  UnsupportedFormat(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),
}
