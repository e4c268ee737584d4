//! Types for notegram-format public API and internal use.
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationReport, validate_text};

/// Formatting applied by an [`Annotation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationKind {
  Bold,
  Italic,
  Code,
  Strikethrough,
  Spoiler,
  Blockquote,
  /// A collapsed-by-default quote, produced from `> [!type]-` callouts.
  ExpandableBlockquote,
  /// Preformatted block from a fenced code block.
  Pre { language: Option<String> },
  /// Hyperlink over the display text of `[display](url)`.
  Link { url: String },
}

impl AnnotationKind {
  /// Inline text styles. Two of these may never overlap.
  #[must_use]
  pub const fn is_inline_style(&self) -> bool {
    matches!(
      self,
      Self::Bold | Self::Italic | Self::Code | Self::Strikethrough | Self::Spoiler
    )
  }

  /// Block-level kinds, which may contain inline styles and links.
  #[must_use]
  pub const fn is_block(&self) -> bool {
    matches!(
      self,
      Self::Blockquote | Self::ExpandableBlockquote | Self::Pre { .. }
    )
  }

  /// Kinds whose content is verbatim and must not carry anything else.
  #[must_use]
  pub const fn is_verbatim(&self) -> bool {
    matches!(self, Self::Code | Self::Pre { .. })
  }

  /// Whether an annotation of this kind may overlap one of `other`.
  #[must_use]
  pub const fn is_compatible_with(&self, other: &Self) -> bool {
    if self.is_verbatim() || other.is_verbatim() {
      return false;
    }
    if self.is_inline_style() && other.is_inline_style() {
      return false;
    }
    // Two quote blocks never nest.
    !(self.is_block() && other.is_block())
  }
}

/// A formatting span over the converted text.
///
/// `offset` and `length` are measured in UTF-16 code units, which is the unit
/// messaging platforms use for entity positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Annotation {
  pub kind:   AnnotationKind,
  pub offset: usize,
  pub length: usize,
}

impl Annotation {
  #[must_use]
  pub const fn new(kind: AnnotationKind, offset: usize, length: usize) -> Self {
    Self {
      kind,
      offset,
      length,
    }
  }

  /// Exclusive end position of the span.
  #[must_use]
  pub const fn end(&self) -> usize {
    self.offset + self.length
  }
}

/// Result of converting one Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversionResult {
  /// Plain text with all matched formatting syntax removed.
  pub text: String,

  /// Formatting spans over `text`, sorted by offset.
  pub annotations: Vec<Annotation>,

  /// Whether `text` was cut to fit the configured maximum length.
  pub truncated: bool,

  /// Length of the converted text before truncation, in UTF-16 code units.
  pub original_length: usize,
}

impl ConversionResult {
  /// Length of `text` in UTF-16 code units.
  #[must_use]
  pub fn len(&self) -> usize {
    crate::utils::utf16_len(&self.text)
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  /// Check the converted text against a caller-supplied length limit.
  #[must_use]
  pub fn validate(&self, limit: usize) -> ValidationReport {
    validate_text(&self.text, limit)
  }
}
