//! Wire representation of annotations.
//!
//! Messaging APIs take formatting as a list of `{ type, offset, length }`
//! objects next to the plain text. [`MessageEntity`] is that object;
//! [`ConversionResult::entities`] produces the list for a conversion.
use serde::{Deserialize, Serialize};

use crate::types::{Annotation, AnnotationKind, ConversionResult};

/// Maximum length of a message body, in UTF-16 code units.
pub const MESSAGE_MAX_LENGTH: usize = 4096;

/// Maximum length of a media caption, in UTF-16 code units.
pub const CAPTION_MAX_LENGTH: usize = 1024;

/// A formatting entity as submitted to the messaging API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntity {
  #[serde(rename = "type")]
  pub kind:     String,
  pub offset:   usize,
  pub length:   usize,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language: Option<String>,
}

impl AnnotationKind {
  /// Entity type name used on the wire.
  #[must_use]
  pub const fn wire_name(&self) -> &'static str {
    match self {
      Self::Bold => "bold",
      Self::Italic => "italic",
      Self::Code => "code",
      Self::Strikethrough => "strikethrough",
      Self::Spoiler => "spoiler",
      Self::Blockquote => "blockquote",
      Self::ExpandableBlockquote => "expandable_blockquote",
      Self::Pre { .. } => "pre",
      Self::Link { .. } => "text_link",
    }
  }
}

impl From<&Annotation> for MessageEntity {
  fn from(annotation: &Annotation) -> Self {
    let (url, language) = match &annotation.kind {
      AnnotationKind::Link { url } => (Some(url.clone()), None),
      AnnotationKind::Pre { language } => (None, language.clone()),
      _ => (None, None),
    };
    Self {
      kind: annotation.kind.wire_name().to_string(),
      offset: annotation.offset,
      length: annotation.length,
      url,
      language,
    }
  }
}

impl ConversionResult {
  /// The annotations as wire entities, in the same order.
  #[must_use]
  pub fn entities(&self) -> Vec<MessageEntity> {
    self.annotations.iter().map(MessageEntity::from).collect()
  }
}
