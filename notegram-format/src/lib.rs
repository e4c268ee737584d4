//! # notegram-format - Markdown notes to annotated plain text
//!
//! Converts a Markdown note into the two things a messaging API needs to
//! display formatted text: a plain string with all formatting syntax
//! removed, and a list of formatting annotations given as offset and length
//! into that string.
//!
//! ## Quick Start
//!
//! ```rust
//! use notegram_format::{AnnotationKind, ConversionOptions, MarkdownConverter};
//!
//! let converter = MarkdownConverter::new(ConversionOptions::default());
//! let result = converter.convert("`code` and **bold**");
//!
//! assert_eq!(result.text, "code and bold");
//! assert_eq!(result.annotations[0].kind, AnnotationKind::Code);
//! assert_eq!(result.annotations[1].offset, 9);
//! ```
//!
//! ## Features
//!
//! - **Inline styles**: bold, italic, inline code, strikethrough, spoilers
//! - **Blocks**: fenced code blocks with language, blockquotes and
//!   collapsible callouts
//! - **Links**: Markdown links become link annotations, wikilinks become
//!   plain text
//! - **Note cleanup**: frontmatter and title removal, heading demotion,
//!   blank line collapsing
//! - **Length limits**: whitespace-aware truncation that never leaves an
//!   annotation past the end of the text
//!
//! Offsets and lengths are UTF-16 code units, the unit messaging platforms
//! count in.
//!
//! ## Wire format
//!
//! ```rust
//! use notegram_format::{ConversionOptions, convert};
//!
//! let result = convert("[go here](https://x.test)", &ConversionOptions::default());
//! let entities = result.entities();
//!
//! assert_eq!(entities[0].kind, "text_link");
//! assert_eq!(entities[0].url.as_deref(), Some("https://x.test"));
//! ```

pub mod converter;
pub mod entity;
pub mod error;
pub mod options;
mod types;
pub mod utils;
pub mod validate;

pub use crate::{
  converter::{MarkdownConverter, convert, truncate::ELLIPSIS},
  entity::{CAPTION_MAX_LENGTH, MESSAGE_MAX_LENGTH, MessageEntity},
  error::{OptionsError, OptionsResult},
  options::{ConversionOptions, ConversionOptionsBuilder},
  types::{Annotation, AnnotationKind, ConversionResult},
  validate::{ValidationIssue, ValidationReport, validate_text},
};
