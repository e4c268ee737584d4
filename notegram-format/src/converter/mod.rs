//! The conversion pipeline.
//!
//! # Architecture
//!
//! Each stage takes the text and spans produced by the previous one and
//! returns a consistent pair:
//!
//! - [`preprocess`]: line endings, frontmatter, level-1 headings
//! - [`blocks`]: code blocks and quotes swapped for placeholders, and back
//! - [`inline`]: bold, italic, code, strikethrough, spoiler
//! - [`links`]: Markdown links and wikilinks
//! - [`postprocess`]: heading demotion, blank lines, trimming
//! - [`truncate`]: length limit
//!
//! Stages work in byte offsets. Offsets are converted to UTF-16 code units
//! once, after the last stage.
mod blocks;
mod inline;
mod links;
mod postprocess;
mod preprocess;
mod span;
pub mod truncate;

use log::{debug, warn};

use self::{blocks::BlockArena, span::Span};
use crate::{
  options::ConversionOptions,
  types::{Annotation, ConversionResult},
  utils::{Utf16Index, utf16_len},
};

/// Markdown to annotated plain text converter.
///
/// Holds only its options; every call to [`MarkdownConverter::convert`] is
/// independent, so one converter can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
  options: ConversionOptions,
}

impl MarkdownConverter {
  /// Create a new `MarkdownConverter` with the given options.
  #[must_use]
  pub const fn new(options: ConversionOptions) -> Self {
    Self { options }
  }

  /// Access converter options.
  #[must_use]
  pub const fn options(&self) -> &ConversionOptions {
    &self.options
  }

  /// Convert a Markdown document.
  #[must_use]
  pub fn convert(&self, markdown: &str) -> ConversionResult {
    let options = &self.options;

    let text = preprocess::preprocess(markdown, options);

    let mut arena = BlockArena::default();
    let protected = blocks::protect(&text, &mut arena, options.keep_code_blocks);

    let (mut text, mut spans) = inline::apply_inline_patterns(&protected);
    blocks::restore(&mut text, &mut spans, &arena);
    links::resolve_links(&mut text, &mut spans, options.keep_links);

    postprocess::demote_headings(&mut text, &mut spans);
    postprocess::collapse_blank_lines(&mut text, &mut spans);
    postprocess::trim(&mut text, &mut spans);

    let original_length = utf16_len(&text);
    let truncated =
      truncate::truncate(&mut text, &mut spans, options.max_length);

    let annotations = finalize(&text, spans);
    debug!(
      "convert: {} bytes in, {} code units out, {} annotations{}",
      markdown.len(),
      utf16_len(&text),
      annotations.len(),
      if truncated { ", truncated" } else { "" }
    );

    ConversionResult {
      text,
      annotations,
      truncated,
      original_length,
    }
  }
}

/// Convert a Markdown document with the given options.
///
/// Shorthand for `MarkdownConverter::new(options.clone()).convert(markdown)`.
#[must_use]
pub fn convert(markdown: &str, options: &ConversionOptions) -> ConversionResult {
  MarkdownConverter::new(options.clone()).convert(markdown)
}

/// Order spans, enforce the output invariants and translate to UTF-16.
///
/// Every stage is built to keep spans in bounds and free of incompatible
/// overlaps. Anything that still violates them is dropped here, with a
/// warning, rather than handed to a transport that would reject it.
fn finalize(text: &str, mut spans: Vec<Span>) -> Vec<Annotation> {
  // Stable: ties keep discovery order.
  spans.sort_by_key(|span| span.start);

  let index = Utf16Index::new(text);
  let mut kept: Vec<(Span, Annotation)> = Vec::with_capacity(spans.len());

  for span in spans {
    let bounds = index.to_utf16(span.start).zip(index.to_utf16(span.end));
    let Some((start, end)) = bounds.filter(|(start, end)| start < end) else {
      warn!("Dropping out-of-bounds {:?} annotation", span.kind);
      continue;
    };

    let range = span.start..span.end;
    if let Some((conflict, _)) = kept.iter().find(|(other, _)| {
      other.overlaps(&range) && !other.kind.is_compatible_with(&span.kind)
    }) {
      warn!(
        "Dropping {:?} annotation overlapping {:?}",
        span.kind, conflict.kind
      );
      continue;
    }

    let annotation = Annotation::new(span.kind.clone(), start, end - start);
    kept.push((span, annotation));
  }

  kept.into_iter().map(|(_, annotation)| annotation).collect()
}
