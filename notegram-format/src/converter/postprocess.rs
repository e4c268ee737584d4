//! Heading demotion, blank line collapsing and outer whitespace trimming.
use std::{ops::Range, sync::LazyLock};

use log::trace;
use regex::Regex;

use super::span::{Edit, Span, apply_edits, overlaps_verbatim};
use crate::{types::AnnotationKind, utils::compile_regex};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex("HEADING_RE", r"(?m)^#{1,6}[ \t]+([^\n]*[^\s#][^\n]*)$")
});

static BLANK_LINES_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex("BLANK_LINES_RE", r"\n(?:[ \t]*\n){2,}"));

/// Turn `## Heading` lines into bold text.
///
/// Bold is only applied to the parts of the heading not already covered by
/// an inline style, so headings never introduce overlapping styles.
pub(crate) fn demote_headings(text: &mut String, spans: &mut Vec<Span>) {
  let headings: Vec<(Range<usize>, Range<usize>)> = HEADING_RE
    .captures_iter(text)
    .filter_map(|caps| {
      let full = caps.get(0)?.range();
      let title = caps.get(1)?;
      let trimmed = title.as_str().trim_end();
      Some((full, title.start()..title.start() + trimmed.len()))
    })
    .filter(|(full, title)| !is_code(spans, full, title))
    .collect();

  for (full, title) in headings.iter().rev() {
    let edit = Edit::keep(text, full.clone(), title.clone());
    let title_len = edit.replacement.len();
    edit.apply(text, spans);

    let start = full.start;
    let bold = uncovered(spans, start..start + title_len)
      .into_iter()
      .map(|gap| Span::new(AnnotationKind::Bold, gap.start, gap.end));
    spans.extend(bold);
  }

  trace!("headings: {} demoted", headings.len());
}

/// Whether a heading line is really code: it sits in a code block, or its
/// `#` marker is inside inline code. Inline code within the title is split
/// around by [`uncovered`].
fn is_code(spans: &[Span], full: &Range<usize>, title: &Range<usize>) -> bool {
  let marker = full.start..title.start;
  spans.iter().any(|span| {
    match span.kind {
      AnnotationKind::Pre { .. } => span.overlaps(full),
      AnnotationKind::Code => span.overlaps(&marker),
      _ => false,
    }
  })
}

/// Sub-ranges of `range` not covered by any inline style span.
fn uncovered(spans: &[Span], range: Range<usize>) -> Vec<Range<usize>> {
  let mut covered: Vec<Range<usize>> = spans
    .iter()
    .filter(|span| span.kind.is_inline_style() && span.overlaps(&range))
    .map(|span| span.start.max(range.start)..span.end.min(range.end))
    .collect();
  covered.sort_by_key(|r| r.start);

  let mut gaps = Vec::new();
  let mut cursor = range.start;
  for r in covered {
    if r.start > cursor {
      gaps.push(cursor..r.start);
    }
    cursor = cursor.max(r.end);
  }
  if cursor < range.end {
    gaps.push(cursor..range.end);
  }
  gaps
}

/// Collapse three or more line breaks into a single blank line, outside
/// preformatted blocks.
pub(crate) fn collapse_blank_lines(text: &mut String, spans: &mut Vec<Span>) {
  let edits: Vec<Edit> = BLANK_LINES_RE
    .find_iter(text)
    .map(|m| m.range())
    .filter(|range| !overlaps_verbatim(spans, range))
    .map(|range| Edit::replace(range, "\n\n"))
    .collect();

  trace!("blank lines: {} runs collapsed", edits.len());
  apply_edits(text, spans, edits);
}

/// Trim leading and trailing whitespace, never cutting into a preformatted
/// block.
pub(crate) fn trim(text: &mut String, spans: &mut Vec<Span>) {
  let verbatim = || spans.iter().filter(|span| span.kind.is_verbatim());

  let lead_end = text.len() - text.trim_start().len();
  let lead_end = verbatim()
    .map(|span| span.start)
    .fold(lead_end, usize::min);

  let trail_start = text.trim_end().len();
  let trail_start = verbatim()
    .map(|span| span.end)
    .fold(trail_start, usize::max);

  let mut edits = Vec::with_capacity(2);
  if trail_start < text.len() {
    edits.push(Edit::replace(trail_start..text.len(), ""));
  }
  if lead_end > 0 && lead_end <= trail_start {
    edits.push(Edit::replace(0..lead_end, ""));
  }
  apply_edits(text, spans, edits);
}
