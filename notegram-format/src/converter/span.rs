//! Byte-offset spans and the edits that move them.
//!
//! Every stage works on byte offsets into the text it is rewriting. Stages
//! that shrink or grow the text describe each rewrite as an [`Edit`] and
//! apply it through [`Edit::apply`], which remaps every existing span so it
//! keeps covering the same characters.
use std::ops::Range;

use crate::types::AnnotationKind;

/// An annotation under construction, in byte offsets of the current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Span {
  pub kind:  AnnotationKind,
  pub start: usize,
  pub end:   usize,
}

impl Span {
  pub(crate) const fn new(kind: AnnotationKind, start: usize, end: usize) -> Self {
    Self { kind, start, end }
  }

  pub(crate) const fn is_empty(&self) -> bool {
    self.end <= self.start
  }

  pub(crate) const fn overlaps(&self, range: &Range<usize>) -> bool {
    self.start < range.end && range.start < self.end
  }
}

/// Whether `range` touches any verbatim (`Code`/`Pre`) span.
pub(crate) fn overlaps_verbatim(spans: &[Span], range: &Range<usize>) -> bool {
  spans
    .iter()
    .any(|span| span.kind.is_verbatim() && span.overlaps(range))
}

/// Replacement of `range` by `replacement`.
///
/// When the replacement is a slice of the replaced text (a link's display
/// text, a heading's title), `kept_from` is where that slice started, so
/// spans inside it move with it. Positions in the dropped parts collapse
/// onto the nearest edge of the replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
  pub range:       Range<usize>,
  pub kept_from:   usize,
  pub replacement: String,
}

impl Edit {
  /// Replace `range` with the slice `text[kept]`, which lies inside it.
  pub(crate) fn keep(text: &str, range: Range<usize>, kept: Range<usize>) -> Self {
    let replacement = text.get(kept.clone()).unwrap_or_default().to_string();
    Self {
      range,
      kept_from: kept.start,
      replacement,
    }
  }

  /// Replace `range` with new text that does not correspond to a slice of
  /// the original.
  pub(crate) fn replace(range: Range<usize>, replacement: &str) -> Self {
    Self {
      kept_from: range.start,
      range,
      replacement: replacement.to_string(),
    }
  }

  /// Where `pos` in the text before the edit lands after it.
  pub(crate) fn map(&self, pos: usize) -> usize {
    let (start, end) = (self.range.start, self.range.end);
    let kept_len = self.replacement.len();
    let kept_start = self.kept_from.clamp(start, end);
    let kept_end = (kept_start + kept_len).min(end);

    if pos <= start {
      pos
    } else if pos >= end {
      pos - (end - start) + kept_len
    } else if pos <= kept_start {
      start
    } else if pos <= kept_end {
      start + (pos - kept_start)
    } else {
      start + kept_len
    }
  }

  /// Rewrite `text` and remap `spans` through this edit. Spans that end up
  /// covering nothing are removed.
  pub(crate) fn apply(&self, text: &mut String, spans: &mut Vec<Span>) {
    text.replace_range(self.range.clone(), &self.replacement);
    for span in spans.iter_mut() {
      span.start = self.map(span.start);
      span.end = self.map(span.end);
    }
    spans.retain(|span| !span.is_empty());
  }
}

/// Apply non-overlapping edits right to left, so no edit invalidates the
/// coordinates of an edit still waiting to be applied.
pub(crate) fn apply_edits(
  text: &mut String,
  spans: &mut Vec<Span>,
  mut edits: Vec<Edit>,
) {
  edits.sort_by_key(|edit| std::cmp::Reverse(edit.range.start));
  for edit in &edits {
    edit.apply(text, spans);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bold(start: usize, end: usize) -> Span {
    Span::new(AnnotationKind::Bold, start, end)
  }

  #[test]
  fn test_map_keep_inner_slice() {
    // "[abc](u)" -> "abc"
    let text = "x [abc](u) y";
    let edit = Edit::keep(text, 2..10, 3..6);
    assert_eq!(edit.replacement, "abc");
    assert_eq!(edit.map(0), 0);
    assert_eq!(edit.map(2), 2);
    assert_eq!(edit.map(3), 2);
    assert_eq!(edit.map(4), 3);
    assert_eq!(edit.map(6), 5);
    assert_eq!(edit.map(8), 5);
    assert_eq!(edit.map(10), 5);
    assert_eq!(edit.map(11), 6);
  }

  #[test]
  fn test_apply_shifts_trailing_spans() {
    let mut text = "[ab](u) cd".to_string();
    let mut spans = vec![bold(8, 10)];
    Edit::keep(&text.clone(), 0..7, 1..3).apply(&mut text, &mut spans);
    assert_eq!(text, "ab cd");
    assert_eq!(spans, vec![bold(3, 5)]);
  }

  #[test]
  fn test_apply_drops_spans_in_removed_text() {
    let mut text = "a\n\n\n\nb".to_string();
    let mut spans = vec![bold(3, 4), bold(5, 6)];
    Edit::replace(1..5, "\n\n").apply(&mut text, &mut spans);
    assert_eq!(text, "a\n\nb");
    assert_eq!(spans, vec![bold(3, 4)]);
  }

  #[test]
  fn test_apply_edits_order_independent() {
    let mut text = "[a](x) and [b](y)".to_string();
    let snapshot = text.clone();
    let mut spans = vec![bold(7, 10)];
    let edits = vec![
      Edit::keep(&snapshot, 0..6, 1..2),
      Edit::keep(&snapshot, 11..17, 12..13),
    ];
    apply_edits(&mut text, &mut spans, edits);
    assert_eq!(text, "a and b");
    assert_eq!(spans, vec![bold(2, 5)]);
  }
}
