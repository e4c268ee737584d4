//! Paired-delimiter inline markup: bold, italic, code, strikethrough and
//! spoiler.
//!
//! Conversion happens in two phases. First every pattern is matched against
//! the unmodified text and the annotation offsets are computed in that
//! coordinate space, subtracting the delimiters removed by earlier matches.
//! Only then is the text rewritten, from the last match to the first, so a
//! collapse never moves a match that has not been applied yet.
use std::{ops::Range, sync::LazyLock};

use log::trace;
use regex::Regex;

use super::{links::link_targets, span::Span};
use crate::{types::AnnotationKind, utils::compile_regex};

/// Extra condition a regex match must satisfy, given the whole text, the
/// full match range and the inner range.
type Guard = fn(&str, &Range<usize>, &Range<usize>) -> bool;

/// One row of the pattern table.
pub(crate) struct InlinePattern {
  pub kind:    AnnotationKind,
  pub regex:   Regex,
  /// Delimiter characters removed when the match collapses.
  pub removed: usize,
  guard:       Guard,
}

impl InlinePattern {
  fn new(
    kind: AnnotationKind,
    name: &str,
    pattern: &str,
    removed: usize,
    guard: Guard,
  ) -> Self {
    Self {
      kind,
      regex: compile_regex(name, pattern),
      removed,
      guard,
    }
  }
}

// Inner text is single-line and never crosses a placeholder sentinel.
static PATTERNS: LazyLock<Vec<InlinePattern>> = LazyLock::new(|| {
  vec![
    InlinePattern::new(
      AnnotationKind::Bold,
      "BOLD_STAR_RE",
      r"\*\*([^\n\x01]+?)\*\*",
      4,
      flanked,
    ),
    InlinePattern::new(
      AnnotationKind::Bold,
      "BOLD_UNDERSCORE_RE",
      r"__([^\n\x01]+?)__",
      4,
      |text, full, inner| flanked(text, full, inner) && not_intraword(text, full),
    ),
    InlinePattern::new(
      AnnotationKind::Italic,
      "ITALIC_STAR_RE",
      r"\*([^*\n\x01]+)\*",
      2,
      |text, full, inner| {
        flanked(text, full, inner) && not_adjacent_to(text, full, &['*', '_'])
      },
    ),
    InlinePattern::new(
      AnnotationKind::Italic,
      "ITALIC_UNDERSCORE_RE",
      r"_([^_\n\x01]+)_",
      2,
      |text, full, inner| {
        flanked(text, full, inner)
          && not_adjacent_to(text, full, &['*', '_'])
          && not_intraword(text, full)
      },
    ),
    InlinePattern::new(
      AnnotationKind::Code,
      "INLINE_CODE_RE",
      r"`([^`\n\x01]+)`",
      2,
      |text, full, _| not_adjacent_to(text, full, &['`']),
    ),
    InlinePattern::new(
      AnnotationKind::Strikethrough,
      "STRIKETHROUGH_RE",
      r"~~([^\n\x01]+?)~~",
      4,
      flanked,
    ),
    InlinePattern::new(
      AnnotationKind::Spoiler,
      "SPOILER_RE",
      r"\[([^\[\]\n\x01]+)\]",
      2,
      spoiler_guard,
    ),
  ]
});

/// The shared, read-only pattern table in priority order.
pub(crate) fn patterns() -> &'static [InlinePattern] {
  &PATTERNS
}

fn char_before(text: &str, pos: usize) -> Option<char> {
  text.get(..pos).and_then(|head| head.chars().next_back())
}

fn char_after(text: &str, pos: usize) -> Option<char> {
  text.get(pos..).and_then(|tail| tail.chars().next())
}

/// Inner text must not start or end with whitespace (`* not italic *`).
fn flanked(text: &str, _full: &Range<usize>, inner: &Range<usize>) -> bool {
  text.get(inner.clone()).is_some_and(|inner| {
    !inner.starts_with(char::is_whitespace) && !inner.ends_with(char::is_whitespace)
  })
}

fn not_adjacent_to(text: &str, full: &Range<usize>, chars: &[char]) -> bool {
  !char_before(text, full.start).is_some_and(|c| chars.contains(&c))
    && !char_after(text, full.end).is_some_and(|c| chars.contains(&c))
}

/// `snake_case_names` must stay literal.
fn not_intraword(text: &str, full: &Range<usize>) -> bool {
  !char_before(text, full.start).is_some_and(char::is_alphanumeric)
    && !char_after(text, full.end).is_some_and(char::is_alphanumeric)
}

/// `[x]` is a spoiler unless it is a link (`[x](url)`), part of a wikilink
/// (`[[x]]`), an image (`![x]`) or a task box (`[ ]`, or `- [x]` opening a
/// list item).
fn spoiler_guard(text: &str, full: &Range<usize>, inner: &Range<usize>) -> bool {
  let Some(content) = text.get(inner.clone()) else {
    return false;
  };
  !content.trim().is_empty()
    && !(matches!(content, "x" | "X") && opens_list_item(text, full.start))
    && !matches!(char_before(text, full.start), Some('[' | '!'))
    && !matches!(char_after(text, full.end), Some('(' | ']'))
}

// Everything on the line before a task box: `- `, `* `, `+ ` or `1. `.
static LIST_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex("LIST_MARKER_RE", r"^[ \t]*(?:[-*+]|\d+[.)])[ \t]+$")
});

fn opens_list_item(text: &str, pos: usize) -> bool {
  text.get(..pos).is_some_and(|head| {
    let line = head.rsplit('\n').next().unwrap_or(head);
    LIST_MARKER_RE.is_match(line)
  })
}

/// A match may wrap a whole link target but never reach into one, or
/// `[a](https://x.test/_a_)` would lose part of its URL.
fn splits_target(targets: &[Range<usize>], full: &Range<usize>) -> bool {
  targets.iter().any(|target| {
    let overlaps = target.start < full.end && full.start < target.end;
    let wraps = full.start <= target.start && target.end <= full.end;
    overlaps && !wraps
  })
}

/// A match of one pattern in pre-collapse coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InlineMatch {
  pub full:    Range<usize>,
  pub inner:   Range<usize>,
  /// Row of the pattern table, used to break ties between equal starts.
  pub pattern: usize,
}

/// Find the matches of every pattern, sorted by start, with any match
/// overlapping an earlier one discarded.
pub(crate) fn find_matches(text: &str) -> Vec<InlineMatch> {
  let targets = link_targets(text);
  let mut found = Vec::new();

  for (idx, pattern) in patterns().iter().enumerate() {
    let mut pos = 0;
    while let Some(caps) = pattern.regex.captures_at(text, pos) {
      let (Some(full), Some(inner)) = (caps.get(0), caps.get(1)) else {
        break;
      };
      let (full, inner) = (full.range(), inner.range());
      if (pattern.guard)(text, &full, &inner) && !splits_target(&targets, &full) {
        pos = full.end;
        found.push(InlineMatch {
          full,
          inner,
          pattern: idx,
        });
      } else {
        // Retry from the next character so a rejected match does not hide
        // a valid one starting inside it.
        pos = full.start + char_after(text, full.start).map_or(1, char::len_utf8);
      }
    }
  }

  found.sort_by_key(|m| (m.full.start, m.pattern));

  let mut kept: Vec<InlineMatch> = Vec::with_capacity(found.len());
  for m in found {
    if kept.last().is_none_or(|last| m.full.start >= last.full.end) {
      kept.push(m);
    }
  }
  kept
}

/// Collapse inline markup in `text`, returning the plain text and one span
/// per collapsed match.
pub(crate) fn apply_inline_patterns(text: &str) -> (String, Vec<Span>) {
  let matches = find_matches(text);
  let table = patterns();

  let mut spans = Vec::with_capacity(matches.len());
  let mut offset_delta = 0;
  for m in &matches {
    let Some(pattern) = table.get(m.pattern) else {
      continue;
    };
    let start = m.full.start - offset_delta;
    spans.push(Span::new(
      pattern.kind.clone(),
      start,
      start + m.inner.len(),
    ));
    offset_delta += pattern.removed;
  }

  let mut out = text.to_string();
  for m in matches.iter().rev() {
    let inner = text.get(m.inner.clone()).unwrap_or_default();
    out.replace_range(m.full.clone(), inner);
  }

  trace!(
    "inline: {} matches, {} bytes removed",
    spans.len(),
    offset_delta
  );
  (out, spans)
}
