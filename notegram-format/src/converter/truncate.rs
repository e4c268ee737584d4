//! Length limiting.
use log::debug;

use super::span::Span;
use crate::utils::{byte_index_for_utf16, utf16_len};

/// Appended to truncated text.
pub const ELLIPSIS: &str = "…";

/// Cut `text` to at most `max_length` UTF-16 code units, marker included.
///
/// The cut prefers the last whitespace before the limit when it lies within
/// the last fifth of the allowed length, and falls back to a hard cut. Spans
/// reaching past the cut are dropped whole. Returns whether the text was
/// cut.
pub(crate) fn truncate(text: &mut String, spans: &mut Vec<Span>, max_length: usize) -> bool {
  let length = utf16_len(text);
  if length <= max_length {
    return false;
  }

  let marker_len = utf16_len(ELLIPSIS);
  let (budget, marker) = if max_length > marker_len {
    (max_length - marker_len, ELLIPSIS)
  } else {
    (max_length, "")
  };

  let hard_cut = byte_index_for_utf16(text, budget);
  let soft_cut = text
    .get(..hard_cut)
    .and_then(|head| head.rfind(char::is_whitespace))
    .filter(|&ws| utf16_len(&text[..ws]) * 5 >= budget * 4);
  let cut = soft_cut.unwrap_or(hard_cut);

  text.truncate(cut);
  let kept_before = spans.len();
  spans.retain(|span| span.end <= cut);
  text.push_str(marker);

  debug!(
    "truncate: {length} -> {} code units, {} annotations dropped",
    utf16_len(text),
    kept_before - spans.len()
  );
  true
}
