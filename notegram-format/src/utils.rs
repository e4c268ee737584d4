//! Regex and UTF-16 helpers shared by the conversion stages.
use log::error;
use regex::Regex;

/// Compile a pattern used by a `LazyLock` static.
///
/// Patterns are compile-time constants, so a failure here is a bug. Rather
/// than panicking mid-conversion, the failure is logged and a regex that
/// never matches is returned, which leaves the affected syntax literal.
#[must_use]
pub fn compile_regex(name: &str, pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    error!(
      "Failed to compile {name} regex: {e}\n Falling back to never matching \
       regex."
    );
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// Used as a fallback pattern when a regex fails to compile. It will never
/// match any input, which is safer than using a trivial regex like `^$`
/// which would match empty strings.
#[must_use]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(
      clippy::expect_used,
      reason = "This pattern is guaranteed to be valid"
    )]
    Regex::new(r"^\b$").expect("regex pattern ^\\b$ should always compile")
  })
}

/// Length of `text` in UTF-16 code units.
#[must_use]
pub fn utf16_len(text: &str) -> usize {
  text.chars().map(char::len_utf16).sum()
}

/// Translates byte offsets of one string into UTF-16 offsets.
///
/// Built once per final text so annotation conversion does not rescan the
/// string for every span.
pub(crate) struct Utf16Index {
  /// `(byte_offset, utf16_offset)` for every char boundary, plus the end.
  boundaries: Vec<(usize, usize)>,
}

impl Utf16Index {
  pub(crate) fn new(text: &str) -> Self {
    let mut boundaries = Vec::with_capacity(text.len() + 1);
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
      boundaries.push((byte, units));
      units += ch.len_utf16();
    }
    boundaries.push((text.len(), units));
    Self { boundaries }
  }

  /// UTF-16 offset for a byte offset, or `None` if the byte offset is not a
  /// char boundary of the indexed text.
  pub(crate) fn to_utf16(&self, byte: usize) -> Option<usize> {
    self
      .boundaries
      .binary_search_by_key(&byte, |&(b, _)| b)
      .ok()
      .and_then(|idx| self.boundaries.get(idx))
      .map(|&(_, units)| units)
  }
}

/// Largest char boundary of `text` whose UTF-16 prefix length is at most
/// `units`.
#[must_use]
pub fn byte_index_for_utf16(text: &str, units: usize) -> usize {
  let mut seen = 0;
  for (byte, ch) in text.char_indices() {
    let next = seen + ch.len_utf16();
    if next > units {
      return byte;
    }
    seen = next;
  }
  text.len()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_utf16_len_counts_surrogate_pairs() {
    assert_eq!(utf16_len("abc"), 3);
    assert_eq!(utf16_len("é"), 1);
    assert_eq!(utf16_len("😀"), 2);
  }

  #[test]
  fn test_index_maps_boundaries() {
    let text = "a😀b";
    let index = Utf16Index::new(text);
    assert_eq!(index.to_utf16(0), Some(0));
    assert_eq!(index.to_utf16(1), Some(1));
    assert_eq!(index.to_utf16(5), Some(3));
    assert_eq!(index.to_utf16(6), Some(4));
    // Inside the emoji.
    assert_eq!(index.to_utf16(2), None);
  }

  #[test]
  fn test_byte_index_never_splits_pairs() {
    let text = "a😀b";
    assert_eq!(byte_index_for_utf16(text, 1), 1);
    assert_eq!(byte_index_for_utf16(text, 2), 1);
    assert_eq!(byte_index_for_utf16(text, 3), 5);
    assert_eq!(byte_index_for_utf16(text, 10), text.len());
  }

  #[test]
  fn test_never_matching_regex() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything"));
  }
}
