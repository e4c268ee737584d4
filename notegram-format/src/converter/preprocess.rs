//! Frontmatter and top-level heading removal.
use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use super::blocks::SENTINEL;
use crate::{options::ConversionOptions, utils::compile_regex};

static FRONTMATTER_OPEN_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex("FRONTMATTER_OPEN_RE", r"\A---[ \t]*\n"));

static FRONTMATTER_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex("FRONTMATTER_CLOSE_RE", r"(?m)^---[ \t]*(?:\n|\z)")
});

static TOP_HEADING_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex("TOP_HEADING_RE", r"^# "));

/// Normalize the raw document and apply the optional stripping steps.
pub(crate) fn preprocess(markdown: &str, options: &ConversionOptions) -> String {
  let mut text = normalize(markdown);

  if options.strip_frontmatter {
    text = strip_frontmatter(&text).to_string();
  }
  if options.strip_top_heading {
    text = strip_top_headings(&text);
  }

  trace!(
    "preprocess: {} bytes in, {} bytes out",
    markdown.len(),
    text.len()
  );
  text
}

/// Unify line endings and remove the placeholder sentinel, which must never
/// appear in document text.
fn normalize(markdown: &str) -> String {
  markdown
    .replace("\r\n", "\n")
    .replace('\r', "\n")
    .replace(SENTINEL, "")
}

/// Remove a leading `---` fenced block. An opening fence without a closing
/// one means there is no frontmatter.
pub(crate) fn strip_frontmatter(text: &str) -> &str {
  let Some(open) = FRONTMATTER_OPEN_RE.find(text) else {
    return text;
  };
  FRONTMATTER_CLOSE_RE
    .find_at(text, open.end())
    .map_or(text, |close| &text[close.end()..])
}

/// Remove `# ` heading lines outside fenced code blocks.
pub(crate) fn strip_top_headings(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut in_fence = false;

  for line in text.split_inclusive('\n') {
    if line.trim_start().starts_with("```") {
      in_fence = !in_fence;
    }
    if !in_fence && TOP_HEADING_RE.is_match(line) {
      continue;
    }
    out.push_str(line);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_strip_frontmatter() {
    let text = "---\ntitle: Note\ntags: [a]\n---\nBody";
    assert_eq!(strip_frontmatter(text), "Body");
  }

  #[test]
  fn test_unterminated_frontmatter_is_kept() {
    let text = "---\ntitle: Note\nBody without fence";
    assert_eq!(strip_frontmatter(text), text);
  }

  #[test]
  fn test_frontmatter_must_open_document() {
    let text = "Intro\n---\nnot: frontmatter\n---\n";
    assert_eq!(strip_frontmatter(text), text);
  }

  #[test]
  fn test_frontmatter_closing_at_end_of_input() {
    assert_eq!(strip_frontmatter("---\na: 1\n---"), "");
  }

  #[test]
  fn test_strip_top_headings() {
    let text = "# Title\nIntro\n## Section\n#tag";
    assert_eq!(strip_top_headings(text), "Intro\n## Section\n#tag");
  }

  #[test]
  fn test_strip_top_headings_skips_code() {
    let text = "```python\n# comment\n```\n# Title";
    assert_eq!(strip_top_headings(text), "```python\n# comment\n```\n");
  }

  #[test]
  fn test_preprocess_is_idempotent_without_markers() {
    let options = ConversionOptions::default();
    let text = "Just a note\nwith two lines";
    assert_eq!(preprocess(text, &options), text);
    assert_eq!(preprocess(&preprocess(text, &options), &options), text);
  }

  #[test]
  fn test_preprocess_normalizes_line_endings_and_sentinels() {
    let options = ConversionOptions::default();
    assert_eq!(preprocess("a\r\nb\u{1}c\rd", &options), "a\nbc\nd");
  }

  #[test]
  fn test_preprocess_respects_flags() {
    let options = ConversionOptions {
      strip_frontmatter: false,
      strip_top_heading: false,
      ..Default::default()
    };
    let text = "---\na: 1\n---\n# Title";
    assert_eq!(preprocess(text, &options), text);
  }
}
