#![allow(clippy::unwrap_used, reason = "Fine in tests")]
//! Structural guarantees checked over combinations of note fragments.
use notegram_format::{
  ConversionOptionsBuilder,
  ConversionResult,
  MarkdownConverter,
  utils::utf16_len,
};

const FRAGMENTS: &[&str] = &[
  "plain words",
  "**bold**",
  "__bold__",
  "*italic*",
  "_italic_",
  "`code`",
  "~~gone~~",
  "[secret]",
  "[link](https://x.test/a_b)",
  "![alt](img.png)",
  "[[Wiki Page|alias]]",
  "## Heading **with bold**",
  "# Title",
  "> quote with **bold**",
  "> [!note]- Folded\n> body",
  "```rust\nlet v = vec![1];\n```",
  "snake_case_name",
  "2 * 3 * 4",
  "😀 emoji ü",
  "**unclosed",
  "- [ ] task",
  "\n\n\n",
];

const JOINERS: &[&str] = &[" ", "\n", "\n\n"];

fn check(input: &str, result: &ConversionResult, limit: usize) {
  let len = utf16_len(&result.text);
  assert!(len <= limit, "{input:?}: length {len} over {limit}");
  assert_eq!(result.len(), len);

  for (i, a) in result.annotations.iter().enumerate() {
    assert!(a.length > 0, "{input:?}: empty {a:?}");
    assert!(a.end() <= len, "{input:?}: {a:?} past end {len}");

    for b in &result.annotations[i + 1..] {
      assert!(a.offset <= b.offset, "{input:?}: unsorted {a:?} {b:?}");
      let overlap = a.offset < b.end() && b.offset < a.end();
      assert!(
        !overlap || a.kind.is_compatible_with(&b.kind),
        "{input:?}: {a:?} overlaps {b:?}"
      );
    }
  }
}

#[test]
fn test_pairs_are_well_formed() {
  let converter = MarkdownConverter::default();
  let limit = converter.options().max_length;

  for a in FRAGMENTS {
    for b in FRAGMENTS {
      for joiner in JOINERS {
        let input = format!("{a}{joiner}{b}");
        check(&input, &converter.convert(&input), limit);
      }
    }
  }
}

#[test]
fn test_truncated_pairs_are_well_formed() {
  for limit in [1, 5, 12, 30] {
    let converter =
      MarkdownConverter::new(ConversionOptionsBuilder::new().max_length(limit).build());
    for a in FRAGMENTS {
      for b in FRAGMENTS {
        let input = format!("{a} {b}\n{a}");
        let result = converter.convert(&input);
        check(&input, &result, limit);
        if result.truncated {
          assert!(result.original_length > limit);
        }
      }
    }
  }
}

#[test]
fn test_plain_text_is_a_fixed_point() {
  let converter = MarkdownConverter::default();
  for input in [
    "nothing to see",
    "line one\nline two",
    "prices: 3 * 4 and 5 - 2",
    "paths like a_b and snake_case",
    "ünïcödé 😀 text",
  ] {
    let result = converter.convert(input);
    assert_eq!(result.text, input);
    assert!(result.annotations.is_empty(), "{input:?}");
  }
}

#[test]
fn test_conversion_is_deterministic() {
  let converter = MarkdownConverter::default();
  let input = FRAGMENTS.join("\n");
  let first = converter.convert(&input);
  for _ in 0..3 {
    assert_eq!(converter.convert(&input), first);
  }
  let json = serde_json::to_string(&first.entities()).unwrap();
  assert!(json.starts_with('['));
}
