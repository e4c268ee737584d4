//! Protection of fenced code blocks and blockquotes.
//!
//! Before inline patterns run, every fenced code block and every run of
//! `>`-prefixed lines is swapped for an opaque placeholder token so inline
//! syntax inside them is never matched. The replaced content lives in a
//! [`BlockArena`] for the duration of one conversion and is put back by
//! [`restore`].
use std::sync::LazyLock;

use log::trace;
use regex::{Captures, Regex};

use super::span::Span;
use crate::{types::AnnotationKind, utils::compile_regex};

/// Marker character delimiting placeholder tokens. It is stripped from input
/// during preprocessing, so a token can never collide with document text.
pub(crate) const SENTINEL: char = '\u{1}';

// Fences open and close at the start of a line, so a fence behind `> ` is
// left to the blockquote.
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    "CODE_BLOCK_RE",
    r"(?m)^[ \t]*```([\w+#.-]*)[ \t]*\n([\s\S]*?)\n?^[ \t]*```",
  )
});

static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex("BLOCKQUOTE_RE", r"(?m)^>[^\n]*(?:\n>[^\n]*)*")
});

// `[!note]- Title`: callout type, fold marker, optional title.
static CALLOUT_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex("CALLOUT_RE", r"^\[![^\]\n]+\]([-+]?)[ \t]*(.*)$")
});

/// What kind of construct a placeholder stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum BlockClass {
  Code,
  Quote,
}

impl BlockClass {
  const fn letter(self) -> char {
    match self {
      Self::Code => 'c',
      Self::Quote => 'q',
    }
  }

  const fn from_letter(letter: char) -> Option<Self> {
    match letter {
      'c' => Some(Self::Code),
      'q' => Some(Self::Quote),
      _ => None,
    }
  }
}

/// Opaque handle of a protected block: its class and its index in the
/// arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PlaceholderToken {
  class: BlockClass,
  index: usize,
}

impl PlaceholderToken {
  pub(crate) const fn new(class: BlockClass, index: usize) -> Self {
    Self { class, index }
  }

  /// The token text inserted into the document.
  pub(crate) fn render(self) -> String {
    format!("{SENTINEL}{}{}{SENTINEL}", self.class.letter(), self.index)
  }

  /// Parse the body of a token (the text between the two sentinels).
  fn parse(body: &str) -> Option<Self> {
    let mut chars = body.chars();
    let class = chars.next().and_then(BlockClass::from_letter)?;
    let index = chars.as_str().parse().ok()?;
    Some(Self { class, index })
  }
}

/// A block removed from the text until restoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingBlock {
  pub token:   PlaceholderToken,
  pub content: String,
  pub kind:    Option<AnnotationKind>,
}

/// Protected blocks of a single conversion, indexed by token.
#[derive(Debug, Default)]
pub(crate) struct BlockArena {
  blocks: Vec<PendingBlock>,
}

impl BlockArena {
  /// Store a block and return the token text that stands in for it.
  fn insert(
    &mut self,
    class: BlockClass,
    content: String,
    kind: Option<AnnotationKind>,
  ) -> String {
    let token = PlaceholderToken::new(class, self.blocks.len());
    self.blocks.push(PendingBlock {
      token,
      content,
      kind,
    });
    token.render()
  }

  pub(crate) fn get(&self, token: PlaceholderToken) -> Option<&PendingBlock> {
    self.blocks.get(token.index).filter(|block| block.token == token)
  }

  pub(crate) fn len(&self) -> usize {
    self.blocks.len()
  }
}

/// Replace code blocks, then blockquote runs, with placeholder tokens.
pub(crate) fn protect(
  text: &str,
  arena: &mut BlockArena,
  keep_code_blocks: bool,
) -> String {
  let text = CODE_BLOCK_RE.replace_all(text, |caps: &Captures| {
    let language = caps
      .get(1)
      .map(|m| m.as_str())
      .filter(|lang| !lang.is_empty())
      .map(str::to_string);
    let body = caps.get(2).map_or("", |m| m.as_str()).to_string();
    let kind = keep_code_blocks.then_some(AnnotationKind::Pre { language });
    arena.insert(BlockClass::Code, body, kind)
  });
  let code_blocks = arena.len();

  let text = BLOCKQUOTE_RE.replace_all(&text, |caps: &Captures| {
    let (content, kind) = unquote(&caps[0]);
    arena.insert(BlockClass::Quote, content, Some(kind))
  });

  trace!(
    "protect: {} code blocks, {} blockquotes",
    code_blocks,
    arena.len() - code_blocks
  );
  text.into_owned()
}

/// Strip the `>` markers from a quote run and classify it.
fn unquote(run: &str) -> (String, AnnotationKind) {
  let mut lines: Vec<&str> = run
    .split('\n')
    .map(|line| {
      let line = line.strip_prefix('>').unwrap_or(line);
      line.strip_prefix(' ').unwrap_or(line)
    })
    .collect();

  let mut kind = AnnotationKind::Blockquote;
  if let Some(caps) = lines.first().and_then(|first| CALLOUT_RE.captures(first))
  {
    if caps.get(1).is_some_and(|fold| fold.as_str() == "-") {
      kind = AnnotationKind::ExpandableBlockquote;
    }
    let title = caps.get(2).map_or("", |m| m.as_str().trim_end());
    if title.is_empty() {
      lines.remove(0);
    } else {
      lines[0] = title;
    }
  }

  (lines.join("\n"), kind)
}

/// Put protected blocks back, in order of appearance in the current text.
///
/// For each token: spans after it shift by the length difference, spans
/// containing it grow by it, and then the block's own annotation is added at
/// the token position.
pub(crate) fn restore(text: &mut String, spans: &mut Vec<Span>, arena: &BlockArena) {
  let mut cursor = 0;
  let mut restored = 0;

  while let Some(rel) = text.get(cursor..).and_then(|rest| rest.find(SENTINEL))
  {
    let start = cursor + rel;
    let body_start = start + SENTINEL.len_utf8();
    let Some(body_len) = text.get(body_start..).and_then(|rest| rest.find(SENTINEL))
    else {
      break;
    };
    let end = body_start + body_len + SENTINEL.len_utf8();

    let Some(block) = text
      .get(body_start..body_start + body_len)
      .and_then(PlaceholderToken::parse)
      .and_then(|token| arena.get(token))
    else {
      cursor = end;
      continue;
    };

    let content_len = block.content.len();
    let delta = content_len.cast_signed() - (end - start).cast_signed();
    for span in spans.iter_mut() {
      if span.start > start {
        span.start = span.start.saturating_add_signed(delta);
        span.end = span.end.saturating_add_signed(delta);
      } else if span.end > start {
        span.end = span.end.saturating_add_signed(delta);
      }
    }

    text.replace_range(start..end, &block.content);

    if let Some(kind) = &block.kind
      && content_len > 0
    {
      spans.push(Span::new(kind.clone(), start, start + content_len));
    }

    // Rescan the restored content: a quote may contain a code token.
    cursor = start;
    restored += 1;
  }

  trace!("restore: {restored} blocks restored");
}
