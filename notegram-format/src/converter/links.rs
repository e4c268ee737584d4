//! Markdown links and wikilinks.
use std::{ops::Range, sync::LazyLock};

use log::trace;
use regex::Regex;

use super::span::{Edit, Span, overlaps_verbatim};
use crate::{types::AnnotationKind, utils::compile_regex};

// `[display](url)`, or `![alt](src)` for images.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    "LINK_RE",
    r"!?\[([^\[\]\n\x01]+)\]\(([^()\s\x01]+)\)",
  )
});

// `[[target]]`, `[[target|alias]]` and embeds `![[target]]`.
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    "WIKILINK_RE",
    r"!?\[\[([^\[\]|\n\x01]+)(?:\|([^\[\]\n\x01]+))?\]\]",
  )
});

/// Byte ranges of the `(url)` targets of Markdown links and images in
/// `text`, without the parentheses.
pub(crate) fn link_targets(text: &str) -> Vec<Range<usize>> {
  LINK_RE
    .captures_iter(text)
    .filter_map(|caps| caps.get(2).map(|url| url.range()))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkMatch {
  full:    Range<usize>,
  display: Range<usize>,
  url:     Option<String>,
}

fn find_links(text: &str) -> Vec<LinkMatch> {
  let mut found: Vec<LinkMatch> = LINK_RE
    .captures_iter(text)
    .filter_map(|caps| {
      Some(LinkMatch {
        full:    caps.get(0)?.range(),
        display: caps.get(1)?.range(),
        url:     Some(caps.get(2)?.as_str().to_string()),
      })
    })
    .collect();

  found.extend(WIKILINK_RE.captures_iter(text).filter_map(|caps| {
    let display = caps.get(2).or_else(|| caps.get(1))?;
    Some(LinkMatch {
      full:    caps.get(0)?.range(),
      display: display.range(),
      url:     None,
    })
  }));

  found.sort_by_key(|link| link.full.start);
  let mut kept: Vec<LinkMatch> = Vec::with_capacity(found.len());
  for link in found {
    if kept.last().is_none_or(|last| link.full.start >= last.full.end) {
      kept.push(link);
    }
  }
  kept
}

/// Collapse links to their display text, right to left, emitting a `Link`
/// span for each Markdown link when `keep_links` is set. Links touching code
/// stay literal.
pub(crate) fn resolve_links(text: &mut String, spans: &mut Vec<Span>, keep_links: bool) {
  let links: Vec<LinkMatch> = find_links(text)
    .into_iter()
    .filter(|link| !overlaps_verbatim(spans, &link.full))
    .collect();

  for link in links.iter().rev() {
    let edit = Edit::keep(text, link.full.clone(), link.display.clone());
    let display_len = edit.replacement.len();
    edit.apply(text, spans);

    if keep_links && let Some(url) = &link.url {
      let start = link.full.start;
      spans.push(Span::new(
        AnnotationKind::Link { url: url.clone() },
        start,
        start + display_len,
      ));
    }
  }

  trace!("links: {} resolved", links.len());
}
