//! Line-oriented regex search over a [`Document`].
//!
//! The locator never parses the document: every lookup is a regular-expression scan, either
//! line by line ([`find_location`], [`find_lines`]) or over the full text
//! ([`find_enclosing_match`]). Columns in results are character offsets.

use crate::document::{Document, Position, Range};
use regex::{Captures, Regex};

/// An owned regex match: the capture groups plus the pattern that produced them.
#[derive(Debug, Clone)]
pub struct CapturedMatch {
    groups: Vec<Option<String>>,
    pattern: Regex,
}

impl CapturedMatch {
    /// Capture all groups of `caps`, which `pattern` produced.
    pub fn from_captures(caps: &Captures<'_>, pattern: &Regex) -> Self {
        Self {
            groups: caps
                .iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect(),
            pattern: pattern.clone(),
        }
    }

    /// Text of the whole match (group 0).
    pub fn matched(&self) -> &str {
        self.group(0).unwrap_or("")
    }

    /// Text of capture group `index`, if it participated in the match.
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    /// The pattern that produced this match.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Re-apply the originating pattern to the matched text, replacing its first match with
    /// `replacement`.
    ///
    /// Recognized tokens in `replacement`: `$$`, `$&` (whole match), `` $` `` / `$'` (text before /
    /// after the match), `$n` / `$nn` (group 1 to 99; the two-digit form wins when that group
    /// exists) and, when the pattern has named groups, `$<name>`. Any other `$` is kept
    /// literally, so `$1_old` is group 1 followed by `_old`.
    ///
    /// If the pattern does not match its own matched text (e.g. an anchored pattern), the
    /// matched text is returned unchanged.
    pub fn substitute(&self, replacement: &str) -> String {
        let haystack = self.matched();
        let named = self.pattern.capture_names().flatten().next().is_some();
        self.pattern
            .replacen(haystack, 1, |caps: &Captures<'_>| {
                expand_replacement(caps, haystack, replacement, named)
            })
            .into_owned()
    }
}

/// Text a single `$` token stands for, and how many bytes after the `$` it spans.
fn expand_token<'h>(
    caps: &Captures<'h>,
    haystack: &'h str,
    token: &str,
    named: bool,
) -> Option<(&'h str, usize)> {
    let whole = caps.get(0)?;
    let group = |index: usize| caps.get(index).map_or("", |m| m.as_str());
    let groups = caps.len() - 1;
    let bytes = token.as_bytes();

    match *bytes.first()? {
        b'$' => Some(("$", 1)),
        b'&' => Some((whole.as_str(), 1)),
        b'`' => Some((&haystack[..whole.start()], 1)),
        b'\'' => Some((&haystack[whole.end()..], 1)),
        b'<' if named => {
            let close = token.find('>')?;
            let value = caps.name(&token[1..close]).map_or("", |m| m.as_str());
            Some((value, close + 1))
        }
        first @ b'0'..=b'9' => {
            let first = usize::from(first - b'0');
            if let Some(second @ b'0'..=b'9') = bytes.get(1).copied() {
                let index = first * 10 + usize::from(second - b'0');
                if (1..=groups).contains(&index) {
                    return Some((group(index), 2));
                }
            }
            (1..=groups).contains(&first).then(|| (group(first), 1))
        }
        _ => None,
    }
}

/// Expand `replacement` for one match of a pattern against `haystack`.
fn expand_replacement(
    caps: &Captures<'_>,
    haystack: &str,
    replacement: &str,
    named: bool,
) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut rest = replacement;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let token = &rest[dollar + 1..];
        match expand_token(caps, haystack, token, named) {
            Some((value, len)) => {
                out.push_str(value);
                rest = &token[len..];
            }
            None => {
                out.push('$');
                rest = token;
            }
        }
    }

    out.push_str(rest);
    out
}

/// A match found by [`find_location`].
#[derive(Debug, Clone)]
pub struct LocatedMatch {
    /// Capture groups and originating pattern.
    pub captured: CapturedMatch,
    /// Line of the match.
    pub line: usize,
    /// Start column (characters).
    pub start_column: usize,
    /// End column (characters, exclusive).
    pub end_column: usize,
}

impl LocatedMatch {
    /// Document range covered by the match.
    pub fn range(&self) -> Range {
        Range::new(
            Position::new(self.line, self.start_column),
            Position::new(self.line, self.end_column),
        )
    }
}

fn char_column(text: &str, byte_offset: usize) -> usize {
    text.get(..byte_offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or_else(|| text.chars().count())
}

/// Find the first match of a sequence of patterns.
///
/// Patterns are chased in order: scanning starts at the top of the document for the first
/// pattern, and each following pattern resumes exactly where the previous one's match ended
/// (same line, same column). The result is the last pattern's match.
///
/// Once any pattern has matched, a line on which the current pattern does not match is tested
/// against `stop` (from the current column); a stop hit aborts the search with `None`.
pub fn find_location(
    document: &Document,
    patterns: &[Regex],
    stop: Option<&Regex>,
) -> Option<LocatedMatch> {
    let line_count = document.line_count();
    let mut line = 0usize;
    let mut from_byte = 0usize;
    let mut test_stop = false;
    let mut found: Option<LocatedMatch> = None;

    for pattern in patterns {
        found = None;
        while line < line_count {
            let text = document.line_text(line).unwrap_or_default();
            let start = from_byte.min(text.len());

            if let Some(caps) = pattern.captures_at(&text, start) {
                let Some(whole) = caps.get(0) else {
                    break;
                };
                from_byte = whole.end();
                test_stop = true;
                found = Some(LocatedMatch {
                    captured: CapturedMatch::from_captures(&caps, pattern),
                    line,
                    start_column: char_column(&text, whole.start()),
                    end_column: char_column(&text, whole.end()),
                });
                break;
            }

            if test_stop && stop.is_some_and(|stop| stop.find_at(&text, start).is_some()) {
                return None;
            }

            line += 1;
            from_byte = 0;
        }
    }

    found
}

/// Line numbers on which `pattern` matches, in document order.
pub fn find_lines<'a>(
    document: &'a Document,
    pattern: &'a Regex,
) -> impl Iterator<Item = usize> + 'a {
    (0..document.line_count()).filter(move |&line| {
        document
            .line_text(line)
            .is_some_and(|text| pattern.is_match(&text))
    })
}

/// Character-offset view of a UTF-8 string.
#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self { char_to_byte }
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        match self.char_to_byte.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }
}

/// Find the match of `pattern` whose span covers `cursor` (a character offset into `text`).
///
/// All matches are scanned in document order and the last covering one wins. Spans are
/// inclusive at both ends, so a cursor sitting right after a word still selects it.
pub fn find_enclosing_match(
    text: &str,
    pattern: &Regex,
    cursor: usize,
) -> Option<(CapturedMatch, usize, usize)> {
    let index = CharIndex::new(text);
    let mut last = None;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let start = index.byte_to_char(whole.start());
        if start > cursor {
            break;
        }
        let end = index.byte_to_char(whole.end());
        if cursor <= end {
            last = Some((CapturedMatch::from_captures(&caps, pattern), start, end));
        }
    }

    last
}

/// Character offset of the first occurrence of `needle` in `document`.
///
/// One trailing `\n` is trimmed from `needle` first, so a line-terminated snippet is found
/// even when it sits on the last line of the document.
pub fn find_literal(document: &Document, needle: &str) -> Option<usize> {
    let needle = needle.strip_suffix('\n').unwrap_or(needle);
    let text = document.text();
    text.find(needle)
        .map(|byte_offset| CharIndex::new(&text).byte_to_char(byte_offset))
}
