//! Code extraction and restoration.
//!
//! Fenced blocks and inline spans are cut out of the text before any other
//! structural stage runs and parked in a [`Stash`]. What remains in the text
//! is a placeholder token:
//!
//! ```text
//! U+E000 <index> U+E002    fenced block
//! U+E001 <index> U+E002    inline span
//! ```
//!
//! The escape stage rewrites these code points in user input as numeric
//! references, so every marker seen after escaping was put there by us.

use std::fmt::Write as _;

use memchr::memchr;
use tracing::trace;

use crate::options::Options;

pub(crate) const BLOCK_MARK: char = '\u{E000}';
pub(crate) const INLINE_MARK: char = '\u{E001}';
pub(crate) const TOKEN_END: char = '\u{E002}';

// UTF-8 of the marks above: EE 80 80 / EE 80 81 / EE 80 82.
const MARK_LEAD: u8 = 0xEE;
const MARK_LEN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Block,
    Inline,
}

impl Kind {
    fn mark(self) -> char {
        match self {
            Kind::Block => BLOCK_MARK,
            Kind::Inline => INLINE_MARK,
        }
    }
}

#[derive(Debug)]
struct Entry {
    kind: Kind,
    markup: String,
}

/// Arena of rendered code markup, indexed by placeholder number.
#[derive(Debug, Default)]
pub(crate) struct Stash {
    entries: Vec<Entry>,
}

impl Stash {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn park(&mut self, kind: Kind, markup: String, out: &mut String) {
        let index = self.entries.len();
        self.entries.push(Entry { kind, markup });
        out.push(kind.mark());
        let _ = write!(out, "{index}");
        out.push(TOKEN_END);
    }

    /// Replace every placeholder in `text` with its markup.
    pub(crate) fn restore(&self, text: &str) -> String {
        if self.entries.is_empty() {
            return text.to_string();
        }
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        let mut seg_start = 0usize;
        let mut i = 0usize;

        while let Some(at) = memchr(MARK_LEAD, &bytes[i..]).map(|off| i + off) {
            match self.token_at(&text[at..]) {
                Some((entry, len)) => {
                    out.push_str(&text[seg_start..at]);
                    out.push_str(&entry.markup);
                    i = at + len;
                    seg_start = i;
                }
                None => i = at + 1,
            }
        }
        out.push_str(&text[seg_start..]);
        out
    }

    /// Parse a token at the start of `s`; returns the entry and token length.
    fn token_at(&self, s: &str) -> Option<(&Entry, usize)> {
        let kind = if s.starts_with(BLOCK_MARK) {
            Kind::Block
        } else if s.starts_with(INLINE_MARK) {
            Kind::Inline
        } else {
            return None;
        };
        let rest = &s[MARK_LEN..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !rest[digits..].starts_with(TOKEN_END) {
            return None;
        }
        let index: usize = rest[..digits].parse().ok()?;
        let entry = self.entries.get(index).filter(|e| e.kind == kind)?;
        Some((entry, MARK_LEN + digits + MARK_LEN))
    }
}

/// True when `line` is exactly one fenced-block placeholder.
pub(crate) fn is_block_token(line: &str) -> bool {
    line.strip_prefix(BLOCK_MARK)
        .and_then(|rest| rest.strip_suffix(TOKEN_END))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/* ============================== Extraction ============================== */

/// Cut fenced blocks and inline spans out of `text`, left to right.
pub(crate) fn extract(text: &str, options: &Options, stash: &mut Stash) -> String {
    let bytes = text.as_bytes();
    let n = text.len();
    let mut out = String::with_capacity(n);
    let mut pos = 0usize;
    // Set once a closing-line search hits EOF: no later opener can close either.
    let mut closers_exhausted = false;

    while pos < n {
        let mut line_end = memchr(b'\n', &bytes[pos..]).map_or(n, |off| pos + off);
        let line = &text[pos..line_end];

        let fence = match fence_open(line) {
            Some(tag) if !closers_exhausted && line_end < n => {
                let found = find_fence_close(text, line_end + 1);
                if found.is_none() {
                    trace!(offset = pos, "unterminated code fence kept as text");
                    closers_exhausted = true;
                }
                found.map(|close| (tag, close))
            }
            _ => None,
        };

        match fence {
            Some((tag, (close_start, close_end))) => {
                let body_start = line_end + 1;
                let body = if close_start > body_start {
                    &text[body_start..close_start - 1]
                } else {
                    ""
                };
                stash.park(Kind::Block, fence_markup(tag, body, options), &mut out);
                line_end = close_end;
            }
            None => extract_inline(line, stash, &mut out),
        }

        if line_end < n {
            out.push('\n');
        }
        pos = line_end + 1;
    }
    out
}

/// `line` opens a fence: optional indent, exactly three backticks, optional
/// tag with no further backticks. Returns the tag (possibly empty).
fn fence_open(line: &str) -> Option<&str> {
    // ^[ \t]*```[^`]*$
    let rest = line.trim_start_matches([' ', '\t']).strip_prefix("```")?;
    if rest.contains('`') {
        return None;
    }
    Some(rest.split_whitespace().next().unwrap_or(""))
}

fn is_fence_close(line: &str) -> bool {
    line.trim() == "```"
}

/// Find the first closing line at or after `from`; returns its (start, end).
fn find_fence_close(text: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let n = text.len();
    let mut pos = from;
    while pos <= n {
        let end = memchr(b'\n', &bytes[pos..]).map_or(n, |off| pos + off);
        if is_fence_close(&text[pos..end]) {
            return Some((pos, end));
        }
        if end == n {
            break;
        }
        pos = end + 1;
    }
    None
}

fn fence_markup(tag: &str, body: &str, options: &Options) -> String {
    let body = trim_fence_body(body);
    if options.fence_language_class && is_language_tag(tag) {
        format!("<pre><code class=\"language-{tag}\">{body}</code></pre>")
    } else {
        format!("<pre><code>{body}</code></pre>")
    }
}

/// Drop leading blank lines and trailing whitespace; indentation inside the
/// body is kept.
fn trim_fence_body(body: &str) -> &str {
    let mut start = 0usize;
    for line in body.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    body[start..].trim_end()
}

fn is_language_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-' | b'.' | b'#'))
}

/// Inline spans: one backtick, non-empty content with no backtick, one
/// backtick. `line` holds no newline.
fn extract_inline(line: &str, stash: &mut Stash, out: &mut String) {
    let bytes = line.as_bytes();
    let mut seg_start = 0usize;
    let mut i = 0usize;

    while let Some(open) = memchr(b'`', &bytes[i..]).map(|off| i + off) {
        let Some(close) = memchr(b'`', &bytes[open + 1..]).map(|off| open + 1 + off) else {
            break;
        };
        if close == open + 1 {
            // `` is not a span; the second tick may still open one
            i = close;
            continue;
        }
        out.push_str(&line[seg_start..open]);
        let markup = format!("<code>{}</code>", &line[open + 1..close]);
        stash.park(Kind::Inline, markup, out);
        i = close + 1;
        seg_start = i;
    }
    out.push_str(&line[seg_start..]);
}
