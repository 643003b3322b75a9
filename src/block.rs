//! Line-level stages: headers, lists and paragraph assembly.
//!
//! These run after escaping and code extraction, so a `<` seen here was
//! emitted by an earlier stage and never comes from user text.

use crate::code::is_block_token;
use crate::options::Options;

/* ================================ Headers =============================== */

/// `# t`, `## t`, `### t` → `<h1>`..`<h3>`.
pub(crate) fn headers(text: &str) -> String {
    map_lines(text, |line, out| match heading(line) {
        Some((level, body)) => {
            out.push_str(&format!("<h{level}>{body}</h{level}>"));
        }
        None => out.push_str(line),
    })
}

fn heading(line: &str) -> Option<(usize, &str)> {
    // ^#{1,3} (.+)$
    let bytes = line.as_bytes();
    let level = bytes.iter().take_while(|&&b| b == b'#').count();
    if !(1..=3).contains(&level) || bytes.get(level) != Some(&b' ') {
        return None;
    }
    let body = &line[level + 1..];
    (!body.is_empty()).then_some((level, body))
}

/* ================================= Lists ================================ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn open_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "<ul>",
            ListKind::Ordered => "<ol>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "</ul>",
            ListKind::Ordered => "</ol>",
        }
    }
}

fn bullet_item(line: &str) -> Option<&str> {
    // ^- (.+)$
    let body = line.strip_prefix("- ")?;
    (!body.is_empty()).then_some(body)
}

fn ordered_item(line: &str) -> Option<&str> {
    // ^\d+\. (.+)$
    let bytes = line.as_bytes();
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let body = line[digits..].strip_prefix(". ")?;
    (!body.is_empty()).then_some(body)
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    bullet_item(line)
        .map(|body| (ListKind::Unordered, body))
        .or_else(|| ordered_item(line).map(|body| (ListKind::Ordered, body)))
}

/// Item lines → `<li>`; each run of adjacent items of one kind becomes a
/// single `<ul>` or `<ol>` line.
pub(crate) fn lists(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut open: Option<ListKind> = None;
    let mut first_line = true;

    let mut start_line = |out: &mut String| {
        if !first_line {
            out.push('\n');
        }
        first_line = false;
    };

    for line in text.split('\n') {
        match list_item(line) {
            Some((kind, body)) => {
                if open != Some(kind) {
                    if let Some(prev) = open {
                        out.push_str(prev.close_tag());
                    }
                    start_line(&mut out);
                    out.push_str(kind.open_tag());
                    open = Some(kind);
                }
                out.push_str("<li>");
                out.push_str(body);
                out.push_str("</li>");
            }
            None => {
                if let Some(prev) = open.take() {
                    out.push_str(prev.close_tag());
                }
                start_line(&mut out);
                out.push_str(line);
            }
        }
    }
    if let Some(prev) = open {
        out.push_str(prev.close_tag());
    }
    out
}

/* =============================== Paragraphs ============================= */

const BLOCK_PREFIXES: [&str; 5] = ["<h1>", "<h2>", "<h3>", "<ul>", "<ol>"];

fn is_block_line(line: &str) -> bool {
    BLOCK_PREFIXES.iter().any(|p| line.starts_with(p)) || is_block_token(line)
}

/// Blank lines separate paragraphs. Block lines are emitted bare; every run
/// of other lines is wrapped in `<p>`. Pieces are joined without separators.
pub(crate) fn paragraphs(text: &str, options: &Options) -> String {
    let soft_break = if options.hard_line_breaks { "<br>\n" } else { "\n" };
    let mut out = String::with_capacity(text.len() + 16);
    let mut para: Vec<&str> = Vec::new();

    let flush = |para: &mut Vec<&str>, out: &mut String| {
        if para.is_empty() {
            return;
        }
        out.push_str("<p>");
        out.push_str(&para.join(soft_break));
        out.push_str("</p>");
        para.clear();
    };

    for line in text.split('\n') {
        if line.trim().is_empty() {
            flush(&mut para, &mut out);
        } else if is_block_line(line) {
            flush(&mut para, &mut out);
            out.push_str(line);
        } else {
            para.push(line);
        }
    }
    flush(&mut para, &mut out);
    out
}

fn map_lines(text: &str, mut f: impl FnMut(&str, &mut String)) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        f(line, &mut out);
    }
    out
}
