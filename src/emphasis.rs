//! `**bold**` and `*italic*`.
//!
//! Both are matched per line, shortest span first, bold before italic so a
//! `**` pair is never split by the single-asterisk rule. Delimiters do not
//! nest; anything unmatched is left as a literal `*`.

use memchr::{memchr, memchr2, memmem};

const STRONG_OPEN: &str = "<strong>";
const STRONG_CLOSE: &str = "</strong>";

pub(crate) fn apply(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut bolded = String::new();
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        if memchr(b'*', line.as_bytes()).is_none() {
            out.push_str(line);
            continue;
        }
        bolded.clear();
        bold(line, &mut bolded);
        italic(&bolded, &mut out);
    }
    out
}

fn bold(line: &str, out: &mut String) {
    let bytes = line.as_bytes();
    let mut seg_start = 0usize;
    let mut i = 0usize;

    while let Some(open) = memmem::find(&bytes[i..], b"**").map(|off| i + off) {
        // at least one byte of content
        let from = open + 3;
        if from > bytes.len() {
            break;
        }
        let Some(close) = memmem::find(&bytes[from..], b"**").map(|off| from + off) else {
            // no pair for this opener means none for any later one either
            break;
        };
        out.push_str(&line[seg_start..open]);
        out.push_str(STRONG_OPEN);
        out.push_str(&line[open + 2..close]);
        out.push_str(STRONG_CLOSE);
        i = close + 2;
        seg_start = i;
    }
    out.push_str(&line[seg_start..]);
}

/// Single-asterisk spans over the output of [`bold`]. A span may wrap whole
/// `<strong>` elements but never crosses one of their boundaries.
fn italic(line: &str, out: &mut String) {
    let bytes = line.as_bytes();
    let mut seg_start = 0usize;
    let mut i = 0usize;

    'open: while let Some(open) = memchr(b'*', &bytes[i..]).map(|off| i + off) {
        // strong nesting relative to the opener
        let mut depth = 0i32;
        let mut crossed_out = false;
        let mut j = open + 1;

        while let Some(next) = memchr2(b'*', b'<', &bytes[j..]).map(|off| j + off) {
            if bytes[next] == b'<' {
                let rest = &line[next..];
                if rest.starts_with(STRONG_OPEN) {
                    depth += 1;
                    j = next + STRONG_OPEN.len();
                } else if rest.starts_with(STRONG_CLOSE) {
                    depth -= 1;
                    crossed_out |= depth < 0;
                    j = next + STRONG_CLOSE.len();
                } else {
                    j = next + 1;
                }
                continue;
            }

            if next == open + 1 || depth != 0 || crossed_out {
                // unusable pair; the closer candidate may open the next span
                i = next;
                continue 'open;
            }
            out.push_str(&line[seg_start..open]);
            out.push_str("<em>");
            out.push_str(&line[open + 1..next]);
            out.push_str("</em>");
            i = next + 1;
            seg_start = i;
            continue 'open;
        }
        break;
    }
    out.push_str(&line[seg_start..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold() {
        assert_eq!(apply("Hello **world**"), "Hello <strong>world</strong>");
    }

    #[test]
    fn test_bold_before_italic() {
        assert_eq!(apply("**a** *b*"), "<strong>a</strong> <em>b</em>");
    }

    #[test]
    fn test_non_greedy() {
        assert_eq!(
            apply("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
        assert_eq!(apply("*a* *b*"), "<em>a</em> <em>b</em>");
    }

    #[test]
    fn test_does_not_span_lines() {
        assert_eq!(apply("**a\nb**"), "**a\nb**");
        assert_eq!(apply("*a\nb*"), "*a\nb*");
    }

    #[test]
    fn test_unmatched_are_literal() {
        assert_eq!(apply("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(apply("**"), "**");
        assert_eq!(apply("****"), "****");
        assert_eq!(apply("**open"), "**open");
        assert_eq!(apply("*"), "*");
    }

    #[test]
    fn test_italic_wraps_whole_strong() {
        assert_eq!(
            apply("*a **b** c*"),
            "<em>a <strong>b</strong> c</em>"
        );
    }

    #[test]
    fn test_italic_never_crosses_strong_boundary() {
        assert_eq!(apply("**a *b** c*"), "<strong>a *b</strong> c*");
        assert_eq!(
            apply("**a *b** x **c* d**"),
            "<strong>a *b</strong> x <strong>c* d</strong>"
        );
    }

    #[test]
    fn test_italic_inside_strong() {
        assert_eq!(apply("**a *b* c**"), "<strong>a <em>b</em> c</strong>");
        // shortest bold span wins, the stray asterisks stay literal
        assert_eq!(apply("***x***"), "<strong>*x</strong>*");
    }

    #[test]
    fn test_other_tags_are_ignored() {
        assert_eq!(apply("<h1>*t*</h1>"), "<h1><em>t</em></h1>");
    }

    #[test]
    fn test_long_run_of_asterisks() {
        let line = "*".repeat(10_000);
        let out = apply(&line);
        assert!(out.len() >= line.len());
    }
}
