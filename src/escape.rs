//! HTML escaping, the first pipeline stage.

use crate::options::Options;

/// Escape `text` for insertion into HTML.
///
/// Maps `&`, `<`, `>` and `"` to entity references, plus `'` when
/// [`Options::escape_apostrophe`] is set. The placeholder marker code points
/// U+E000..=U+E002 are written as numeric references so they can never be
/// read back as placeholders. Everything else, newlines included, is copied.
///
/// ```
/// use chatmark::{escape, Options};
///
/// assert_eq!(escape("<b>&\"", &Options::default()), "&lt;b&gt;&amp;&quot;");
/// ```
pub fn escape(text: &str, options: &Options) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut seg_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let (width, replacement) = match bytes[i] {
            b'&' => (1, "&amp;"),
            b'<' => (1, "&lt;"),
            b'>' => (1, "&gt;"),
            b'"' => (1, "&quot;"),
            b'\'' if options.escape_apostrophe => (1, "&#39;"),
            // U+E000..=U+E002 encode as EE 80 80..=82
            0xEE => match marker_reference(&bytes[i..]) {
                Some(r) => (3, r),
                None => {
                    i += 1;
                    continue;
                }
            },
            _ => {
                i += 1;
                continue;
            }
        };
        out.push_str(&text[seg_start..i]);
        out.push_str(replacement);
        i += width;
        seg_start = i;
    }
    out.push_str(&text[seg_start..]);
    out
}

fn marker_reference(s: &[u8]) -> Option<&'static str> {
    match s {
        [0xEE, 0x80, 0x80, ..] => Some("&#57344;"),
        [0xEE, 0x80, 0x81, ..] => Some("&#57345;"),
        [0xEE, 0x80, 0x82, ..] => Some("&#57346;"),
        _ => None,
    }
}
