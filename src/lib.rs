//! # chatmark
//!
//! Markdown-lite to safe HTML for chat message display.
//!
//! The renderer understands a small, fixed subset of Markdown:
//!
//! - fenced code blocks (` ``` `, optional language tag) and `inline code`
//! - `#`, `##` and `###` headers
//! - `**bold**` and `*italic*`
//! - `- item` and `1. item` lists
//! - paragraphs separated by blank lines
//!
//! Everything else is plain text. All input is HTML-escaped before any
//! structure is added, so the returned fragment can be inserted into a page
//! as is.
//!
//! ## Quick Start
//!
//! ```
//! assert_eq!(
//!     chatmark::render("Hello **world**"),
//!     "<p>Hello <strong>world</strong></p>"
//! );
//! assert_eq!(
//!     chatmark::render("# Title\n\nBody text"),
//!     "<h1>Title</h1><p>Body text</p>"
//! );
//! ```
//!
//! ## Options
//!
//! ```
//! use chatmark::{Options, Pipeline};
//!
//! let pipeline = Pipeline::new(Options::new().with_fence_language_class(true));
//! assert_eq!(
//!     pipeline.render("```rust\nfn main() {}\n```"),
//!     "<pre><code class=\"language-rust\">fn main() {}</code></pre>"
//! );
//! ```

mod block;
mod code;
mod emphasis;
mod error;
mod escape;
pub mod history;
mod options;
mod pipeline;

pub use error::{Error, Result};
pub use escape::escape;
pub use options::Options;
pub use pipeline::{Pipeline, Stage, UnknownStage};

/// Render `text` with default [`Options`].
///
/// Total over all inputs: malformed markup is kept as escaped literal text.
pub fn render(text: &str) -> String {
    Pipeline::default().render(text)
}

/// Render `text` with the given options.
pub fn render_with(text: &str, options: &Options) -> String {
    Pipeline::new(*options).render(text)
}
