//! The ordered rendering pipeline.
//!
//! | stage        | contract                                                     |
//! |--------------|--------------------------------------------------------------|
//! | `escape`     | `& < > "` (and optionally `'`) become entities, exactly once |
//! | `code`       | fences and inline spans become opaque placeholders           |
//! | `headers`    | `#`..`###` lines, longest marker first                       |
//! | `emphasis`   | `**bold**` then `*italic*`, same line only                   |
//! | `lists`      | `- ` and `1. ` lines grouped into `<ul>` / `<ol>`            |
//! | `paragraphs` | blank-line split, `<p>` around non-block runs                |
//! | `restore`    | placeholders replaced by their code markup                   |

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::block;
use crate::code::{self, Stash};
use crate::emphasis;
use crate::escape::escape;
use crate::options::Options;

/// One named step of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Escape,
    ExtractCode,
    Headers,
    Emphasis,
    Lists,
    Paragraphs,
    Restore,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::Escape,
        Stage::ExtractCode,
        Stage::Headers,
        Stage::Emphasis,
        Stage::Lists,
        Stage::Paragraphs,
        Stage::Restore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Escape => "escape",
            Stage::ExtractCode => "code",
            Stage::Headers => "headers",
            Stage::Emphasis => "emphasis",
            Stage::Lists => "lists",
            Stage::Paragraphs => "paragraphs",
            Stage::Restore => "restore",
        }
    }

    fn run(self, text: &str, options: &Options, stash: &mut Stash) -> String {
        match self {
            Stage::Escape => escape(text, options),
            Stage::ExtractCode => code::extract(text, options, stash),
            Stage::Headers => block::headers(text),
            Stage::Emphasis => emphasis::apply(text),
            Stage::Lists => block::lists(text),
            Stage::Paragraphs => block::paragraphs(text, options),
            Stage::Restore => stash.restore(text),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unknown stage name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStage(pub String);

impl fmt::Display for UnknownStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = Stage::ALL.iter().map(|s| s.name()).collect();
        write!(f, "unknown stage '{}' (expected one of: {})", self.0, names.join(", "))
    }
}

impl std::error::Error for UnknownStage {}

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

/// A configured renderer. Holds no per-message state, so one instance can be
/// shared freely between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pipeline {
    options: Options,
}

impl Pipeline {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The stages in the order [`render`](Self::render) runs them.
    pub fn stages(&self) -> &'static [Stage] {
        &Stage::ALL
    }

    /// Render `text` to a safe HTML fragment.
    pub fn render(&self, text: &str) -> String {
        self.run(text, Stage::Restore)
    }

    /// Run the pipeline up to and including `last`.
    ///
    /// Output of a stage before [`Stage::Restore`] can contain the private-use
    /// placeholder tokens for code; it is meant for inspection, not display.
    pub fn render_until(&self, text: &str, last: Stage) -> String {
        self.run(text, last)
    }

    fn run(&self, text: &str, last: Stage) -> String {
        let mut stash = Stash::default();
        let mut current = Cow::Borrowed(text);

        for &stage in self.stages() {
            let next = stage.run(&current, &self.options, &mut stash);
            trace!(stage = stage.name(), len = next.len(), "stage done");
            current = Cow::Owned(next);
            if stage == last {
                break;
            }
        }

        debug!(
            input_len = text.len(),
            output_len = current.len(),
            code_spans = stash.len(),
            "rendered message"
        );
        current.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let names: Vec<_> = Pipeline::default().stages().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["escape", "code", "headers", "emphasis", "lists", "paragraphs", "restore"]
        );
    }

    #[test]
    fn test_stage_from_str() {
        assert_eq!("lists".parse::<Stage>(), Ok(Stage::Lists));
        assert_eq!(" Code ".parse::<Stage>(), Ok(Stage::ExtractCode));
        let err = "bogus".parse::<Stage>().unwrap_err();
        assert!(err.to_string().contains("paragraphs"));
    }

    #[test]
    fn test_escape_runs_before_structure() {
        let p = Pipeline::default();
        assert_eq!(p.render_until("# <b>", Stage::Escape), "# &lt;b&gt;");
        assert_eq!(p.render_until("# <b>", Stage::Headers), "<h1>&lt;b&gt;</h1>");
    }

    #[test]
    fn test_code_is_hidden_from_middle_stages() {
        let p = Pipeline::default();
        let mid = p.render_until("`**x**`", Stage::Lists);
        assert!(!mid.contains("strong"));
        assert_eq!(p.render("`**x**`"), "<p><code>**x**</code></p>");
    }

    #[test]
    fn test_render_until_restore_is_render() {
        let p = Pipeline::default();
        let text = "# a\n\n- `b`\n- *c*";
        assert_eq!(p.render_until(text, Stage::Restore), p.render(text));
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }
}
