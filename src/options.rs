//! Rendering configuration.

use std::env;

/// Environment variable enabling `class="language-.."` on fenced code.
pub const ENV_FENCE_CLASS: &str = "CHATMARK_FENCE_CLASS";
/// Environment variable enabling `'` → `&#39;`.
pub const ENV_ESCAPE_APOSTROPHE: &str = "CHATMARK_ESCAPE_APOSTROPHE";
/// Environment variable enabling `<br>` for single newlines in paragraphs.
pub const ENV_HARD_BREAKS: &str = "CHATMARK_HARD_BREAKS";

/// Knobs for the rendering pipeline.
///
/// The defaults reproduce the plain chat rendering: no language classes,
/// apostrophes left alone, single newlines kept as newlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Emit `class="language-{tag}"` on the `<code>` of a tagged fence.
    pub fence_language_class: bool,
    /// Also escape `'` as `&#39;`.
    pub escape_apostrophe: bool,
    /// Render single newlines inside a paragraph as `<br>`.
    pub hard_line_breaks: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fence_language_class(mut self, on: bool) -> Self {
        self.fence_language_class = on;
        self
    }

    pub fn with_escape_apostrophe(mut self, on: bool) -> Self {
        self.escape_apostrophe = on;
        self
    }

    pub fn with_hard_line_breaks(mut self, on: bool) -> Self {
        self.hard_line_breaks = on;
        self
    }

    /// Load options from `CHATMARK_*` environment variables; unset or
    /// unrecognized values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).as_deref().and_then(parse_flag).unwrap_or(false);
        Self {
            fence_language_class: flag(ENV_FENCE_CLASS),
            escape_apostrophe: flag(ENV_ESCAPE_APOSTROPHE),
            hard_line_breaks: flag(ENV_HARD_BREAKS),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> Options {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Options::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_are_all_off() {
        let opts = Options::new();
        assert!(!opts.fence_language_class);
        assert!(!opts.escape_apostrophe);
        assert!(!opts.hard_line_breaks);
    }

    #[test]
    fn test_builder_sets_fields() {
        let opts = Options::new()
            .with_fence_language_class(true)
            .with_hard_line_breaks(true);
        assert!(opts.fence_language_class);
        assert!(!opts.escape_apostrophe);
        assert!(opts.hard_line_breaks);
    }

    #[test]
    fn test_env_flags() {
        let opts = from_map(&[
            (ENV_FENCE_CLASS, "yes"),
            (ENV_ESCAPE_APOSTROPHE, " TRUE "),
            (ENV_HARD_BREAKS, "0"),
        ]);
        assert!(opts.fence_language_class);
        assert!(opts.escape_apostrophe);
        assert!(!opts.hard_line_breaks);
    }

    #[test]
    fn test_env_garbage_falls_back_to_default() {
        let opts = from_map(&[(ENV_FENCE_CLASS, "maybe")]);
        assert_eq!(opts, Options::default());
    }
}
