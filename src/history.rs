//! Rendering a stored message history.
//!
//! The chat backend keeps messages as a JSON array:
//!
//! ```json
//! [{"id": "…", "username": "ana", "content": "**hi**",
//!   "timestamp": "2024-05-01T10:00:00+00:00", "filename": null}]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::escape::escape;
use crate::pipeline::Pipeline;

/// How many messages the chat client shows by default.
pub const DEFAULT_LIMIT: usize = 50;

/// One stored chat message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    /// Name of an attached file, if any.
    #[serde(default)]
    pub filename: Option<String>,
}

pub fn parse(json: &str) -> Result<Vec<Message>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Message>> {
    let path = path.as_ref();
    let messages = parse(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), count = messages.len(), "loaded message history");
    Ok(messages)
}

/// The most recent `limit` messages, oldest first.
pub fn recent(messages: &[Message], limit: usize) -> &[Message] {
    &messages[messages.len().saturating_sub(limit)..]
}

/// Render each message as a `<div class="message">` block.
///
/// Username and attachment name are escaped as plain text; only the content
/// goes through the markdown pipeline.
pub fn render_history(messages: &[Message], pipeline: &Pipeline) -> String {
    let options = pipeline.options();
    let mut out = String::new();
    for message in messages {
        out.push_str("<div class=\"message\">");
        out.push_str("<span class=\"username\">");
        out.push_str(&escape(&message.username, options));
        out.push_str("</span>");
        if let Some(name) = message.filename.as_deref().filter(|n| !n.is_empty()) {
            out.push_str("<span class=\"attachment\">");
            out.push_str(&escape(name, options));
            out.push_str("</span>");
        }
        out.push_str("<div class=\"content\">");
        out.push_str(&pipeline.render(&message.content));
        out.push_str("</div></div>\n");
    }
    out
}
