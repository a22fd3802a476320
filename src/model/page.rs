use serde::{Deserialize, Serialize};

/// What the extractor reports about a loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPage {
    pub url: String,
    pub title: String,
    pub content: String,
}

impl CapturedPage {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Returns the page with its content cut to at most `max_chars` characters.
    pub fn truncated(mut self, max_chars: usize) -> Self {
        truncate_chars(&mut self.content, max_chars);
        self
    }
}

/// Cuts `text` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
}
