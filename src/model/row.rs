use super::CapturedPage;

/// Header written to the first row of every sheet this crate provisions.
pub const HEADER_ROW: [&str; 4] = ["URL", "Title", "Content", "Timestamp"];

/// One data row: `[url, title, content, timestamp]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub url: String,
    pub title: String,
    pub content: String,
    pub timestamp: String,
}

impl SheetRow {
    /// Builds the row for a capture. The URL comes from the triggering tab
    /// event, not from the extractor's report.
    pub fn from_capture(trigger_url: &str, page: &CapturedPage, timestamp: String) -> Self {
        Self {
            url: trigger_url.to_string(),
            title: page.title.clone(),
            content: page.content.clone(),
            timestamp,
        }
    }

    pub fn header_values() -> Vec<Vec<String>> {
        vec![HEADER_ROW.iter().map(|cell| cell.to_string()).collect()]
    }

    /// The row as the single-row 2D array the values API expects.
    pub fn to_values(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.url.clone(),
            self.title.clone(),
            self.content.clone(),
            self.timestamp.clone(),
        ]]
    }
}
