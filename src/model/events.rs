use serde::{Deserialize, Serialize};

/// Loading state reported with a tab update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
    #[serde(other)]
    Unknown,
}

/// A tab-state-changed notification from the hosting browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabEvent {
    pub tab_id: i64,
    #[serde(default)]
    pub status: Option<TabStatus>,
    #[serde(default)]
    pub url: Option<String>,
}

impl TabEvent {
    /// A load-complete event for `url`, as the host reports it.
    pub fn complete(tab_id: i64, url: impl Into<String>) -> Self {
        Self {
            tab_id,
            status: Some(TabStatus::Complete),
            url: Some(url.into()),
        }
    }

    /// Returns the destination URL when this event should start a cycle:
    /// the tab finished loading and the host told us where it ended up.
    pub fn trigger_url(&self) -> Option<&str> {
        match (self.status, self.url.as_deref()) {
            (Some(TabStatus::Complete), Some(url)) if !url.trim().is_empty() => Some(url),
            _ => None,
        }
    }
}

/// Message sent to the page extractor: `{"action": "scrape"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub action: String,
}

impl ScrapeRequest {
    pub const SCRAPE: &'static str = "scrape";

    pub fn scrape() -> Self {
        Self {
            action: Self::SCRAPE.to_string(),
        }
    }

    pub fn is_scrape(&self) -> bool {
        self.action == Self::SCRAPE
    }
}
