//! Page extraction over plain HTTP.
//!
//! The binary has no browser to message, so it fetches the tab's URL itself
//! and reads the same three things a content script would: the URL, the
//! document title and the visible body text.

use crate::algebras::{ExtractionFailure, PageExtractor};
use crate::model::{CapturedPage, ScrapeRequest, TabEvent};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TITLE: Regex = pattern(r"(?is)<title[^>]*>(.*?)</title>");
    static ref HEAD: Regex = pattern(r"(?is)<head[^>]*>.*?</head>");
    static ref NON_TEXT: Regex = pattern(
        r"(?is)<(script|style|noscript|template)[^>]*>.*?</(script|style|noscript|template)>"
    );
    static ref COMMENT: Regex = pattern(r"(?s)<!--.*?-->");
    static ref TAG: Regex = pattern(r"(?s)<[^>]*>");
    static ref NUMERIC_ENTITY: Regex = pattern(r"&#(x[0-9a-fA-F]+|[0-9]+);");
    static ref WHITESPACE: Regex = pattern(r"\s+");
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("Failed to compile HTML regex - this is a bug in the code")
}

/// Fetches pages with reqwest and reduces the HTML to title and text.
pub struct HttpPageExtractor {
    client: reqwest::Client,
    max_content_length: usize,
}

impl HttpPageExtractor {
    pub fn new(client: reqwest::Client, max_content_length: usize) -> Self {
        Self {
            client,
            max_content_length,
        }
    }
}

#[async_trait]
impl PageExtractor for HttpPageExtractor {
    async fn request(
        &self,
        tab: &TabEvent,
        message: &ScrapeRequest,
    ) -> Result<CapturedPage, ExtractionFailure> {
        if !message.is_scrape() {
            return Err(ExtractionFailure::UnsupportedRequest {
                action: message.action.clone(),
            });
        }
        let url = tab.url.as_deref().ok_or_else(|| ExtractionFailure::Failed {
            reason: format!("tab {} has no URL", tab.tab_id),
        })?;

        log::debug!("Fetching {} for tab {}", url, tab.tab_id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractionFailure::Unreachable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionFailure::Failed {
                reason: format!("{} answered HTTP {}", url, status),
            });
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| ExtractionFailure::Failed {
                reason: format!("could not read body: {}", e),
            })?;

        Ok(read_document(&final_url, &html).truncated(self.max_content_length))
    }
}

/// Reads title and visible text out of an HTML document.
pub fn read_document(url: &str, html: &str) -> CapturedPage {
    let title = TITLE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| normalize(m.as_str()))
        .unwrap_or_default();

    let body = HEAD.replace_all(html, " ");
    let body = COMMENT.replace_all(&body, " ");
    let body = NON_TEXT.replace_all(&body, " ");
    let body = TAG.replace_all(&body, " ");

    CapturedPage::new(url, title, normalize(&body))
}

fn normalize(text: &str) -> String {
    let decoded = decode_entities(text);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'");

    let numeric = NUMERIC_ENTITY.replace_all(&named, |caps: &regex::Captures| {
        let digits = &caps[1];
        let code = match digits.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => digits.parse().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // Last, so "&amp;lt;" stays "&lt;"
    numeric.replace("&amp;", "&")
}
