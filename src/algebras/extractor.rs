//! Page extraction algebra.

use crate::model::{CapturedPage, ScrapeRequest, TabEvent};
use async_trait::async_trait;

use super::error::ExtractionFailure;

/// Request/response access to the document loaded in a tab.
///
/// # Laws
///
/// - **L1 (Scrape-Only)**: Requests whose action is not `"scrape"` fail with
///   `UnsupportedRequest` and never produce a page.
/// - **L2 (Single-Answer)**: Every call resolves exactly once, either with a
///   page or with an error. Callers add their own deadline on top.
///
/// Implementations are free to cap `content`; callers still enforce their own
/// cap on the result.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn request(
        &self,
        tab: &TabEvent,
        message: &ScrapeRequest,
    ) -> Result<CapturedPage, ExtractionFailure>;
}


#[cfg(test)]
mod tests {
    use super::mock::ScriptedExtractor;
    use super::*;

    #[tokio::test]
    async fn law_l1_scrape_only() {
        let extractor =
            ScriptedExtractor::returning(CapturedPage::new("https://a.b", "Title", "Body"));
        let tab = TabEvent::complete(1, "https://a.b");

        let result = extractor
            .request(
                &tab,
                &ScrapeRequest {
                    action: "ping".to_string(),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(ExtractionFailure::UnsupportedRequest { .. })
        ));

        let page = extractor.request(&tab, &ScrapeRequest::scrape()).await.unwrap();
        assert_eq!(page.title, "Title");
        assert_eq!(extractor.request_count(), 2);
    }
}
