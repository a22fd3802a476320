// src/api/client.rs
//! HTTP client wrapper for the Google Sheets v4 API.
//!
//! This module provides a thin wrapper around reqwest. It shapes the four
//! requests a capture needs (URL, query, bearer header, JSON body) and hands
//! the raw response to [`super::parser`]. It keeps no state between calls.

use super::parser;
use super::responses::{BatchUpdateRequest, ValueRangeBody};
use super::{SheetStore, SpreadsheetMetadata};
use crate::config::ValidatedConfig;
use crate::constants::{INSERT_DATA_OPTION, VALUE_INPUT_OPTION};
use crate::error::SheetsError;
use crate::types::{AccessToken, SheetTitle, SpreadsheetId, ValidatedUrl};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// A thin wrapper around reqwest Client for Sheets API requests.
#[derive(Clone)]
pub struct SheetsHttpClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl SheetsHttpClient {
    /// Creates a client for the API at `base_url`, applying `timeout` as the
    /// deadline of every request.
    pub fn new(
        base_url: &ValidatedUrl,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: base_url.as_url().clone(),
            timeout,
        })
    }

    pub fn from_config(config: &ValidatedConfig, user_agent: &str) -> Result<Self, SheetsError> {
        Self::new(&config.api_base_url, config.api_timeout, user_agent)
    }

    /// Builds `<base>/<segments...>?<query>`; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, SheetsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Sends a request with the bearer token and optional JSON body.
    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        token: &AccessToken,
        body: Option<&T>,
    ) -> Result<Response, SheetsError> {
        log::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(token.as_str())
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        log::debug!("  -> {}", response.status());
        Ok(response)
    }

    async fn values_write(
        &self,
        method: Method,
        url: Url,
        values: &[Vec<String>],
        token: &AccessToken,
    ) -> Result<(), SheetsError> {
        let body = ValueRangeBody { values };
        let response = self.send(method, url, token, Some(&body)).await?;
        let result = extract_response_text(response).await?;
        parser::parse_empty_response(result)
    }
}

#[async_trait::async_trait]
impl SheetStore for SheetsHttpClient {
    async fn get_spreadsheet_metadata(
        &self,
        spreadsheet: &SpreadsheetId,
        token: &AccessToken,
    ) -> Result<SpreadsheetMetadata, SheetsError> {
        let url = self.endpoint(&["v4", "spreadsheets", spreadsheet.as_str()], &[])?;
        let response = self.send::<()>(Method::GET, url, token, None).await?;
        let result = extract_response_text(response).await?;
        parser::parse_spreadsheet_metadata(result)
    }

    async fn create_sheet(
        &self,
        spreadsheet: &SpreadsheetId,
        title: &SheetTitle,
        token: &AccessToken,
    ) -> Result<(), SheetsError> {
        let batch_update = format!("{}:batchUpdate", spreadsheet.as_str());
        let url = self.endpoint(&["v4", "spreadsheets", &batch_update], &[])?;
        let body = BatchUpdateRequest::add_sheet(title.as_str());
        let response = self.send(Method::POST, url, token, Some(&body)).await?;
        let result = extract_response_text(response).await?;
        parser::parse_empty_response(result)
    }

    async fn write_range(
        &self,
        spreadsheet: &SpreadsheetId,
        range: &str,
        values: &[Vec<String>],
        token: &AccessToken,
    ) -> Result<(), SheetsError> {
        let url = self.endpoint(
            &["v4", "spreadsheets", spreadsheet.as_str(), "values", range],
            &[("valueInputOption", VALUE_INPUT_OPTION)],
        )?;
        self.values_write(Method::PUT, url, values, token).await
    }

    async fn append_row(
        &self,
        spreadsheet: &SpreadsheetId,
        range: &str,
        values: &[Vec<String>],
        token: &AccessToken,
    ) -> Result<(), SheetsError> {
        let append = format!("{}:append", range);
        let url = self.endpoint(
            &["v4", "spreadsheets", spreadsheet.as_str(), "values", &append],
            &[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", INSERT_DATA_OPTION),
            ],
        )?;
        self.values_write(Method::POST, url, values, token).await
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, SheetsError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
