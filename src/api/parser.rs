// src/api/parser.rs
//! Interpretation of Sheets API responses.
//!
//! Successful bodies are decoded into the shapes in [`super::responses`];
//! error bodies are decoded into [`SheetsError::Api`], falling back to the
//! HTTP status when the body is not Google's error envelope.

use super::client::ApiResponse;
use super::responses::{GoogleErrorEnvelope, SpreadsheetResponse};
use super::SpreadsheetMetadata;
use crate::error::{GoogleApiStatus, SheetsError, UNKNOWN_ERROR_MESSAGE};
use reqwest::StatusCode;

/// Maximum characters of a response body kept in parse-failure messages.
const BODY_PREVIEW_LENGTH: usize = 200;

/// Parse any Sheets API response body into `T`, or into an error.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, SheetsError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success_body(&result.data, &result.url)
    } else {
        Err(parse_error_response(&result.data, result.status))
    }
}

/// Accept any 2xx response, ignoring its body.
pub fn parse_empty_response(result: ApiResponse<String>) -> Result<(), SheetsError> {
    if result.status.is_success() {
        Ok(())
    } else {
        Err(parse_error_response(&result.data, result.status))
    }
}

/// Parse a spreadsheet metadata response into the set of sheet titles.
pub fn parse_spreadsheet_metadata(
    result: ApiResponse<String>,
) -> Result<SpreadsheetMetadata, SheetsError> {
    let response: SpreadsheetResponse = parse_api_response(result)?;
    Ok(SpreadsheetMetadata {
        sheet_titles: response
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect(),
    })
}

fn parse_success_body<T>(body: &str, url: &str) -> Result<T, SheetsError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        SheetsError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

/// Builds the error for a non-2xx response.
///
/// The message is Google's `error.message` when the body parses, otherwise
/// the generic "Unknown error" marker.
pub fn parse_error_response(body: &str, status: StatusCode) -> SheetsError {
    match serde_json::from_str::<GoogleErrorEnvelope>(body) {
        Ok(envelope) => SheetsError::Api {
            status,
            code: envelope
                .error
                .status
                .as_deref()
                .map(GoogleApiStatus::from_api_response)
                .unwrap_or_else(|| GoogleApiStatus::from_http_status(status.as_u16())),
            message: envelope
                .error
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
        },
        Err(_) => SheetsError::Api {
            status,
            code: GoogleApiStatus::from_http_status(status.as_u16()),
            message: UNKNOWN_ERROR_MESSAGE.to_string(),
        },
    }
}

fn preview(body: &str) -> String {
    let mut shown: String = body.chars().take(BODY_PREVIEW_LENGTH).collect();
    if shown.len() < body.len() {
        shown.push_str("...");
    }
    shown
}
