use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid spreadsheet URL - could not extract ID: {0}")]
    InvalidSpreadsheetUrl(String),

    #[error("Invalid spreadsheet ID: {0}")]
    InvalidSpreadsheetId(String),

    #[error("Invalid sheet title: {title} - {reason}")]
    InvalidSheetTitle { title: String, reason: String },

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Value out of bounds for {field}: {value}, expected {min}..={max}")]
    OutOfBounds {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("Invalid access token: {reason}")]
    InvalidAccessToken { reason: String },
}
