// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Sheets API
// ---------------------------------------------------------------------------

/// Origin of the Google Sheets REST API.
pub const SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com";

/// OAuth scope granting read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Deadline applied to every Sheets request.
pub const SHEETS_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How values are interpreted on write: stored exactly as sent, no formula
/// or date parsing.
pub const VALUE_INPUT_OPTION: &str = "RAW";

/// Appends always insert new rows rather than overwriting blank ones.
pub const INSERT_DATA_OPTION: &str = "INSERT_ROWS";

// ---------------------------------------------------------------------------
// Capture boundaries
// ---------------------------------------------------------------------------

/// Characters of page text kept per capture.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 100;

/// Upper bound accepted for the content cap. Google Sheets rejects cells
/// longer than 50,000 characters.
pub const MAX_CONTENT_LENGTH_LIMIT: usize = 50_000;

/// How long the cycle waits for the page extractor to answer.
pub const EXTRACTOR_MESSAGING_TIMEOUT: Duration = Duration::from_secs(10);

/// Sheet used for every capture when per-domain sheets are disabled.
pub const DEFAULT_SHEET_NAME: &str = "ScrapedData";

/// Timestamp layout for the fourth column, in local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub const APPLICATION_NAME: &str = "page2sheet";
pub const APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding a ready-made OAuth access token.
pub const ACCESS_TOKEN_ENV_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
