// src/lib.rs
//! page2sheet library — records loaded web pages as rows in a Google
//! spreadsheet, one sheet per source domain.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `CaptureError`, `SheetsError`, `AppError`, `ValidationError`
//! - **Configuration** — `CaptureConfig`, `ValidatedConfig`
//! - **Domain model** — `TabEvent`, `CapturedPage`, `SheetRow`
//! - **Domain types** — `SpreadsheetId`, `SheetTitle`, `AccessToken`
//! - **Capture** — `CaptureOrchestrator` and the outcomes of its cycles
//! - **Sheets client** — `SheetStore`, `SheetsHttpClient`
//! - **Host adapters** — HTTP extractor, credential providers, event reader

mod algebras;
mod analytics;
mod api;
mod capture;
mod config;
mod constants;
mod error;
mod host;
mod model;
mod types;

// --- Error Handling ---
pub use crate::error::{
    AppError, CaptureError, CaptureErrorKind, GoogleApiStatus, SheetsError, TOKEN_REJECTED_HINT,
    UNKNOWN_ERROR_MESSAGE,
};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CaptureConfig, CommandLineInput, SheetRouting, ValidatedConfig};
pub use crate::constants::{
    ACCESS_TOKEN_ENV_VAR, DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_SHEET_NAME, SHEETS_API_BASE_URL,
    SPREADSHEETS_SCOPE, TIMESTAMP_FORMAT,
};

// --- Domain Model ---
pub use crate::model::{
    truncate_chars, CapturedPage, ScrapeRequest, SheetRow, TabEvent, TabStatus, HEADER_ROW,
};

// --- Domain Types ---
pub use crate::types::{AccessToken, SheetTitle, SpreadsheetId, ValidatedUrl};

// --- Algebras (Capability Traits) ---
pub use crate::algebras::{
    CredentialFailure, CredentialProvider, CredentialRequest, Diagnostic, DiagnosticEvent,
    DiagnosticSink, ExtractionFailure, FanoutSink, LogSink, PageExtractor, RecordingSink,
};

// --- Capture ---
pub use crate::capture::{
    AppendStatus, CaptureOrchestrator, CycleOutcome, CycleReport, Provisioning, SheetExistence,
    SheetLockGuard, SheetLocks,
};

// --- Sheets Client ---
pub use crate::api::{
    client::ApiResponse,
    parser::{parse_error_response, parse_spreadsheet_metadata},
    SheetStore, SheetsHttpClient, SpreadsheetMetadata,
};

// --- Host Adapters ---
pub use crate::host::{
    parse_event_line, read_document, CommandCredentialProvider, EnvCredentialProvider,
    EventReader, FallbackCredentialProvider, HttpPageExtractor,
};

// --- Analytics ---
pub use crate::analytics::{summarize, RunSummary};
