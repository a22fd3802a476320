// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system. A capture
//! cycle classifies every failure as a [`CaptureError`]; the Sheets client
//! reports transport and API failures as [`SheetsError`]; the binary wraps
//! its own setup and input failures in [`AppError`].

use crate::algebras::{CredentialFailure, ExtractionFailure};
use crate::types::ValidationError;
use std::fmt;
use thiserror::Error;

/// Marker used when an error response carries no readable message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Google API error statuses as a typed vocabulary.
///
/// Parsed from the `error.status` field of the Google JSON error envelope
/// (`{"error": {"code": 400, "message": "...", "status": "INVALID_ARGUMENT"}}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoogleApiStatus {
    /// Request was malformed, e.g. a sheet with that title already exists
    InvalidArgument,
    /// Token lacks access to this spreadsheet
    PermissionDenied,
    /// Token missing, expired or revoked
    Unauthenticated,
    /// Spreadsheet or range does not exist
    NotFound,
    AlreadyExists,
    /// Quota exhausted
    ResourceExhausted,
    Internal,
    Unavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// A status this client doesn't recognize yet
    Unknown(String),
}

impl GoogleApiStatus {
    pub fn from_api_response(status: &str) -> Self {
        match status {
            "INVALID_ARGUMENT" => Self::InvalidArgument,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "UNAUTHENTICATED" => Self::Unauthenticated,
            "NOT_FOUND" => Self::NotFound,
            "ALREADY_EXISTS" => Self::AlreadyExists,
            "RESOURCE_EXHAUSTED" => Self::ResourceExhausted,
            "INTERNAL" => Self::Internal,
            "UNAVAILABLE" => Self::Unavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether the token itself was rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::PermissionDenied | Self::HttpStatus(401 | 403)
        )
    }
}

impl fmt::Display for GoogleApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::AlreadyExists => write!(f, "ALREADY_EXISTS"),
            Self::ResourceExhausted => write!(f, "RESOURCE_EXHAUSTED"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(status) => write!(f, "{}", status),
        }
    }
}

/// Failure of a single Sheet Store request.
#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Sheets API returned an error ({code}, HTTP {status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        code: GoogleApiStatus,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl SheetsError {
    /// The most useful human-readable message for diagnostics: the API's own
    /// message when there is one, otherwise the error description.
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether Google refused the bearer token rather than the request.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                code.is_auth_failure()
                    || GoogleApiStatus::from_http_status(status.as_u16()).is_auth_failure()
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for SheetsError {
    fn from(err: serde_json::Error) -> Self {
        SheetsError::MalformedResponse(err.to_string())
    }
}

/// The classification of a [`CaptureError`], cheap to copy into diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureErrorKind {
    ExtractionFailure,
    CredentialFailure,
    ConfigurationInvalid,
    UnaddressableUrl,
    MetadataCheckFailure,
    SheetCreationFailure,
    HeaderWriteFailure,
    AppendFailure,
}

impl CaptureErrorKind {
    /// Cycle-fatal kinds stop the cycle before any Sheets request is made.
    pub fn is_cycle_fatal(&self) -> bool {
        matches!(
            self,
            Self::ExtractionFailure
                | Self::CredentialFailure
                | Self::ConfigurationInvalid
                | Self::UnaddressableUrl
        )
    }
}

impl fmt::Display for CaptureErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExtractionFailure => "extraction",
            Self::CredentialFailure => "credential",
            Self::ConfigurationInvalid => "configuration",
            Self::UnaddressableUrl => "unaddressable_url",
            Self::MetadataCheckFailure => "metadata_check",
            Self::SheetCreationFailure => "sheet_creation",
            Self::HeaderWriteFailure => "header_write",
            Self::AppendFailure => "append",
        };
        write!(f, "{}", name)
    }
}

/// Everything that can go wrong within one capture cycle.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),

    #[error(transparent)]
    Credential(#[from] CredentialFailure),

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(#[from] ValidationError),

    #[error("Cannot derive a sheet title from {url}: {reason}")]
    UnaddressableUrl { url: String, reason: String },

    #[error("Could not read spreadsheet metadata: {0}")]
    MetadataCheck(#[source] SheetsError),

    #[error("Could not create sheet: {0}")]
    SheetCreation(#[source] SheetsError),

    #[error("Could not write header row: {0}")]
    HeaderWrite(#[source] SheetsError),

    #[error("Could not append row: {0}")]
    Append(#[source] SheetsError),
}

impl CaptureError {
    pub fn kind(&self) -> CaptureErrorKind {
        match self {
            Self::Extraction(_) => CaptureErrorKind::ExtractionFailure,
            Self::Credential(_) => CaptureErrorKind::CredentialFailure,
            Self::ConfigurationInvalid(_) => CaptureErrorKind::ConfigurationInvalid,
            Self::UnaddressableUrl { .. } => CaptureErrorKind::UnaddressableUrl,
            Self::MetadataCheck(_) => CaptureErrorKind::MetadataCheckFailure,
            Self::SheetCreation(_) => CaptureErrorKind::SheetCreationFailure,
            Self::HeaderWrite(_) => CaptureErrorKind::HeaderWriteFailure,
            Self::Append(_) => CaptureErrorKind::AppendFailure,
        }
    }

    pub fn is_cycle_fatal(&self) -> bool {
        self.kind().is_cycle_fatal()
    }

    /// Message suitable for a diagnostic record. Sheets failures surface the
    /// API's own message, marked when the access token was the problem.
    pub fn diagnostic_message(&self) -> String {
        match self {
            Self::MetadataCheck(e)
            | Self::SheetCreation(e)
            | Self::HeaderWrite(e)
            | Self::Append(e) => {
                if e.is_auth_failure() {
                    format!("{} {}", e.message(), TOKEN_REJECTED_HINT)
                } else {
                    e.message()
                }
            }
            other => other.to_string(),
        }
    }
}

/// Appended to Sheets diagnostics caused by a rejected access token.
pub const TOKEN_REJECTED_HINT: &str = "(access token rejected)";

/// Main application error type for the binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ValidationError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to set up Sheets client: {0}")]
    SheetsClient(#[from] SheetsError),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: not a tab event: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line}: not valid UTF-8")]
    UnreadableLine { line: usize },

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl AppError {
    /// Bad input lines that the event stream can carry on past.
    pub fn is_skippable_input(&self) -> bool {
        matches!(
            self,
            AppError::InvalidEvent { .. } | AppError::UnreadableLine { .. }
        )
    }
}

// Allow converting from anyhow::Error, preserving the message
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Logging(format!("{:#}", err))
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
