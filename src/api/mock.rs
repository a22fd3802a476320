//! In-memory [`SheetStore`] for orchestrator tests.

use super::{SheetStore, SpreadsheetMetadata};
use crate::error::{GoogleApiStatus, SheetsError};
use crate::types::{AccessToken, SheetTitle, SpreadsheetId};
use indexmap::IndexSet;
use parking_lot::Mutex;
use reqwest::StatusCode;

/// One request as the store received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Metadata {
        spreadsheet: String,
    },
    CreateSheet {
        spreadsheet: String,
        title: String,
    },
    WriteRange {
        spreadsheet: String,
        range: String,
        values: Vec<Vec<String>>,
    },
    AppendRow {
        spreadsheet: String,
        range: String,
        values: Vec<Vec<String>>,
    },
}

/// Behaves like a spreadsheet: creating an existing title fails, appends
/// are recorded. Individual operations can be made to fail.
#[derive(Default)]
pub struct MockSheetStore {
    existing: Mutex<IndexSet<String>>,
    calls: Mutex<Vec<StoreCall>>,
    tokens: Mutex<Vec<String>>,
    fail_metadata: bool,
    fail_create: bool,
    fail_header: bool,
    fail_append: bool,
}

fn api_error(status: StatusCode, message: &str) -> SheetsError {
    SheetsError::Api {
        status,
        code: GoogleApiStatus::from_http_status(status.as_u16()),
        message: message.to_string(),
    }
}

impl MockSheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheets(titles: &[&str]) -> Self {
        let store = Self::new();
        store
            .existing
            .lock()
            .extend(titles.iter().map(|t| t.to_string()));
        store
    }

    pub fn failing_metadata(mut self) -> Self {
        self.fail_metadata = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_header(mut self) -> Self {
        self.fail_header = true;
        self
    }

    pub fn failing_append(mut self) -> Self {
        self.fail_append = true;
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().clone()
    }

    pub fn sheet_titles(&self) -> Vec<String> {
        self.existing.lock().iter().cloned().collect()
    }

    fn record(&self, call: StoreCall, token: &AccessToken) {
        self.calls.lock().push(call);
        self.tokens.lock().push(token.as_str().to_string());
    }
}

#[async_trait::async_trait]
impl SheetStore for MockSheetStore {
    async fn get_spreadsheet_metadata(
        &self,
        spreadsheet: &SpreadsheetId,
        token: &AccessToken,
    ) -> Result<SpreadsheetMetadata, SheetsError> {
        self.record(
            StoreCall::Metadata {
                spreadsheet: spreadsheet.to_string(),
            },
            token,
        );
        if self.fail_metadata {
            return Err(api_error(StatusCode::SERVICE_UNAVAILABLE, "backend unavailable"));
        }
        // Snapshot before suspending, like a response already on the wire.
        let snapshot = self.existing.lock().clone();
        tokio::task::yield_now().await;
        Ok(SpreadsheetMetadata {
            sheet_titles: snapshot,
        })
    }

    async fn create_sheet(
        &self,
        spreadsheet: &SpreadsheetId,
        title: &SheetTitle,
        token: &AccessToken,
    ) -> Result<(), SheetsError> {
        self.record(
            StoreCall::CreateSheet {
                spreadsheet: spreadsheet.to_string(),
                title: title.to_string(),
            },
            token,
        );
        if self.fail_create {
            return Err(api_error(StatusCode::FORBIDDEN, "The caller does not have permission"));
        }
        if !self.existing.lock().insert(title.to_string()) {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                &format!("A sheet with the name \"{}\" already exists.", title),
            ));
        }
        Ok(())
    }

    async fn write_range(
        &self,
        spreadsheet: &SpreadsheetId,
        range: &str,
        values: &[Vec<String>],
        token: &AccessToken,
    ) -> Result<(), SheetsError> {
        self.record(
            StoreCall::WriteRange {
                spreadsheet: spreadsheet.to_string(),
                range: range.to_string(),
                values: values.to_vec(),
            },
            token,
        );
        if self.fail_header {
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
        Ok(())
    }

    async fn append_row(
        &self,
        spreadsheet: &SpreadsheetId,
        range: &str,
        values: &[Vec<String>],
        token: &AccessToken,
    ) -> Result<(), SheetsError> {
        self.record(
            StoreCall::AppendRow {
                spreadsheet: spreadsheet.to_string(),
                range: range.to_string(),
                values: values.to_vec(),
            },
            token,
        );
        if self.fail_append {
            return Err(api_error(StatusCode::NOT_FOUND, "Unable to parse range"));
        }
        Ok(())
    }
}
