//! Sheets API interaction — the ability to provision and append to sheets.
//!
//! This module keeps a clear separation between I/O (`client`), wire shapes
//! (`responses`) and response interpretation (`parser`). Business logic
//! depends on the [`SheetStore`] trait, never on HTTP details.

pub mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod parser;
pub mod responses;

use crate::error::SheetsError;
use crate::types::{AccessToken, SheetTitle, SpreadsheetId};
use indexmap::IndexSet;

/// Sheet titles present in a spreadsheet, in the order the API lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetMetadata {
    pub sheet_titles: IndexSet<String>,
}

impl SpreadsheetMetadata {
    pub fn contains(&self, title: &SheetTitle) -> bool {
        self.sheet_titles.contains(title.as_str())
    }
}

/// The remote tabular store.
///
/// Every operation is a single request carrying the caller's bearer token.
/// None of them is idempotent: creating an existing sheet fails, appending
/// twice writes two rows. Callers decide what to tolerate.
#[async_trait::async_trait]
pub trait SheetStore: Send + Sync {
    async fn get_spreadsheet_metadata(
        &self,
        spreadsheet: &SpreadsheetId,
        token: &AccessToken,
    ) -> Result<SpreadsheetMetadata, SheetsError>;

    async fn create_sheet(
        &self,
        spreadsheet: &SpreadsheetId,
        title: &SheetTitle,
        token: &AccessToken,
    ) -> Result<(), SheetsError>;

    /// Overwrites `range` with `values`.
    async fn write_range(
        &self,
        spreadsheet: &SpreadsheetId,
        range: &str,
        values: &[Vec<String>],
        token: &AccessToken,
    ) -> Result<(), SheetsError>;

    /// Appends `values` as new rows after the table anchored at `range`.
    async fn append_row(
        &self,
        spreadsheet: &SpreadsheetId,
        range: &str,
        values: &[Vec<String>],
        token: &AccessToken,
    ) -> Result<(), SheetsError>;
}

// Re-export the public interface
pub use client::SheetsHttpClient;
