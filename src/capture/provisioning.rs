//! Existence check, provisioning and append for one target sheet.
//!
//! None of these steps is cycle-fatal. Each one reports what happened and
//! the cycle moves on: a failed check is treated as "absent", a failed
//! create or header write still leads to the append.

use super::outcome::{AppendStatus, Provisioning, SheetExistence};
use super::CycleScope;
use crate::algebras::DiagnosticEvent;
use crate::api::SheetStore;
use crate::error::CaptureError;
use crate::model::SheetRow;
use crate::types::{AccessToken, SheetTitle, SpreadsheetId};

/// The Sheets requests of one cycle, all against the same sheet and token.
pub(super) struct SheetSteps<'a> {
    pub store: &'a dyn SheetStore,
    pub spreadsheet: &'a SpreadsheetId,
    pub sheet: &'a SheetTitle,
    pub token: &'a AccessToken,
    pub scope: &'a CycleScope,
}

impl SheetSteps<'_> {
    pub async fn check_existence(&self) -> SheetExistence {
        match self
            .store
            .get_spreadsheet_metadata(self.spreadsheet, self.token)
            .await
        {
            Ok(metadata) if metadata.contains(self.sheet) => SheetExistence::Present,
            Ok(_) => SheetExistence::Absent,
            Err(e) => {
                let error = CaptureError::MetadataCheck(e);
                self.scope.emit(DiagnosticEvent::ExistenceCheckFailed {
                    message: error.diagnostic_message(),
                });
                SheetExistence::Unknown
            }
        }
    }

    /// Creates the sheet and writes its header row.
    pub async fn provision(&self) -> Provisioning {
        if let Err(e) = self
            .store
            .create_sheet(self.spreadsheet, self.sheet, self.token)
            .await
        {
            let error = CaptureError::SheetCreation(e);
            self.scope.emit(DiagnosticEvent::SheetCreationFailed {
                message: error.diagnostic_message(),
            });
            return Provisioning::CreationFailed;
        }
        self.scope.emit(DiagnosticEvent::SheetCreated);

        let header_written = match self
            .store
            .write_range(
                self.spreadsheet,
                &self.sheet.header_range(),
                &SheetRow::header_values(),
                self.token,
            )
            .await
        {
            Ok(()) => true,
            Err(e) => {
                let error = CaptureError::HeaderWrite(e);
                self.scope.emit(DiagnosticEvent::HeaderWriteFailed {
                    message: error.diagnostic_message(),
                });
                false
            }
        };

        Provisioning::Created { header_written }
    }

    pub async fn append(&self, row: &SheetRow) -> AppendStatus {
        match self
            .store
            .append_row(
                self.spreadsheet,
                &self.sheet.append_range(),
                &row.to_values(),
                self.token,
            )
            .await
        {
            Ok(()) => {
                self.scope.emit(DiagnosticEvent::RowAppended);
                AppendStatus::Appended
            }
            Err(e) => {
                let message = CaptureError::Append(e).diagnostic_message();
                self.scope.emit(DiagnosticEvent::AppendFailed {
                    message: message.clone(),
                });
                AppendStatus::Failed { message }
            }
        }
    }
}
