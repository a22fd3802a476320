//! What a capture cycle reports back to its host.

use crate::error::CaptureErrorKind;
use crate::model::SheetRow;
use crate::types::SheetTitle;
use uuid::Uuid;

/// Whether the target sheet was found in the spreadsheet metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetExistence {
    Present,
    Absent,
    /// The metadata request failed; handled the same as `Absent`.
    Unknown,
}

impl SheetExistence {
    pub fn needs_provisioning(&self) -> bool {
        !matches!(self, Self::Present)
    }
}

/// Result of the create-sheet-plus-header step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioning {
    NotNeeded,
    Created { header_written: bool },
    CreationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendStatus {
    Appended,
    Failed { message: String },
}

/// Full account of a cycle that reached the append step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub tab_id: i64,
    pub sheet_title: SheetTitle,
    pub existence: SheetExistence,
    pub provisioning: Provisioning,
    pub row: SheetRow,
    pub append: AppendStatus,
}

/// The result of handling one tab event. Never an `Err`: failures are values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The event was not a load-complete with a URL; nothing ran.
    Ignored,
    /// A cycle-fatal error stopped the cycle before any sheet was touched.
    Aborted {
        cycle_id: Uuid,
        tab_id: i64,
        kind: CaptureErrorKind,
        message: String,
    },
    /// The cycle ran through to the append request.
    Completed(CycleReport),
}

impl CycleOutcome {
    /// True when a row was written.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Completed(CycleReport {
                append: AppendStatus::Appended,
                ..
            })
        )
    }

    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Completed(report) => Some(report),
            _ => None,
        }
    }
}
