// src/analytics/mod.rs
//! Run statistics over finished capture cycles.

use crate::capture::{AppendStatus, CycleOutcome, Provisioning};
use crate::error::CaptureErrorKind;
use indexmap::IndexMap;
use std::fmt;

/// Tally of a run, for the summary printed when the host exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub ignored: usize,
    pub appended: usize,
    pub append_failures: usize,
    pub sheets_created: usize,
    pub creation_failures: usize,
    pub headers_missing: usize,
    pub aborted: IndexMap<CaptureErrorKind, usize>,
    /// Rows appended per sheet, in first-seen order.
    pub rows_per_sheet: IndexMap<String, usize>,
}

impl RunSummary {
    pub fn aborted_total(&self) -> usize {
        self.aborted.values().sum()
    }

    /// Cycles that ran but did not end with an appended row.
    pub fn failed_total(&self) -> usize {
        self.aborted_total() + self.append_failures
    }
}

/// Summarizes a batch of cycle outcomes.
pub fn summarize(outcomes: &[CycleOutcome]) -> RunSummary {
    let mut summary = RunSummary {
        events: outcomes.len(),
        ..RunSummary::default()
    };

    for outcome in outcomes {
        match outcome {
            CycleOutcome::Ignored => summary.ignored += 1,
            CycleOutcome::Aborted { kind, .. } => {
                *summary.aborted.entry(*kind).or_insert(0) += 1;
            }
            CycleOutcome::Completed(report) => {
                match report.provisioning {
                    Provisioning::NotNeeded => {}
                    Provisioning::Created { header_written } => {
                        summary.sheets_created += 1;
                        if !header_written {
                            summary.headers_missing += 1;
                        }
                    }
                    Provisioning::CreationFailed => summary.creation_failures += 1,
                }
                match report.append {
                    AppendStatus::Appended => {
                        summary.appended += 1;
                        *summary
                            .rows_per_sheet
                            .entry(report.sheet_title.to_string())
                            .or_insert(0) += 1;
                    }
                    AppendStatus::Failed { .. } => summary.append_failures += 1,
                }
            }
        }
    }

    summary
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} event(s): {} row(s) appended, {} failed, {} ignored",
            self.events,
            self.appended,
            self.failed_total(),
            self.ignored
        )?;
        if self.sheets_created > 0 {
            write!(f, "; {} sheet(s) created", self.sheets_created)?;
        }
        for (sheet, rows) in &self.rows_per_sheet {
            write!(f, "\n  {}: {}", sheet, rows)?;
        }
        for (kind, count) in &self.aborted {
            write!(f, "\n  aborted ({}): {}", kind, count)?;
        }
        Ok(())
    }
}
