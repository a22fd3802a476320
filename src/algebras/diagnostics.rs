//! Structured diagnostics emitted by capture cycles.
//!
//! A cycle never raises past its own boundary; everything worth knowing about
//! it is reported here instead. Sinks are injected, so tests can assert on
//! what a cycle reported without scraping log output.

use crate::error::{CaptureErrorKind, TOKEN_REJECTED_HINT};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// What happened at one step of a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A cycle-fatal error stopped the cycle before the append.
    CycleAborted {
        kind: CaptureErrorKind,
        message: String,
    },
    /// Spreadsheet metadata could not be read; the sheet is treated as absent.
    ExistenceCheckFailed { message: String },
    SheetCreated,
    SheetCreationFailed { message: String },
    HeaderWriteFailed { message: String },
    RowAppended,
    AppendFailed { message: String },
}

impl DiagnosticEvent {
    pub fn level(&self) -> log::Level {
        match self {
            Self::SheetCreated | Self::RowAppended => log::Level::Info,
            Self::ExistenceCheckFailed { .. } | Self::HeaderWriteFailed { .. } => {
                log::Level::Warn
            }
            Self::CycleAborted { .. }
            | Self::SheetCreationFailed { .. }
            | Self::AppendFailed { .. } => log::Level::Error,
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::SheetCreated | Self::RowAppended)
    }

    /// A Sheets step that failed because Google refused the access token.
    pub fn token_rejected(&self) -> bool {
        match self {
            Self::ExistenceCheckFailed { message }
            | Self::SheetCreationFailed { message }
            | Self::HeaderWriteFailed { message }
            | Self::AppendFailed { message } => message.ends_with(TOKEN_REJECTED_HINT),
            Self::CycleAborted { .. } | Self::SheetCreated | Self::RowAppended => false,
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleAborted { kind, message } => {
                write!(f, "cycle aborted ({}): {}", kind, message)
            }
            Self::ExistenceCheckFailed { message } => {
                write!(f, "error checking for existing sheet: {}", message)
            }
            Self::SheetCreated => write!(f, "new sheet created"),
            Self::SheetCreationFailed { message } => {
                write!(f, "error creating sheet: {}", message)
            }
            Self::HeaderWriteFailed { message } => {
                write!(f, "could not add header row: {}", message)
            }
            Self::RowAppended => write!(f, "data appended"),
            Self::AppendFailed { message } => write!(f, "error appending data: {}", message),
        }
    }
}

/// One diagnostic record, tagged with the cycle that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub cycle_id: Uuid,
    pub tab_id: i64,
    /// Known once the target sheet has been derived.
    pub sheet_title: Option<String>,
    pub event: DiagnosticEvent,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short_id: String = self.cycle_id.simple().to_string().chars().take(8).collect();
        match &self.sheet_title {
            Some(sheet) => write!(
                f,
                "[cycle {} tab {}] '{}': {}",
                short_id, self.tab_id, sheet, self.event
            ),
            None => write!(f, "[cycle {} tab {}] {}", short_id, self.tab_id, self.event),
        }
    }
}

/// Receiver of cycle diagnostics.
///
/// # Laws
///
/// - **L1 (Non-Blocking)**: `emit` returns promptly and never fails; a sink
///   that cannot record an event drops it.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: Diagnostic) {
        log::log!(diagnostic.event.level(), "{}", diagnostic);
    }
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.records.lock().iter().map(|d| d.event.clone()).collect()
    }

    pub fn failure_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|d| d.event.is_failure())
            .count()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.records.lock().push(diagnostic);
    }
}

/// Broadcasts each diagnostic to several sinks.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl DiagnosticSink for FanoutSink {
    fn emit(&self, diagnostic: Diagnostic) {
        for sink in &self.sinks {
            sink.emit(diagnostic.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(event: DiagnosticEvent) -> Diagnostic {
        Diagnostic {
            cycle_id: Uuid::nil(),
            tab_id: 7,
            sheet_title: Some("example.com".to_string()),
            event,
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(DiagnosticEvent::RowAppended.level(), log::Level::Info);
        assert_eq!(
            DiagnosticEvent::HeaderWriteFailed {
                message: "x".to_string()
            }
            .level(),
            log::Level::Warn
        );
        assert_eq!(
            DiagnosticEvent::AppendFailed {
                message: "x".to_string()
            }
            .level(),
            log::Level::Error
        );
    }

    #[test]
    fn test_display() {
        let diagnostic = sample(DiagnosticEvent::SheetCreationFailed {
            message: "Unknown error".to_string(),
        });
        assert_eq!(
            diagnostic.to_string(),
            "[cycle 00000000 tab 7] 'example.com': error creating sheet: Unknown error"
        );
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let first = Arc::new(RecordingSink::new());
        let second = Arc::new(RecordingSink::new());
        let fanout = FanoutSink::new()
            .with_sink(first.clone())
            .with_sink(second.clone());

        fanout.emit(sample(DiagnosticEvent::RowAppended));

        assert_eq!(first.events(), vec![DiagnosticEvent::RowAppended]);
        assert_eq!(second.events(), vec![DiagnosticEvent::RowAppended]);
        assert_eq!(first.failure_count(), 0);
    }

    #[test]
    fn test_token_rejection_is_recognized() {
        let rejected = DiagnosticEvent::AppendFailed {
            message: format!("Request had invalid authentication credentials. {}", TOKEN_REJECTED_HINT),
        };
        assert!(rejected.token_rejected());
        assert!(rejected.is_failure());

        let other = DiagnosticEvent::AppendFailed {
            message: "Unable to parse range".to_string(),
        };
        assert!(!other.token_rejected());
        assert!(!DiagnosticEvent::RowAppended.token_rejected());
    }
}
