//! Capture cycles — from a tab's load-complete event to a row in its sheet.
//!
//! One [`TabEvent`] drives at most one cycle:
//!
//! ```text
//! extract page -> acquire token -> validate config -> derive sheet
//!     -> check existence -> [create sheet -> write header] -> append row
//! ```
//!
//! The first four steps are cycle-fatal: their failure ends the cycle with a
//! single `CycleAborted` diagnostic before any Sheets request is made. The
//! Sheets steps degrade instead (see [`provisioning`]). Nothing is cached
//! between cycles; every cycle asks for a fresh token and re-checks the
//! spreadsheet.

mod locks;
mod outcome;
mod provisioning;

pub use locks::{SheetLockGuard, SheetLocks};
pub use outcome::{AppendStatus, CycleOutcome, CycleReport, Provisioning, SheetExistence};

use crate::algebras::{
    CredentialProvider, CredentialRequest, Diagnostic, DiagnosticEvent, DiagnosticSink,
    ExtractionFailure, LogSink, PageExtractor,
};
use crate::api::SheetStore;
use crate::config::{CaptureConfig, SheetRouting, ValidatedConfig};
use crate::constants::{EXTRACTOR_MESSAGING_TIMEOUT, TIMESTAMP_FORMAT};
use crate::error::CaptureError;
use crate::model::{CapturedPage, ScrapeRequest, SheetRow, TabEvent};
use crate::types::{SheetTitle, ValidationError};
use parking_lot::Mutex;
use provisioning::SheetSteps;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of a running cycle, attached to every diagnostic it emits.
pub(crate) struct CycleScope {
    cycle_id: Uuid,
    tab_id: i64,
    sheet_title: Mutex<Option<String>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl CycleScope {
    fn new(tab_id: i64, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            tab_id,
            sheet_title: Mutex::new(None),
            sink,
        }
    }

    fn set_sheet(&self, sheet: &SheetTitle) {
        *self.sheet_title.lock() = Some(sheet.to_string());
    }

    pub(crate) fn emit(&self, event: DiagnosticEvent) {
        self.sink.emit(Diagnostic {
            cycle_id: self.cycle_id,
            tab_id: self.tab_id,
            sheet_title: self.sheet_title.lock().clone(),
            event,
        });
    }
}

/// Drives capture cycles against injected collaborators.
///
/// Cheap to share behind an `Arc`; concurrent cycles are allowed. With
/// `serialize_per_sheet` enabled, cycles targeting the same sheet run their
/// Sheets steps one at a time.
pub struct CaptureOrchestrator {
    config: Arc<CaptureConfig>,
    extractor: Arc<dyn PageExtractor>,
    credentials: Arc<dyn CredentialProvider>,
    store: Arc<dyn SheetStore>,
    diagnostics: Arc<dyn DiagnosticSink>,
    locks: SheetLocks,
}

impl CaptureOrchestrator {
    pub fn new(
        config: Arc<CaptureConfig>,
        extractor: Arc<dyn PageExtractor>,
        credentials: Arc<dyn CredentialProvider>,
        store: Arc<dyn SheetStore>,
    ) -> Self {
        Self {
            config,
            extractor,
            credentials,
            store,
            diagnostics: Arc::new(LogSink),
            locks: SheetLocks::new(),
        }
    }

    /// Replaces the default [`LogSink`].
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Handles one tab event. Events other than load-complete-with-URL are
    /// ignored without touching any collaborator.
    pub async fn handle_event(&self, event: &TabEvent) -> CycleOutcome {
        let Some(trigger_url) = event.trigger_url() else {
            return CycleOutcome::Ignored;
        };

        let scope = CycleScope::new(event.tab_id, self.diagnostics.clone());
        log::debug!(
            "Cycle {} started for tab {} ({})",
            scope.cycle_id,
            event.tab_id,
            trigger_url
        );

        match self.run_cycle(&scope, event, trigger_url).await {
            Ok(report) => CycleOutcome::Completed(report),
            Err(error) => {
                let kind = error.kind();
                let message = error.diagnostic_message();
                scope.emit(DiagnosticEvent::CycleAborted {
                    kind,
                    message: message.clone(),
                });
                CycleOutcome::Aborted {
                    cycle_id: scope.cycle_id,
                    tab_id: event.tab_id,
                    kind,
                    message,
                }
            }
        }
    }

    async fn run_cycle(
        &self,
        scope: &CycleScope,
        event: &TabEvent,
        trigger_url: &str,
    ) -> Result<CycleReport, CaptureError> {
        let page = self.extract_page(event).await?;

        let token = self
            .credentials
            .acquire(CredentialRequest {
                interactive: true,
                scopes: &self.config.oauth_scopes,
            })
            .await?;

        let config = self.config.validate()?;

        let sheet = derive_sheet_title(&config, trigger_url)?;
        scope.set_sheet(&sheet);

        let _guard = if config.serialize_per_sheet {
            let key = format!("{}/{}", config.spreadsheet_id, sheet);
            Some(self.locks.acquire(&key).await)
        } else {
            None
        };

        let steps = SheetSteps {
            store: self.store.as_ref(),
            spreadsheet: &config.spreadsheet_id,
            sheet: &sheet,
            token: &token,
            scope,
        };

        let existence = steps.check_existence().await;
        let provisioning = if existence.needs_provisioning() {
            steps.provision().await
        } else {
            Provisioning::NotNeeded
        };

        let row = SheetRow::from_capture(trigger_url, &page, current_timestamp());
        let append = steps.append(&row).await;

        Ok(CycleReport {
            cycle_id: scope.cycle_id,
            tab_id: event.tab_id,
            sheet_title: sheet,
            existence,
            provisioning,
            row,
            append,
        })
    }

    /// Asks the extractor for the tab's page, bounded by the messaging deadline.
    ///
    /// Extraction runs before the configuration is validated, so a zero
    /// deadline falls back to the default here and is then rejected by
    /// validation as `ConfigurationInvalid`.
    async fn extract_page(&self, event: &TabEvent) -> Result<CapturedPage, ExtractionFailure> {
        let waited = match self.config.messaging_timeout {
            deadline if deadline.is_zero() => EXTRACTOR_MESSAGING_TIMEOUT,
            deadline => deadline,
        };
        let request = ScrapeRequest::scrape();
        let page = tokio::time::timeout(waited, self.extractor.request(event, &request))
            .await
            .map_err(|_| ExtractionFailure::NoResponse { waited })??;
        Ok(page.truncated(self.config.max_content_length))
    }
}

/// The sheet a capture from `trigger_url` belongs to.
fn derive_sheet_title(
    config: &ValidatedConfig,
    trigger_url: &str,
) -> Result<SheetTitle, CaptureError> {
    match &config.routing {
        SheetRouting::Fixed(title) => Ok(title.clone()),
        SheetRouting::PerDomain => url::Url::parse(trigger_url)
            .map_err(|e| ValidationError::InvalidUrl {
                url: trigger_url.to_string(),
                reason: e.to_string(),
            })
            .and_then(|url| SheetTitle::from_page_url(&url))
            .map_err(|e| CaptureError::UnaddressableUrl {
                url: trigger_url.to_string(),
                reason: e.to_string(),
            }),
    }
}

fn current_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
