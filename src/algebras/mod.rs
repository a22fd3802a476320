//! Capability algebras for page2sheet.
//!
//! This module defines traits for the collaborators a capture cycle talks to
//! but does not own. Each trait is:
//!
//! - **Object-safe** — usable as `Arc<dyn Trait>`
//! - **Documented with laws** — properties that all implementations must satisfy
//! - **Async via `async_trait`** where the collaborator suspends
//!
//! # Capability Traits
//!
//! - [`PageExtractor`] — request/response page snapshot for a tab
//! - [`CredentialProvider`] — bearer token acquisition, possibly interactive
//! - [`DiagnosticSink`] — structured diagnostic events emitted by a cycle
//!
//! The Sheet Store capability lives with its HTTP implementation in
//! [`crate::api`].

pub mod credentials;
pub mod diagnostics;
pub mod error;
pub mod extractor;

// Re-exports for convenience
pub use credentials::{CredentialProvider, CredentialRequest};
pub use diagnostics::{
    Diagnostic, DiagnosticEvent, DiagnosticSink, FanoutSink, LogSink, RecordingSink,
};
pub use error::{CredentialFailure, ExtractionFailure};
pub use extractor::PageExtractor;
