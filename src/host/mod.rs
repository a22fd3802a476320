//! Adapters that let the capture cycle run as a command-line program.
//!
//! In a browser these collaborators are a content script, the identity API
//! and the tab-update listener. Here they are an HTTP fetch, an environment
//! variable or token command, and JSON lines on stdin.

pub mod credentials;
pub mod events;
pub mod extractor;

pub use credentials::{CommandCredentialProvider, EnvCredentialProvider, FallbackCredentialProvider};
pub use events::{parse_event_line, EventReader};
pub use extractor::{read_document, HttpPageExtractor};
