//! Error types for the collaborator algebras.
//!
//! These are intentionally narrow: each one describes how a single
//! collaborator can fail, and nothing about what the cycle does about it.

use std::fmt;
use std::time::Duration;

/// Error returned by a [`PageExtractor`](super::PageExtractor).
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionFailure {
    /// The extractor did not answer within the messaging deadline.
    NoResponse { waited: Duration },

    /// No extractor is listening for this tab (closed tab, restricted page).
    Unreachable { reason: String },

    /// The extractor did not understand the request.
    UnsupportedRequest { action: String },

    /// The extractor ran but could not read the document.
    Failed { reason: String },
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse { waited } => {
                write!(f, "No response from page extractor after {:?}", waited)
            }
            Self::Unreachable { reason } => write!(f, "Page extractor unreachable: {}", reason),
            Self::UnsupportedRequest { action } => {
                write!(f, "Page extractor does not handle action '{}'", action)
            }
            Self::Failed { reason } => write!(f, "Page extraction failed: {}", reason),
        }
    }
}

impl std::error::Error for ExtractionFailure {}

/// Error returned by a [`CredentialProvider`](super::CredentialProvider).
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialFailure {
    /// The user declined, or the issuer refused the request.
    Denied { reason: String },

    /// A token can only be obtained by prompting, and prompting was not allowed.
    InteractionRequired,

    /// The issuer could not be reached or is not configured.
    Unavailable { reason: String },

    /// The issuer answered with something that is not a usable token.
    Malformed { reason: String },
}

impl fmt::Display for CredentialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied { reason } => write!(f, "Credential request denied: {}", reason),
            Self::InteractionRequired => {
                write!(f, "Credential requires interactive sign-in, which was not permitted")
            }
            Self::Unavailable { reason } => write!(f, "Credential unavailable: {}", reason),
            Self::Malformed { reason } => write!(f, "Malformed credential: {}", reason),
        }
    }
}

impl std::error::Error for CredentialFailure {}

impl From<crate::types::ValidationError> for CredentialFailure {
    fn from(err: crate::types::ValidationError) -> Self {
        Self::Malformed {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_failure_display() {
        let err = ExtractionFailure::NoResponse {
            waited: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "No response from page extractor after 10s");

        let err = ExtractionFailure::UnsupportedRequest {
            action: "ping".to_string(),
        };
        assert_eq!(err.to_string(), "Page extractor does not handle action 'ping'");
    }

    #[test]
    fn test_credential_failure_display() {
        assert_eq!(
            CredentialFailure::InteractionRequired.to_string(),
            "Credential requires interactive sign-in, which was not permitted"
        );
        let err = CredentialFailure::Denied {
            reason: "user closed the consent window".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Credential request denied: user closed the consent window"
        );
    }

    #[test]
    fn test_invalid_token_maps_to_malformed() {
        let err: CredentialFailure = crate::types::AccessToken::new("").unwrap_err().into();
        assert!(matches!(err, CredentialFailure::Malformed { .. }));
    }
}
