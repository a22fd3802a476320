//! Credential acquisition algebra.

use crate::types::AccessToken;
use async_trait::async_trait;

use super::error::CredentialFailure;

/// Parameters for one token request.
#[derive(Debug, Clone, Copy)]
pub struct CredentialRequest<'a> {
    /// Whether the provider may prompt the user (consent screen, sign-in).
    pub interactive: bool,
    /// OAuth scopes the token must carry.
    pub scopes: &'a [String],
}

/// Source of bearer tokens for the Sheets API.
///
/// # Laws
///
/// - **L1 (No-Prompt)**: With `interactive == false` an implementation never
///   prompts; if it would have to, it fails with `InteractionRequired`.
/// - **L2 (Fresh-Per-Call)**: Callers request a token per cycle and never
///   cache it. Implementations may cache internally.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire(
        &self,
        request: CredentialRequest<'_>,
    ) -> Result<AccessToken, CredentialFailure>;
}
