//! Credential providers for the command-line host.

use crate::algebras::{CredentialFailure, CredentialProvider, CredentialRequest};
use crate::constants::ACCESS_TOKEN_ENV_VAR;
use crate::types::{AccessToken, ValidationError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::process::Command;

/// Reads a ready-made token from an environment variable. Never prompts.
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self::with_var(ACCESS_TOKEN_ENV_VAR)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn acquire(
        &self,
        _request: CredentialRequest<'_>,
    ) -> Result<AccessToken, CredentialFailure> {
        let value = std::env::var(&self.var).map_err(|_| CredentialFailure::Unavailable {
            reason: format!("{} is not set", self.var),
        })?;
        Ok(AccessToken::new(value)?)
    }
}

/// Runs an external command that prints a token on stdout, e.g.
/// `gcloud auth print-access-token`.
///
/// Such commands may open a browser for sign-in, so they only run when the
/// request permits interaction. Requested scopes are passed as
/// `--scopes=a,b`.
#[derive(Debug, Clone)]
pub struct CommandCredentialProvider {
    program: String,
    args: Vec<String>,
}

impl CommandCredentialProvider {
    pub fn new(command_line: &str) -> Result<Self, ValidationError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ValidationError::EmptyField("token_command"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl CredentialProvider for CommandCredentialProvider {
    async fn acquire(
        &self,
        request: CredentialRequest<'_>,
    ) -> Result<AccessToken, CredentialFailure> {
        if !request.interactive {
            return Err(CredentialFailure::InteractionRequired);
        }

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if !request.scopes.is_empty() {
            command.arg(format!("--scopes={}", request.scopes.join(",")));
        }

        log::debug!("Requesting access token from `{}`", self.program);
        let output = command
            .output()
            .await
            .map_err(|e| CredentialFailure::Unavailable {
                reason: format!("could not run `{}`: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(CredentialFailure::Denied {
                reason: if stderr.is_empty() {
                    format!("`{}` exited with {}", self.program, output.status)
                } else {
                    stderr
                },
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(AccessToken::new(stdout)?)
    }
}

/// Tries each provider in turn and returns the first token obtained.
pub struct FallbackCredentialProvider {
    providers: Vec<Arc<dyn CredentialProvider>>,
}

impl FallbackCredentialProvider {
    pub fn new(providers: Vec<Arc<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl CredentialProvider for FallbackCredentialProvider {
    async fn acquire(
        &self,
        request: CredentialRequest<'_>,
    ) -> Result<AccessToken, CredentialFailure> {
        let mut last_failure = CredentialFailure::Unavailable {
            reason: "no credential provider configured".to_string(),
        };
        for provider in &self.providers {
            match provider.acquire(request).await {
                Ok(token) => return Ok(token),
                Err(failure) => {
                    log::debug!("Credential provider declined: {}", failure);
                    last_failure = failure;
                }
            }
        }
        Err(last_failure)
    }
}
