//! Session Gate
//!
//! Admission check run once per incoming connection, before the transport is
//! upgraded. A rejected attempt never reaches the registry or the presence
//! tracker.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::GatewayError;
use crate::domain::Identity;
use crate::infrastructure::metrics;

/// Outcome of a failed credential check.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Credential is well-formed but not acceptable (bad signature, expired,
    /// unknown user).
    #[error("{0}")]
    Rejected(String),

    /// The verifier could not reach a decision.
    #[error("{0}")]
    Internal(String),
}

/// Turns a credential into an identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<Identity, AuthError>;
}

pub struct SessionGate {
    verifier: Arc<dyn IdentityVerifier>,
}

impl SessionGate {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// Admit a connection attempt carrying an optional credential.
    pub async fn admit(&self, credential: Option<&str>) -> Result<Identity, GatewayError> {
        let credential = match credential.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => {
                metrics::record_handshake_rejected();
                return Err(GatewayError::AuthRejected("Missing credential".into()));
            }
        };

        match self.verifier.verify(credential).await {
            Ok(identity) => Ok(identity),
            Err(AuthError::Rejected(reason)) => {
                metrics::record_handshake_rejected();
                Err(GatewayError::AuthRejected(reason))
            }
            Err(AuthError::Internal(reason)) => {
                metrics::record_handshake_rejected();
                tracing::error!(error = %reason, "Identity verifier failed");
                Err(GatewayError::VerificationFailed(reason))
            }
        }
    }
}
