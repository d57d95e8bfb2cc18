//! JWT Identity Verifier
//!
//! Verifies HS256 tokens issued by the account service and confirms that the
//! user still exists. Tokens carry the user id in `_id`; `sub` is accepted as
//! a fallback.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::application::realtime::{AuthError, IdentityVerifier};
use crate::config::JwtSettings;
use crate::domain::{Identity, UserId, UserRepository};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Claims {
    /// User ID as issued by the account service
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Subject (user ID), for tokens issued by standard tooling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    fn user_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.sub.as_deref())
            .filter(|id| !id.is_empty())
    }
}

pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    users: Arc<dyn UserRepository>,
}

impl JwtIdentityVerifier {
    pub fn new(settings: &JwtSettings, users: Arc<dyn UserRepository>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if !settings.require_exp {
            // Account service tokens are long-lived cookies without `exp`
            validation.required_spec_claims.clear();
        }

        Self {
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            users,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<Identity, AuthError> {
        let token_data = decode::<Claims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Rejected("Token expired".into()),
                _ => AuthError::Rejected("Invalid token".into()),
            })?;

        let user_id = token_data
            .claims
            .user_id()
            .map(UserId::from)
            .ok_or_else(|| AuthError::Rejected("Invalid token claims".into()))?;

        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or_else(|| AuthError::Rejected("Please login to access".into()))?;

        Ok(Identity::from(user))
    }
}
