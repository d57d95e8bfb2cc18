//! User entity and repository trait.
//!
//! Read-only view of the `users` table owned by the account service.

use async_trait::async_trait;

use super::identity::{Identity, UserId};
use crate::shared::error::AppError;

/// User record as seen by the realtime gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Identity {
            user_id: user.id,
            name: user.name,
        }
    }
}

/// Repository trait for user lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id. Returns None if the user does not exist.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError>;
}
