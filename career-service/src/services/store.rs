//! Storage contracts for users and career profiles.
//!
//! `MongoStore` backs them in production; `InMemoryStore` backs tests and
//! local runs without a database.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CareerProfile, ProfileSummary, RefreshGrant, User};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key")]
    Duplicate,

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Store error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `StoreError::Duplicate` when the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Overwrite the refresh slot in one write. Returns false when the user is unknown.
    async fn set_refresh_token(&self, id: &str, grant: &RefreshGrant) -> Result<bool, StoreError>;

    /// Clear both halves of the refresh slot in one write. Idempotent.
    async fn clear_refresh_token(&self, id: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CareerProfileStore: Send + Sync {
    async fn insert_profile(&self, profile: &CareerProfile) -> Result<(), StoreError>;

    /// The owner's profiles, newest first.
    async fn list_profiles(&self, user: &str) -> Result<Vec<ProfileSummary>, StoreError>;

    /// A profile, only if it belongs to `user`.
    async fn find_profile(&self, id: &str, user: &str)
        -> Result<Option<CareerProfile>, StoreError>;

    /// Replace a stored profile owned by `profile.user`. Returns false when absent.
    async fn replace_profile(&self, profile: &CareerProfile) -> Result<bool, StoreError>;

    /// Delete a profile owned by `user`. Returns false when absent.
    async fn delete_profile(&self, id: &str, user: &str) -> Result<bool, StoreError>;
}
