//! User account with its single refresh-token slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User stored in MongoDB.
///
/// `refresh_token` and `refresh_token_expiry` form one slot: they are written
/// and cleared together, so a user holds at most one live refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub refresh_token_expiry: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A refresh token together with the instant after which it is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshGrant {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl User {
    /// Create a new user. `email` is expected to be normalized already.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            refresh_token: None,
            refresh_token_expiry: None,
            created_at: Utc::now(),
        }
    }

    /// The stored refresh slot, present only when both halves are set.
    pub fn refresh_grant(&self) -> Option<RefreshGrant> {
        match (&self.refresh_token, self.refresh_token_expiry) {
            (Some(token), Some(expires_at)) => Some(RefreshGrant {
                token: token.clone(),
                expires_at,
            }),
            _ => None,
        }
    }

    pub fn set_refresh_grant(&mut self, grant: &RefreshGrant) {
        self.refresh_token = Some(grant.token.clone());
        self.refresh_token_expiry = Some(grant.expires_at);
    }

    pub fn clear_refresh_grant(&mut self) {
        self.refresh_token = None;
        self.refresh_token_expiry = None;
    }

    /// Public view returned to clients.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Fields of a user that may leave the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
