//! Session lifecycle: register, login, refresh, logout and request identity.
//!
//! Each user holds a single refresh-token slot. Login overwrites it, logout
//! clears it, and refresh only succeeds for the exact token in the slot.

use std::sync::Arc;

use subtle::ConstantTimeEq;

use super::jwt::{JwtService, TokenError, TokenPair};
use super::metrics::record_auth_event;
use super::store::{StoreError, UserStore};
use super::ServiceError;
use crate::models::{normalize_email, PublicUser, RefreshGrant, User};
use crate::utils::{
    dummy_password_hash, hash_password, validate_password_strength, verify_password, Password,
    PasswordHashString,
};

/// Authenticated caller attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Result of a successful register or login.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub user: PublicUser,
    pub tokens: TokenPair,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Whether the client asked to persist cookies beyond the browser session.
    pub persistent: bool,
}

/// Result of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshedAccess {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated(String),
    Anonymous,
}

#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    jwt: JwtService,
}

impl SessionManager {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionGrant, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            record_auth_event("register", "invalid_name");
            return Err(ServiceError::Validation("Name is required".to_string()));
        }

        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::info!("Registration rejected: email already registered");
            record_auth_event("register", "duplicate");
            return Err(ServiceError::DuplicateEmail);
        }

        let password = Password::new(password);
        validate_password_strength(&password).map_err(|e| {
            record_auth_event("register", "weak_password");
            ServiceError::Validation(e.to_string())
        })?;

        let password_hash = hash_password(&password)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let mut user = User::new(name.to_string(), email, password_hash.into_string());
        let tokens = self.jwt.issue_pair(&user.id)?;
        user.set_refresh_grant(&RefreshGrant {
            token: tokens.refresh_token.clone(),
            expires_at: tokens.refresh_expires_at,
        });

        match self.users.insert_user(&user).await {
            Ok(()) => {}
            Err(StoreError::Duplicate) => {
                tracing::info!("Registration lost a race on email uniqueness");
                record_auth_event("register", "duplicate");
                return Err(ServiceError::DuplicateEmail);
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, "User registered");
        record_auth_event("register", "success");

        Ok(SessionGrant {
            user: user.public(),
            tokens,
            expires_in: self.jwt.access_token_expiry_seconds(),
            persistent: true,
        })
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<SessionGrant, ServiceError> {
        let email = normalize_email(email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                // Same Argon2 cost as a wrong password
                verify_password(&Password::new(password), dummy_password_hash());
                tracing::warn!("Login failed: unknown email");
                record_auth_event("login", "unknown_email");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let stored_hash = PasswordHashString::new(user.password_hash.clone());
        if !verify_password(&Password::new(password), &stored_hash) {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            record_auth_event("login", "wrong_password");
            return Err(ServiceError::InvalidCredentials);
        }

        let tokens = self.jwt.issue_pair(&user.id)?;
        let grant = RefreshGrant {
            token: tokens.refresh_token.clone(),
            expires_at: tokens.refresh_expires_at,
        };

        if !self.users.set_refresh_token(&user.id, &grant).await? {
            tracing::warn!(user_id = %user.id, "User vanished during login");
            return Err(ServiceError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, remember_me, "User logged in");
        record_auth_event("login", "success");

        Ok(SessionGrant {
            user: user.public(),
            tokens,
            expires_in: self.jwt.access_token_expiry_seconds(),
            persistent: remember_me,
        })
    }

    /// Mint a new access token from the stored refresh token.
    ///
    /// The refresh token itself is not rotated; the slot is left untouched.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<RefreshedAccess, ServiceError> {
        let token = match refresh_token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                record_auth_event("refresh", "missing");
                return Err(ServiceError::MissingToken);
            }
        };

        let user_id = self.jwt.verify_refresh(token).map_err(|e| {
            tracing::debug!(reason = %e, "Refresh token failed verification");
            record_auth_event("refresh", "invalid");
            ServiceError::InvalidToken
        })?;

        let user = match self.users.find_by_id(&user_id).await? {
            Some(user) => user,
            None => {
                tracing::warn!(user_id = %user_id, "Refresh token for unknown user");
                record_auth_event("refresh", "invalid");
                return Err(ServiceError::InvalidToken);
            }
        };

        let grant = match user.refresh_grant() {
            Some(grant) => grant,
            None => {
                tracing::info!(user_id = %user_id, "Refresh attempted with no active session");
                record_auth_event("refresh", "invalid");
                return Err(ServiceError::InvalidToken);
            }
        };

        let matches: bool = grant.token.as_bytes().ct_eq(token.as_bytes()).into();
        if !matches {
            tracing::warn!(user_id = %user_id, "Refresh token does not match stored session");
            record_auth_event("refresh", "superseded");
            return Err(ServiceError::InvalidToken);
        }

        if grant.is_expired() {
            tracing::info!(user_id = %user_id, "Stored refresh session has expired");
            record_auth_event("refresh", "expired");
            return Err(ServiceError::InvalidToken);
        }

        let access_token = self.jwt.issue_access(&user.id)?;
        tracing::info!(user_id = %user.id, "Access token refreshed");
        record_auth_event("refresh", "success");

        Ok(RefreshedAccess {
            access_token,
            expires_in: self.jwt.access_token_expiry_seconds(),
        })
    }

    /// Clear the caller's refresh slot. Safe to repeat.
    pub async fn logout(&self, user_id: &str) -> Result<(), ServiceError> {
        self.users.clear_refresh_token(user_id).await?;
        tracing::info!(user_id = %user_id, "User logged out");
        record_auth_event("logout", "success");
        Ok(())
    }

    pub fn verify(&self, identity: Option<&Identity>) -> AuthStatus {
        match identity {
            Some(identity) => AuthStatus::Authenticated(identity.user_id.clone()),
            None => AuthStatus::Anonymous,
        }
    }

    /// Resolve the caller behind an access token.
    ///
    /// An expired access token yields `AccessExpired` only when the client also
    /// holds a refresh cookie; every other failure is a plain `Unauthorized`.
    pub async fn resolve_identity(
        &self,
        access_token: Option<&str>,
        has_refresh_cookie: bool,
    ) -> Result<Identity, ServiceError> {
        let token = match access_token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => return Err(ServiceError::Unauthenticated),
        };

        let user_id = match self.jwt.verify_access(token) {
            Ok(user_id) => user_id,
            Err(TokenError::Expired) if has_refresh_cookie => {
                return Err(ServiceError::AccessExpired);
            }
            Err(e) => {
                tracing::debug!(reason = %e, "Access token rejected");
                return Err(ServiceError::Unauthorized);
            }
        };

        match self.users.find_by_id(&user_id).await? {
            Some(user) => Ok(Identity::from(&user)),
            None => {
                tracing::warn!(user_id = %user_id, "Access token for a user that no longer exists");
                Err(ServiceError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::InMemoryStore;
    use chrono::{Duration, Utc};

    fn jwt() -> JwtService {
        JwtService::with_lifetimes(
            b"access-secret",
            b"refresh-secret",
            Duration::minutes(15),
            Duration::days(7),
        )
    }

    fn manager() -> (SessionManager, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (SessionManager::new(store.clone(), jwt()), store)
    }

    #[tokio::test]
    async fn test_register_stores_hash_and_session() {
        let (sessions, store) = manager();

        let grant = sessions
            .register("Ann", "ann@x.com", "Secret1!")
            .await
            .expect("register");

        assert_eq!(grant.user.email, "ann@x.com");
        assert_eq!(grant.expires_in, 900);

        let stored = store.find_by_id(&grant.user.id).await.expect("find").expect("user");
        assert_ne!(stored.password_hash, "Secret1!");
        assert_eq!(
            stored.refresh_token.as_deref(),
            Some(grant.tokens.refresh_token.as_str())
        );
        let remaining = stored.refresh_token_expiry.expect("expiry") - Utc::now();
        assert!(remaining > Duration::days(6));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (sessions, store) = manager();
        sessions.register("Ann", "ann@x.com", "Secret1!").await.expect("register");

        let err = sessions.register("Ann 2", " ANN@x.com", "Secret2!").await;
        assert!(matches!(err, Err(ServiceError::DuplicateEmail)));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_register_weak_password_leaves_store_unchanged() {
        let (sessions, store) = manager();

        let err = sessions.register("Ann", "ann@x.com", "abcdef").await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let (sessions, store) = manager();

        let err = sessions.register("   ", "ann@x.com", "Secret1!").await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
        assert_eq!(store.user_count(), 0);

        let grant = sessions
            .register("  Ann  ", "ann@x.com", "Secret1!")
            .await
            .expect("register");
        assert_eq!(grant.user.name, "Ann");
    }

    #[tokio::test]
    async fn test_login_replaces_refresh_token() {
        let (sessions, _store) = manager();
        let registered = sessions
            .register("Ann", "ann@x.com", "Secret1!")
            .await
            .expect("register");

        let logged_in = sessions
            .login("ann@x.com", "Secret1!", false)
            .await
            .expect("login");
        assert!(!logged_in.persistent);
        assert_ne!(logged_in.tokens.refresh_token, registered.tokens.refresh_token);

        let err = sessions
            .refresh(Some(&registered.tokens.refresh_token))
            .await;
        assert!(matches!(err, Err(ServiceError::InvalidToken)));

        let refreshed = sessions
            .refresh(Some(&logged_in.tokens.refresh_token))
            .await
            .expect("refresh");
        assert_eq!(
            sessions.jwt().verify_access(&refreshed.access_token),
            Ok(logged_in.user.id.clone())
        );
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (sessions, _store) = manager();
        sessions.register("Ann", "ann@x.com", "Secret1!").await.expect("register");

        let unknown = sessions.login("bob@x.com", "Secret1!", true).await;
        let wrong = sessions.login("ann@x.com", "Wrong1!", true).await;

        let unknown = unknown.expect_err("unknown email");
        let wrong = wrong.expect_err("wrong password");
        assert!(matches!(unknown, ServiceError::InvalidCredentials));
        assert!(matches!(wrong, ServiceError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_refresh_requires_token() {
        let (sessions, _store) = manager();
        assert!(matches!(sessions.refresh(None).await, Err(ServiceError::MissingToken)));
        assert!(matches!(sessions.refresh(Some("")).await, Err(ServiceError::MissingToken)));
        assert!(matches!(
            sessions.refresh(Some("garbage")).await,
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_signed_but_unstored_refresh_token_rejected() {
        let (sessions, _store) = manager();
        let grant = sessions
            .register("Ann", "ann@x.com", "Secret1!")
            .await
            .expect("register");

        let (forged, _) = sessions.jwt().issue_refresh(&grant.user.id).expect("issue");
        assert!(matches!(
            sessions.refresh(Some(&forged)).await,
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_refresh_with_expired_stored_session() {
        let (sessions, store) = manager();
        let grant = sessions
            .register("Ann", "ann@x.com", "Secret1!")
            .await
            .expect("register");

        let stale = RefreshGrant {
            token: grant.tokens.refresh_token.clone(),
            expires_at: Utc::now() - Duration::minutes(1),
        };
        store.set_refresh_token(&grant.user.id, &stale).await.expect("set");

        assert!(matches!(
            sessions.refresh(Some(&grant.tokens.refresh_token)).await,
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_refresh_with_expired_refresh_jwt() {
        let store = Arc::new(InMemoryStore::new());
        let short_lived = JwtService::with_lifetimes(
            b"access-secret",
            b"refresh-secret",
            Duration::minutes(15),
            Duration::seconds(-1),
        );
        let sessions = SessionManager::new(store.clone(), short_lived);
        let grant = sessions
            .register("Ann", "ann@x.com", "Secret1!")
            .await
            .expect("register");

        // Stored slot still looks live; only the token's own exp has passed
        let slot = RefreshGrant {
            token: grant.tokens.refresh_token.clone(),
            expires_at: Utc::now() + Duration::days(7),
        };
        store.set_refresh_token(&grant.user.id, &slot).await.expect("set");

        assert_eq!(
            sessions.jwt().verify_refresh(&grant.tokens.refresh_token),
            Err(TokenError::Expired)
        );
        assert!(matches!(
            sessions.refresh(Some(&grant.tokens.refresh_token)).await,
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_refresh_does_not_rotate() {
        let (sessions, store) = manager();
        let grant = sessions
            .register("Ann", "ann@x.com", "Secret1!")
            .await
            .expect("register");

        sessions
            .refresh(Some(&grant.tokens.refresh_token))
            .await
            .expect("first refresh");
        sessions
            .refresh(Some(&grant.tokens.refresh_token))
            .await
            .expect("second refresh");

        let stored = store.find_by_id(&grant.user.id).await.expect("find").expect("user");
        assert_eq!(
            stored.refresh_token.as_deref(),
            Some(grant.tokens.refresh_token.as_str())
        );
    }

    #[tokio::test]
    async fn test_logout_invalidates_refresh_and_is_idempotent() {
        let (sessions, _store) = manager();
        let grant = sessions
            .register("Ann", "ann@x.com", "Secret1!")
            .await
            .expect("register");

        sessions.logout(&grant.user.id).await.expect("logout");
        sessions.logout(&grant.user.id).await.expect("second logout");
        sessions.logout("unknown-user").await.expect("unknown user logout");

        assert!(matches!(
            sessions.refresh(Some(&grant.tokens.refresh_token)).await,
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_resolve_identity_rules() {
        let store = Arc::new(InMemoryStore::new());
        let sessions = SessionManager::new(store.clone(), jwt());
        let expired_issuer = JwtService::with_lifetimes(
            b"access-secret",
            b"refresh-secret",
            Duration::minutes(-5),
            Duration::days(7),
        );

        let grant = sessions
            .register("Ann", "ann@x.com", "Secret1!")
            .await
            .expect("register");

        let identity = sessions
            .resolve_identity(Some(&grant.tokens.access_token), false)
            .await
            .expect("valid token");
        assert_eq!(identity.user_id, grant.user.id);
        assert_eq!(
            sessions.verify(Some(&identity)),
            AuthStatus::Authenticated(grant.user.id.clone())
        );
        assert_eq!(sessions.verify(None), AuthStatus::Anonymous);

        assert!(matches!(
            sessions.resolve_identity(None, true).await,
            Err(ServiceError::Unauthenticated)
        ));

        let expired = expired_issuer.issue_access(&grant.user.id).expect("issue");
        assert!(matches!(
            sessions.resolve_identity(Some(&expired), true).await,
            Err(ServiceError::AccessExpired)
        ));

        let just_expired = JwtService::with_lifetimes(
            b"access-secret",
            b"refresh-secret",
            Duration::seconds(-1),
            Duration::days(7),
        )
        .issue_access(&grant.user.id)
        .expect("issue");
        assert!(matches!(
            sessions.resolve_identity(Some(&just_expired), true).await,
            Err(ServiceError::AccessExpired)
        ));
        assert!(matches!(
            sessions.resolve_identity(Some(&expired), false).await,
            Err(ServiceError::Unauthorized)
        ));

        let orphan = sessions.jwt().issue_access("deleted-user").expect("issue");
        assert!(matches!(
            sessions.resolve_identity(Some(&orphan), false).await,
            Err(ServiceError::Unauthorized)
        ));

        assert!(matches!(
            sessions
                .resolve_identity(Some(&grant.tokens.refresh_token), false)
                .await,
            Err(ServiceError::Unauthorized)
        ));
    }
}
