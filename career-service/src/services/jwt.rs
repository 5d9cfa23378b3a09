use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{JwtConfig, MAX_ACCESS_TOKEN_EXPIRY_MINUTES, MAX_REFRESH_TOKEN_EXPIRY_DAYS};

/// Signing material for one token kind.
#[derive(Clone)]
struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// JWT service for token generation and validation.
///
/// Access and refresh tokens are signed with independent HS256 secrets, so a
/// token of one kind never verifies as the other.
#[derive(Clone)]
pub struct JwtService {
    access: TokenKeys,
    refresh: TokenKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// Claims carried by both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token ID, keeps tokens minted in the same second distinct
    pub jti: String,
}

/// Why a token was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
    #[error("token invalid")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed,
            _ => TokenError::Invalid,
        }
    }
}

/// Freshly issued access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Instant the refresh token stops being honoured.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT service initialized with HS256 secrets");

        Self::with_lifetimes(
            config.access_secret.expose_secret().as_bytes(),
            config.refresh_secret.expose_secret().as_bytes(),
            Duration::minutes(
                config
                    .access_token_expiry_minutes
                    .clamp(1, MAX_ACCESS_TOKEN_EXPIRY_MINUTES),
            ),
            Duration::days(
                config
                    .refresh_token_expiry_days
                    .clamp(1, MAX_REFRESH_TOKEN_EXPIRY_DAYS),
            ),
        )
    }

    pub fn with_lifetimes(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access: TokenKeys::from_secret(access_secret),
            refresh: TokenKeys::from_secret(refresh_secret),
            access_ttl,
            refresh_ttl,
        }
    }

    fn sign(
        keys: &TokenKeys,
        user_id: &str,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), anyhow::Error> {
        let now = Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))?;

        Ok((token, exp))
    }

    fn verify(keys: &TokenKeys, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry is exact; no clock tolerance past `exp`
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &keys.decoding, &validation)?;
        Ok(token_data.claims)
    }

    /// Generate an access token for a user
    pub fn issue_access(&self, user_id: &str) -> Result<String, anyhow::Error> {
        Self::sign(&self.access, user_id, self.access_ttl).map(|(token, _)| token)
    }

    /// Generate a refresh token for a user, with its expiry
    pub fn issue_refresh(&self, user_id: &str) -> Result<(String, DateTime<Utc>), anyhow::Error> {
        Self::sign(&self.refresh, user_id, self.refresh_ttl)
    }

    /// Generate both access and refresh tokens
    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair, anyhow::Error> {
        let access_token = self.issue_access(user_id)?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh(user_id)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Validate an access token and return the bound user id
    pub fn verify_access(&self, token: &str) -> Result<String, TokenError> {
        Self::verify(&self.access, token).map(|claims| claims.sub)
    }

    /// Validate a refresh token and return the bound user id
    pub fn verify_refresh(&self, token: &str) -> Result<String, TokenError> {
        Self::verify(&self.refresh, token).map(|claims| claims.sub)
    }

    /// Access token lifetime in seconds (for client info)
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
