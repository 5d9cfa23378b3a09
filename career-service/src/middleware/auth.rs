use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use service_core::error::AppError;

use crate::{
    handlers::auth::{bearer_token, cookie_value, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    services::Identity,
    AppState,
};

/// Middleware to require authentication.
///
/// The `accessToken` cookie wins over an `Authorization: Bearer` header. The
/// resolved [`Identity`] is stored in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let access_token =
        cookie_value(&jar, ACCESS_TOKEN_COOKIE).or_else(|| bearer_token(req.headers()));
    let has_refresh_cookie = cookie_value(&jar, REFRESH_TOKEN_COOKIE).is_some();

    let identity = state
        .sessions
        .resolve_identity(access_token, has_refresh_cookie)
        .await?;

    tracing::Span::current().record("user_id", identity.user_id.as_str());
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Extractor to easily get the caller in handlers
pub struct AuthUser(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts.extensions.get::<Identity>().ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("Not authorized to access this route"))
        })?;

        Ok(AuthUser(identity.clone()))
    }
}
