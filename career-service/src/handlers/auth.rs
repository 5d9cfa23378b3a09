//! Session endpoints. Tokens travel in HttpOnly cookies; bodies carry only
//! the public user and the access token lifetime.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service_core::error::AppError;

use crate::{
    dtos::{
        auth::{AuthResponse, LoginRequest, RefreshResponse, RegisterRequest},
        MessageResponse,
    },
    middleware::AuthUser,
    services::{AuthStatus, Identity, SessionGrant},
    utils::ValidatedJson,
    AppState,
};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Token from `Authorization: Bearer <token>`, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Non-empty cookie value.
pub fn cookie_value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(|c| c.value()).filter(|v| !v.is_empty())
}

/// Session cookie. `max_age = None` makes it last for the browser session.
fn session_cookie(
    name: &'static str,
    value: String,
    max_age: Option<time::Duration>,
    secure: bool,
) -> Cookie<'static> {
    let mut builder = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict);

    if let Some(max_age) = max_age {
        builder = builder.max_age(max_age);
    }

    builder.build()
}

fn to_time(duration: chrono::Duration) -> time::Duration {
    time::Duration::seconds(duration.num_seconds())
}

fn with_session_cookies(state: &AppState, jar: CookieJar, grant: &SessionGrant) -> CookieJar {
    let secure = state.config.cookies.secure;
    let jwt = state.sessions.jwt();
    let (access_age, refresh_age) = if grant.persistent {
        (Some(to_time(jwt.access_ttl())), Some(to_time(jwt.refresh_ttl())))
    } else {
        (None, None)
    };

    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        grant.tokens.access_token.clone(),
        access_age,
        secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        grant.tokens.refresh_token.clone(),
        refresh_age,
        secure,
    ))
}

fn auth_response(grant: SessionGrant) -> Json<AuthResponse> {
    Json(AuthResponse {
        success: true,
        expires_in: grant.expires_in,
        user: grant.user,
    })
}

/// Register a new account and start a session
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let grant = state
        .sessions
        .register(&req.name, &req.email, &req.password)
        .await?;

    let jar = with_session_cookies(&state, jar, &grant);
    Ok((StatusCode::CREATED, jar, auth_response(grant)))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let grant = state
        .sessions
        .login(&req.email, &req.password, req.remember_me)
        .await?;

    let jar = with_session_cookies(&state, jar, &grant);
    Ok((StatusCode::OK, jar, auth_response(grant)))
}

/// Issue a new access token from the refresh cookie (or bearer fallback)
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let presented = cookie_value(&jar, REFRESH_TOKEN_COOKIE).or_else(|| bearer_token(&headers));

    let refreshed = state.sessions.refresh(presented).await?;

    let jar = jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        refreshed.access_token,
        Some(to_time(state.sessions.jwt().access_ttl())),
        state.config.cookies.secure,
    ));

    Ok((
        StatusCode::OK,
        jar,
        Json(RefreshResponse {
            success: true,
            expires_in: refreshed.expires_in,
        }),
    ))
}

/// Clear the stored session and both cookies
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    state.sessions.logout(&user.0.user_id).await?;

    let jar = jar
        .remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"));

    Ok((
        StatusCode::OK,
        jar,
        Json(MessageResponse::ok("User logged out successfully")),
    ))
}

/// Report whether the request carries a valid session
pub async fn verify(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
) -> Result<impl IntoResponse, AppError> {
    match state.sessions.verify(identity.as_ref().map(|Extension(i)| i)) {
        AuthStatus::Authenticated(_) => Ok((
            StatusCode::OK,
            Json(MessageResponse::ok("User is authenticated")),
        )),
        AuthStatus::Anonymous => Err(AppError::Unauthorized(anyhow::anyhow!(
            "User is not authenticated"
        ))),
    }
}
