//! Shared setup for career-service integration tests.
//!
//! Builds the full router over the in-memory store and the mock provider so
//! tests run without MongoDB or network access.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use career_service::{
    build_router,
    config::{
        CareerConfig, CookieConfig, Environment, GeminiConfig, JwtConfig, MongoConfig,
        SecurityConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
    },
    services::{InMemoryStore, MockProvider},
    AppState,
};
use secrecy::Secret;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";
pub const PASSWORD: &str = "Secret1!";

pub fn test_config() -> CareerConfig {
    CareerConfig {
        common: service_core::config::Config::default(),
        environment: Environment::Dev,
        service_name: "career-service".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        mongodb: MongoConfig {
            uri: Secret::new("mongodb://localhost:27017".to_string()),
            database: "career_test".to_string(),
        },
        jwt: JwtConfig {
            access_secret: Secret::new(ACCESS_SECRET.to_string()),
            refresh_secret: Secret::new(REFRESH_SECRET.to_string()),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        },
        cookies: CookieConfig { secure: true },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        gemini: GeminiConfig {
            api_key: Secret::new(String::new()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        },
    }
}

/// Router plus handles on the backing store and provider.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub provider: Arc<MockProvider>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_provider(true)
    }

    pub fn with_provider(enabled: bool) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let provider = Arc::new(MockProvider::new(enabled));
        let state = AppState::new(
            test_config(),
            store.clone(),
            store.clone(),
            provider.clone(),
        );

        Self {
            router: build_router(state.clone()),
            store,
            provider,
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Register a user and return the `name=value` pairs of both session cookies.
    pub async fn register(&self, name: &str, email: &str) -> Session {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/auth/register",
                serde_json::json!({"name": name, "email": email, "password": PASSWORD}),
                None,
            ))
            .await;
        assert_eq!(response.status(), 201, "registration failed");
        Session::from_response(&response)
    }
}

/// Session cookies captured from a response.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl Session {
    pub fn from_response(response: &Response<Body>) -> Self {
        let mut session = Session::default();
        for raw in set_cookies(response) {
            let pair = raw.split(';').next().unwrap_or_default().to_string();
            if pair.starts_with("accessToken=") {
                session.access = Some(pair);
            } else if pair.starts_with("refreshToken=") {
                session.refresh = Some(pair);
            }
        }
        session
    }

    /// Value of a `Cookie` header carrying every captured cookie.
    pub fn cookie_header(&self) -> String {
        [self.access.as_deref(), self.refresh.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn access_token(&self) -> &str {
        self.access
            .as_deref()
            .and_then(|c| c.strip_prefix("accessToken="))
            .expect("access cookie")
    }

    pub fn refresh_token(&self) -> &str {
        self.refresh
            .as_deref()
            .and_then(|c| c.strip_prefix("refreshToken="))
            .expect("refresh cookie")
    }
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

pub fn json_request(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
