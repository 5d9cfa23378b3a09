pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use service_core::axum::{
    http::{header, HeaderName, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::CareerConfig;
use crate::services::{
    CareerProfileStore, CareerService, JwtService, RecommendationProvider, SessionManager,
    UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: CareerConfig,
    pub users: Arc<dyn UserStore>,
    pub sessions: SessionManager,
    pub careers: CareerService,
}

impl AppState {
    pub fn new(
        config: CareerConfig,
        users: Arc<dyn UserStore>,
        profiles: Arc<dyn CareerProfileStore>,
        provider: Arc<dyn RecommendationProvider>,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt);
        let sessions = SessionManager::new(users.clone(), jwt);
        let careers = CareerService::new(profiles, provider);

        Self {
            config,
            users,
            sessions,
            careers,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/verify", get(handlers::auth::verify))
        .route(
            "/api/career/recommendations",
            post(handlers::career::generate_recommendations),
        )
        .route("/api/career/profiles", get(handlers::career::list_profiles))
        .route(
            "/api/career/profiles/:id",
            get(handlers::career::get_profile)
                .put(handlers::career::update_profile)
                .delete(handlers::career::delete_profile),
        )
        .route(
            "/api/career/catalog/courses",
            get(handlers::career::catalog_courses),
        )
        .route("/api/career/catalog/jobs", get(handlers::career::catalog_jobs))
        .route(
            "/api/career/catalog/stats",
            get(handlers::career::catalog_stats),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let cors = cors_layer(&state.config.security.allowed_origins);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::metrics))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh-token", post(handlers::auth::refresh_token))
        .merge(protected)
        .route_layer(from_fn(middleware::metrics_middleware))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                user_id = tracing::field::Empty,
            )
        }))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}
