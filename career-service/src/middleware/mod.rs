pub mod auth;
pub mod metrics;

pub use auth::{auth_middleware, AuthUser};
pub use metrics::metrics_middleware;
