//! Services layer for career-service.
//!
//! Session lifecycle, career profiles, recommendation providers, the static
//! catalog and the storage backends they run on.

pub mod career;
pub mod catalog;
mod database;
pub mod error;
mod jwt;
pub mod memory;
pub mod metrics;
pub mod providers;
pub mod session;
pub mod store;

pub use career::{CareerService, NewProfile};
pub use database::MongoStore;
pub use error::ServiceError;
pub use jwt::{Claims, JwtService, TokenError, TokenPair};
pub use memory::InMemoryStore;
pub use providers::{GeminiProvider, MockProvider, ProviderError, RecommendationProvider};
pub use session::{AuthStatus, Identity, RefreshedAccess, SessionGrant, SessionManager};
pub use store::{CareerProfileStore, StoreError, UserStore};
