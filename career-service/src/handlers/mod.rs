pub mod auth;
pub mod career;
pub mod health;
