pub mod password;
pub mod validation;

pub use password::{
    dummy_password_hash, hash_password, validate_password_strength, verify_password, Password,
    PasswordHashString, PasswordPolicyError,
};
pub use validation::ValidatedJson;
