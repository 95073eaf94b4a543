//! Account creation, password handling and authentication for the user entity.

pub mod backend;
pub mod email;
pub mod error;
pub mod manager;
pub mod password;
pub mod permissions;

#[cfg(test)]
mod testing;

pub use backend::{authenticate, update_last_login};
pub use email::normalize_email;
pub use error::{AuthError, Result, ValidationError};
pub use manager::{ExtraFields, UserManager};
pub use password::{Argon2Hasher, CredentialHasher, HasherParams, PasswordHashable};
pub use permissions::Permissioned;
