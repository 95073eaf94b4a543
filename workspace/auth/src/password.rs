use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use model::entities::user;
use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};
use sea_orm::Set;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::{AuthError, Result};

/// Prefix marking a stored password that can never be verified.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Length of the random suffix appended to the unusable sentinel.
const UNUSABLE_PASSWORD_SUFFIX_LENGTH: usize = 40;

/// One-way salted password hashing.
pub trait CredentialHasher: Send + Sync + fmt::Debug {
    /// Hashes `raw` with a fresh salt and returns the encoded string.
    fn hash(&self, raw: &str) -> Result<String>;

    /// Checks `raw` against an encoded hash. Malformed hashes never match.
    fn verify(&self, raw: &str, encoded: &str) -> bool;
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HasherParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HasherParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id hasher producing PHC strings.
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new(params: HasherParams) -> Result<Self> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Hasher").finish_non_exhaustive()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, raw: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, raw: &str, encoded: &str) -> bool {
        match PasswordHash::new(encoded) {
            Ok(parsed) => self.argon2.verify_password(raw.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                debug!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }
}

/// Returns false for the unusable sentinel and for empty values.
pub fn is_password_usable(encoded: &str) -> bool {
    !encoded.is_empty() && !encoded.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

/// Encodes `raw` with `hasher`, or produces the unusable sentinel when absent.
pub fn make_password(hasher: &dyn CredentialHasher, raw: Option<&str>) -> Result<String> {
    match raw {
        Some(raw) => hasher.hash(raw),
        None => {
            trace!("No password supplied, generating unusable password");
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(UNUSABLE_PASSWORD_SUFFIX_LENGTH)
                .map(char::from)
                .collect();
            Ok(format!("{UNUSABLE_PASSWORD_PREFIX}{suffix}"))
        }
    }
}

/// Stores a freshly encoded password (or the sentinel) on a user being written.
pub fn set_password(
    user: &mut user::ActiveModel,
    hasher: &dyn CredentialHasher,
    raw: Option<&str>,
) -> Result<()> {
    user.password = Set(make_password(hasher, raw)?);
    Ok(())
}

/// Capability of an entity that owns an encoded password.
pub trait PasswordHashable {
    fn password_hash(&self) -> &str;

    fn has_usable_password(&self) -> bool {
        is_password_usable(self.password_hash())
    }

    fn check_password(&self, hasher: &dyn CredentialHasher, raw: &str) -> bool {
        self.has_usable_password() && hasher.verify(raw, self.password_hash())
    }
}

impl PasswordHashable for user::Model {
    fn password_hash(&self) -> &str {
        &self.password
    }
}
