use anyhow::Result;
use auth::{Argon2Hasher, HasherParams};
use sea_orm::Database;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://userbase.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: i64 = 30;

/// Application settings.
///
/// Sources, later ones winning: built-in defaults, an optional
/// `userbase.toml` in the working directory, then `USERBASE__*` environment
/// variables (for example `USERBASE__HASHER__ITERATIONS=3`). A `.env` file
/// is loaded into the environment first.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub hasher: HasherParams,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .add_source(config::File::with_name("userbase").required(false))
            .add_source(
                config::Environment::with_prefix("USERBASE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Replaces the database URL and bind address with command-line values when given.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }
}

/// Initialize application state from settings
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;

    let hasher = Argon2Hasher::new(settings.hasher)?;

    Ok(AppState {
        db,
        hasher: Arc::new(hasher),
        request_timeout: Duration::from_secs(settings.request_timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Settings {
        Settings {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            request_timeout_secs: 30,
            hasher: HasherParams::default(),
        }
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let settings = defaults().with_overrides(Some("sqlite::memory:".to_string()), None);
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.bind_address, DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn test_partial_hasher_section_keeps_defaults() {
        let settings: Settings = config::Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)
            .unwrap()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)
            .unwrap()
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)
            .unwrap()
            .set_override("hasher.iterations", 4_i64)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.hasher.iterations, 4);
        assert_eq!(settings.hasher.memory_kib, HasherParams::default().memory_kib);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_initialize_app_state_in_memory() {
        let settings = defaults().with_overrides(Some("sqlite::memory:".to_string()), None);
        let state = initialize_app_state(&settings).await.unwrap();
        assert!(state.db.ping().await.is_ok());
        assert_eq!(state.request_timeout, Duration::from_secs(30));
    }
}
