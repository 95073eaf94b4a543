use anyhow::Result;
use auth::{ExtraFields, UserManager};
use model::entities::user;
use tracing::{error, info, instrument, warn};

use crate::config::{initialize_app_state, Settings};
use crate::schemas::AppState;

#[instrument(skip(settings, password, name))]
pub async fn create_superuser(
    settings: &Settings,
    email: &str,
    password: Option<&str>,
    name: Option<String>,
) -> Result<()> {
    let state = initialize_app_state(settings).await?;
    create_superuser_with_state(&state, email, password, name).await?;
    Ok(())
}

/// Creates the superuser on an already initialized state.
pub async fn create_superuser_with_state(
    state: &AppState,
    email: &str,
    password: Option<&str>,
    name: Option<String>,
) -> Result<user::Model> {
    if password.is_none() {
        warn!("No password given, the superuser will not be able to log in");
    }

    let extra_fields = ExtraFields {
        name,
        ..Default::default()
    };
    let manager = UserManager::new(&state.db, state.hasher.as_ref());

    match manager.create_superuser(email, password, extra_fields).await {
        Ok(user) => {
            info!("Superuser created with ID: {}, email: {}", user.id, user.email);
            Ok(user)
        }
        Err(e) if e.is_conflict() => {
            error!("A user with email {} already exists", email);
            Err(e.into())
        }
        Err(e) => {
            error!("Failed to create superuser: {}", e);
            Err(e.into())
        }
    }
}
