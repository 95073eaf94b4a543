use crate::router::create_router;
use crate::schemas::AppState;
use auth::{Argon2Hasher, ExtraFields, HasherParams, UserManager};
use axum::http::HeaderValue;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use migration::{Migrator, MigratorTrait};
use model::entities::user;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "adminpass123";
pub const USER_EMAIL: &str = "user@example.com";
pub const USER_PASSWORD: &str = "userpass123";
pub const USER_NAME: &str = "Test User";

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create AppState for testing, seeded with a superuser and a regular user
pub async fn setup_test_app_state() -> AppState {
    let db = setup_test_db().await;

    // Cheap Argon2 parameters keep the suite fast
    let hasher = Argon2Hasher::new(HasherParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid test hasher params");

    let state = AppState {
        db,
        hasher: Arc::new(hasher),
        request_timeout: Duration::from_secs(30),
    };

    let manager = UserManager::new(&state.db, state.hasher.as_ref());
    manager
        .create_superuser(ADMIN_EMAIL, Some(ADMIN_PASSWORD), ExtraFields::default())
        .await
        .expect("Failed to create test superuser");
    manager
        .create_user(
            USER_EMAIL,
            Some(USER_PASSWORD),
            ExtraFields::default().with_name(USER_NAME),
        )
        .await
        .expect("Failed to create test user");

    state
}

/// Looks up one of the seeded accounts
pub async fn seeded_user(state: &AppState, email: &str) -> user::Model {
    UserManager::new(&state.db, state.hasher.as_ref())
        .get_by_email(email)
        .await
        .expect("lookup failed")
        .expect("seeded user missing")
}

/// `Authorization` header value for HTTP Basic credentials
pub fn basic_auth(email: &str, password: &str) -> HeaderValue {
    let encoded = STANDARD.encode(format!("{}:{}", email, password));
    HeaderValue::from_str(&format!("Basic {}", encoded)).expect("valid header value")
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is determined by the RUST_LOG environment variable,
/// defaulting to WARN if not set.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create axum app for testing from an existing state
pub fn setup_test_app_with_state(state: AppState) -> Router {
    let _guard = init_test_tracing();
    create_router(state)
}

/// Create axum app for testing
pub async fn setup_test_app() -> Router {
    setup_test_app_with_state(setup_test_app_state().await)
}
