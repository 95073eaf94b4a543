//! Shared fixtures for the auth tests.

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::password::{Argon2Hasher, HasherParams};

/// Routes test logs to stderr; later calls are no-ops.
pub fn init_test_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Connects to a fresh in-memory SQLite database with migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    init_test_tracing();
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// A cheap hasher so the suite does not spend its time in Argon2.
pub fn test_hasher() -> Argon2Hasher {
    Argon2Hasher::new(HasherParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid test hasher params")
}
