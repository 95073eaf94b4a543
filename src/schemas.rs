use auth::CredentialHasher;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::{OpenApi, ToSchema};

use crate::handlers::admin::{
    AdminUserDetail, AdminUserRow, CredentialsFieldset, ImportantDatesFieldset,
    PermissionsFieldset, PersonalInfoFieldset, SetPasswordRequest, UpdateAdminUserRequest,
};
use crate::handlers::login::LoginRequest;
use crate::handlers::users::{CreateUserRequest, UserResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Password hasher used for every credential write and check
    pub hasher: Arc<dyn CredentialHasher>,
    /// Upper bound on a single request
    pub request_timeout: Duration,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: &str) -> Self {
        Self {
            data,
            message: message.to_string(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::login::login,
        crate::handlers::admin::list_users,
        crate::handlers::admin::get_user,
        crate::handlers::admin::update_user,
        crate::handlers::admin::set_password,
        crate::handlers::admin::delete_user,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            CreateUserRequest,
            UserResponse,
            LoginRequest,
            AdminUserRow,
            AdminUserDetail,
            CredentialsFieldset,
            PersonalInfoFieldset,
            PermissionsFieldset,
            ImportantDatesFieldset,
            UpdateAdminUserRequest,
            SetPasswordRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Account registration"),
        (name = "auth", description = "Credential verification"),
        (name = "admin", description = "Administrative console, staff only"),
    ),
    info(
        title = "Userbase API",
        description = "Email-identified user accounts with an administrative console",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
