use crate::handlers::{auth_error_response, HandlerError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use auth::{ExtraFields, UserManager};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::user;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    /// Email address, used as the login identifier (must be unique)
    #[validate(length(max = 255))]
    pub email: String,
    /// Password; omitted means the account cannot log in until one is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Display name
    #[validate(length(max = 255))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            last_login: model.last_login,
        }
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn create_user(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), HandlerError> {
    trace!("Entering create_user function");
    debug!("Registering user with email: {}", request.email);

    let manager = UserManager::new(&state.db, state.hasher.as_ref());
    let extra_fields = ExtraFields {
        name: request.name,
        ..Default::default()
    };

    match manager
        .create_user(&request.email, request.password.as_deref(), extra_fields)
        .await
    {
        Ok(user_model) => {
            info!(
                "User registered successfully with ID: {}, email: {}",
                user_model.id, user_model.email
            );
            let response = ApiResponse::ok(UserResponse::from(user_model), "User created successfully");
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => {
            error!("Failed to register user '{}': {}", request.email, err);
            Err(auth_error_response(&err))
        }
    }
}
