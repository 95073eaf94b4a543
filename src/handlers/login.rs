use crate::handlers::{auth_error_response, HandlerError};
use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use auth::{authenticate, update_last_login};
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Login credentials
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Verify credentials and record the login
///
/// No session or token is issued; a successful response only confirms the
/// credentials and stamps `last_login`.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = ApiResponse<UserResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    debug!("Verifying credentials");

    let user = match authenticate(&state.db, state.hasher.as_ref(), &request.email, &request.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Rejected login attempt for {}", request.email);
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Invalid email or password", "INVALID_CREDENTIALS")),
            ));
        }
        Err(err) => {
            error!("Failed to authenticate {}: {}", request.email, err);
            return Err(auth_error_response(&err));
        }
    };

    match update_last_login(&state.db, user).await {
        Ok(user) => {
            info!("User with ID {} logged in", user.id);
            Ok(Json(ApiResponse::ok(UserResponse::from(user), "Login successful")))
        }
        Err(err) => {
            error!("Failed to record login: {}", err);
            Err(auth_error_response(&err))
        }
    }
}
