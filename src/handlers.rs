pub mod admin;
pub mod health;
pub mod login;
pub mod users;

use auth::AuthError;
use axum::{http::StatusCode, response::Json};

use crate::schemas::ErrorResponse;

/// Error half of every handler result
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Translates an account error into the HTTP error the API reports.
pub fn auth_error_response(err: &AuthError) -> HandlerError {
    let (status, error_response) = match err {
        AuthError::Validation(validation) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(validation.to_string(), "VALIDATION_ERROR"),
        ),
        AuthError::InvalidFields(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse::new(message.clone(), "INVALID_FIELDS"),
        ),
        err if err.is_conflict() => (
            StatusCode::CONFLICT,
            ErrorResponse::new("A user with this email already exists", "EMAIL_ALREADY_EXISTS"),
        ),
        AuthError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Internal server error", "DATABASE_ERROR"),
        ),
        AuthError::Hashing(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Internal server error", "HASHING_ERROR"),
        ),
    };
    (status, Json(error_response))
}

pub fn not_found(user_id: i32) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("User {} not found", user_id), "USER_NOT_FOUND")),
    )
}
