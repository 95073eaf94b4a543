//! Administrative console over user accounts.
//!
//! Every route here sits behind [`crate::middleware::require_staff`].

use crate::handlers::{auth_error_response, not_found, HandlerError};
use crate::middleware::CurrentUser;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use auth::{normalize_email, password, AuthError, PasswordHashable, ValidationError};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QueryTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Filters for the user list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminUserListQuery {
    /// Only staff (true) or only non-staff (false)
    pub is_staff: Option<bool>,
    /// Only superusers (true) or only non-superusers (false)
    pub is_superuser: Option<bool>,
    /// Only active (true) or only disabled (false) accounts
    pub is_active: Option<bool>,
}

/// One row of the user list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUserRow {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<user::Model> for AdminUserRow {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CredentialsFieldset {
    pub email: String,
    pub has_usable_password: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonalInfoFieldset {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PermissionsFieldset {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Read-only
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportantDatesFieldset {
    pub last_login: Option<DateTime<Utc>>,
}

/// User detail page, grouped the way the edit form is laid out
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUserDetail {
    pub id: i32,
    pub credentials: CredentialsFieldset,
    pub personal_info: PersonalInfoFieldset,
    pub permissions: PermissionsFieldset,
    pub important_dates: ImportantDatesFieldset,
}

impl From<user::Model> for AdminUserDetail {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            credentials: CredentialsFieldset {
                has_usable_password: model.has_usable_password(),
                email: model.email,
            },
            personal_info: PersonalInfoFieldset { name: model.name },
            permissions: PermissionsFieldset {
                is_active: model.is_active,
                is_staff: model.is_staff,
                is_superuser: model.is_superuser,
            },
            important_dates: ImportantDatesFieldset {
                last_login: model.last_login,
            },
        }
    }
}

/// Editable user fields; `last_login` is not among them
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAdminUserRequest {
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// New password; null leaves the account with an unusable password
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SetPasswordRequest {
    #[serde(default)]
    pub password: Option<String>,
}

async fn find_user(state: &AppState, user_id: i32) -> Result<user::Model, HandlerError> {
    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => Ok(user_model),
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err(not_found(user_id))
        }
        Err(db_error) => {
            error!("Failed to retrieve user with ID {}: {}", user_id, db_error);
            Err(auth_error_response(&AuthError::from(db_error)))
        }
    }
}

/// List users
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    params(AdminUserListQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<AdminUserRow>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 403, description = "Not a staff member", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_users(
    Query(query): Query<AdminUserListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AdminUserRow>>>, HandlerError> {
    trace!("Entering list_users function");

    let users = user::Entity::find()
        .apply_if(query.is_staff, |q, v| q.filter(user::Column::IsStaff.eq(v)))
        .apply_if(query.is_superuser, |q, v| q.filter(user::Column::IsSuperuser.eq(v)))
        .apply_if(query.is_active, |q, v| q.filter(user::Column::IsActive.eq(v)))
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await;

    match users {
        Ok(users) => {
            debug!("Retrieved {} users from database", users.len());
            let rows: Vec<AdminUserRow> = users.into_iter().map(AdminUserRow::from).collect();
            Ok(Json(ApiResponse::ok(rows, "Users retrieved successfully")))
        }
        Err(db_error) => {
            error!("Failed to retrieve users from database: {}", db_error);
            Err(auth_error_response(&AuthError::from(db_error)))
        }
    }
}

/// Get a user's detail page
#[utoipa::path(
    get,
    path = "/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<AdminUserDetail>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AdminUserDetail>>, HandlerError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    let user_model = find_user(&state, user_id).await?;
    Ok(Json(ApiResponse::ok(AdminUserDetail::from(user_model), "User retrieved successfully")))
}

/// Update a user's editable fields
#[utoipa::path(
    put,
    path = "/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateAdminUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<AdminUserDetail>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, admin, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Valid(Json(request)): Valid<Json<UpdateAdminUserRequest>>,
) -> Result<Json<ApiResponse<AdminUserDetail>>, HandlerError> {
    trace!("Entering update_user function for user_id: {}", user_id);

    let existing_user = find_user(&state, user_id).await?;
    let mut user_active: user::ActiveModel = existing_user.into();
    let mut updated_fields = Vec::new();

    if let Some(email) = request.email {
        if email.is_empty() {
            warn!("Rejected update of user ID {} to an empty email", user_id);
            return Err(auth_error_response(&AuthError::from(ValidationError::EmailRequired)));
        }
        let email = normalize_email(&email);
        updated_fields.push(format!("email: {}", email));
        user_active.email = Set(email);
    }

    if let Some(name) = request.name {
        updated_fields.push(format!("name: {}", name));
        user_active.name = Set(name);
    }

    if let Some(is_active) = request.is_active {
        updated_fields.push(format!("is_active: {}", is_active));
        user_active.is_active = Set(is_active);
    }

    if let Some(is_staff) = request.is_staff {
        updated_fields.push(format!("is_staff: {}", is_staff));
        user_active.is_staff = Set(is_staff);
    }

    if let Some(is_superuser) = request.is_superuser {
        updated_fields.push(format!("is_superuser: {}", is_superuser));
        user_active.is_superuser = Set(is_superuser);
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for user ID: {}", user_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    match user_active.update(&state.db).await {
        Ok(updated_user) => {
            let summary = if updated_fields.is_empty() {
                "none".to_string()
            } else {
                updated_fields.join(", ")
            };
            info!(
                "User with ID {} updated by user ID {}. Updated fields: {}",
                user_id, admin.id, summary
            );
            Ok(Json(ApiResponse::ok(AdminUserDetail::from(updated_user), "User updated successfully")))
        }
        Err(db_error) => {
            error!("Failed to update user with ID {}: {}", user_id, db_error);
            Err(auth_error_response(&AuthError::from(db_error)))
        }
    }
}

/// Set or clear a user's password
#[utoipa::path(
    post,
    path = "/admin/users/{user_id}/password",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = SetPasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully", body = ApiResponse<AdminUserDetail>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, admin, request))]
pub async fn set_password(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Json(request): Json<SetPasswordRequest>,
) -> Result<Json<ApiResponse<AdminUserDetail>>, HandlerError> {
    trace!("Entering set_password function for user_id: {}", user_id);

    let existing_user = find_user(&state, user_id).await?;
    let mut user_active: user::ActiveModel = existing_user.into();
    password::set_password(&mut user_active, state.hasher.as_ref(), request.password.as_deref())
        .map_err(|err| {
            error!("Failed to hash new password for user ID {}: {}", user_id, err);
            auth_error_response(&err)
        })?;

    match user_active.update(&state.db).await {
        Ok(updated_user) => {
            info!("Password for user ID {} changed by user ID {}", user_id, admin.id);
            Ok(Json(ApiResponse::ok(AdminUserDetail::from(updated_user), "Password changed successfully")))
        }
        Err(db_error) => {
            error!("Failed to store new password for user ID {}: {}", user_id, db_error);
            Err(auth_error_response(&AuthError::from(db_error)))
        }
    }
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, admin))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    match user::Entity::delete_by_id(user_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!("Delete operation completed. Rows affected: {}", delete_result.rows_affected);
            if delete_result.rows_affected > 0 {
                info!("User with ID {} deleted by user ID {}", user_id, admin.id);
                Ok(Json(ApiResponse::ok(format!("User {} deleted", user_id), "User deleted successfully")))
            } else {
                warn!("User with ID {} not found for deletion (no rows affected)", user_id);
                Err(not_found(user_id))
            }
        }
        Err(db_error) => {
            error!("Failed to delete user with ID {}: {}", user_id, db_error);
            Err(auth_error_response(&AuthError::from(db_error)))
        }
    }
}
