use auth::{authenticate, Permissioned};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use model::entities::user;
use tracing::{debug, error, warn};

use crate::handlers::auth_error_response;
use crate::schemas::{AppState, ErrorResponse};

const ADMIN_REALM: &str = "Basic realm=\"admin\"";

/// The staff member a console request was authenticated as.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub user::Model);

/// Extracts `email:password` from an HTTP Basic `Authorization` header.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("Staff credentials required", "UNAUTHORIZED")),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(ADMIN_REALM));
    response
}

/// Admits only active staff members to the administrative console.
pub async fn require_staff(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some((email, password)) = basic_credentials(request.headers()) else {
        debug!("Console request without basic credentials");
        return unauthorized();
    };

    match authenticate(&state.db, state.hasher.as_ref(), &email, &password).await {
        Ok(Some(user)) if user.can_access_admin() => {
            debug!("Console access granted to user ID: {}", user.id);
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(Some(user)) => {
            warn!("User ID {} is not staff, console access denied", user.id);
            (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::new("Staff access required", "FORBIDDEN")),
            )
                .into_response()
        }
        Ok(None) => {
            warn!("Console login failed for {}", email);
            unauthorized()
        }
        Err(err) => {
            error!("Failed to authenticate console request: {}", err);
            auth_error_response(&err).into_response()
        }
    }
}
