use crate::handlers::{
    admin,
    health::health_check,
    login::login,
    users::create_user,
};
use crate::middleware::require_staff;
use crate::schemas::{ApiDoc, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Administrative console, staff only
    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/:user_id",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/admin/users/:user_id/password", post(admin::set_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Registration and credential checks
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/auth/login", post(login))
        .merge(admin_routes)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(state.request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
