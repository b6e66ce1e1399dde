use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::AppConfig;
use crate::shared::AppState;
use crate::{admin, catalog, order, session, user};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Permissive when no origins are configured; origins that are not valid header values are skipped
pub fn build_cors(allowed_origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = allowed_origins else {
        return CorsLayer::very_permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Every API route, relative to `/api`
pub fn api_router(state: AppState) -> Router {
    // No token needed
    let public = Router::new()
        .route("/health", get(health))
        .route("/users/register", post(user::register))
        .route("/users/login", post(user::login))
        .route("/admin/login", post(admin::admin_login))
        .route("/services", get(catalog::list_services))
        .route("/services/:id", get(catalog::get_service));

    // Any valid token, user or admin
    let authenticated = Router::new()
        .route(
            "/users/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .route("/users/change-password", post(user::change_password))
        .route("/orders", post(order::create_order))
        .route("/orders/user", get(order::list_user_orders))
        .route("/orders/:order_id", get(order::get_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::jwt_auth,
        ));

    // Admin tokens only; jwt_auth is the outer layer so claims exist for require_admin
    let admin_only = Router::new()
        .route("/orders", get(order::list_all_orders))
        .route("/orders/:order_id", delete(order::delete_order))
        .route("/orders/:order_id/status", patch(order::update_order_status))
        .route("/admin/profile", get(admin::admin_profile))
        .route("/admin/change-password", post(admin::admin_change_password))
        .route("/admin/stats", get(admin::stats))
        .route("/admin/users", get(user::list_users))
        .route(
            "/admin/users/:id",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route(
            "/admin/admins",
            get(admin::list_admins).post(admin::create_admin),
        )
        .route(
            "/admin/admins/:id",
            get(admin::get_admin)
                .put(admin::update_admin)
                .delete(admin::delete_admin),
        )
        .route("/services", post(catalog::upsert_service))
        .route(
            "/services/:id",
            put(catalog::update_service).delete(catalog::delete_service),
        )
        .route_layer(middleware::from_fn(session::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::jwt_auth,
        ));

    public
        .merge(authenticated)
        .merge(admin_only)
        .with_state(state)
}

/// Build the full application router: `/api`, optional static files, CORS and request tracing
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new().nest("/api", api_router(state));

    if let Some(dir) = &config.static_dir {
        info!(dir = %dir.display(), "Serving static files");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(build_cors(config.cors_allowed_origins.as_deref()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
