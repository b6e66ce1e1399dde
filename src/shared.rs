use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::admin::{repository::AdminRepository, service::AdminService};
use crate::catalog::{repository::ServiceRepository, service::CatalogService};
use crate::order::{repository::OrderRepository, service::OrderService};
use crate::session::{CredentialHasher, TokenConfig};
use crate::user::{repository::UserRepository, service::UserService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub order_repository: Arc<dyn OrderRepository + Send + Sync>,
    pub service_repository: Arc<dyn ServiceRepository + Send + Sync>,
    pub admin_repository: Arc<dyn AdminRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub hasher: CredentialHasher,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        order_repository: Arc<dyn OrderRepository + Send + Sync>,
        service_repository: Arc<dyn ServiceRepository + Send + Sync>,
        admin_repository: Arc<dyn AdminRepository + Send + Sync>,
        token_config: TokenConfig,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            user_repository,
            order_repository,
            service_repository,
            admin_repository,
            token_config,
            hasher,
        }
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(
            Arc::clone(&self.user_repository),
            Arc::clone(&self.order_repository),
            self.token_config.clone(),
            self.hasher.clone(),
        )
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(
            Arc::clone(&self.order_repository),
            Arc::clone(&self.user_repository),
        )
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(Arc::clone(&self.service_repository))
    }

    pub fn admin_service(&self) -> AdminService {
        AdminService::new(
            Arc::clone(&self.admin_repository),
            Arc::clone(&self.user_repository),
            Arc::clone(&self.order_repository),
            self.token_config.clone(),
            self.hasher.clone(),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::JwtError(msg) => {
                warn!(error = %msg, "Rejecting invalid token");
                (
                    StatusCode::FORBIDDEN,
                    "Invalid or expired token".to_string(),
                )
            }
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

/// True when the store rejected a write on a unique constraint
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    has_error_code(e, "23505")
}

/// True when the store rejected a write that points at a missing row
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    has_error_code(e, "23503")
}

fn has_error_code(e: &sqlx::Error, expected: &str) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == expected)
        .unwrap_or(false)
}

/// Trims a required text field, rejecting it when blank
pub fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(value)
}

/// `Json` whose rejections answer with the `{"error": ...}` body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// Body for endpoints that only report an outcome
#[derive(Debug, Serialize, serde::Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
