use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::types::{
    AuthResponse, ChangePasswordRequest, LoginRequest, ProfileResponse, ProfileUpdatedResponse,
    RegisterRequest, UpdateProfileRequest, UserDeletedResponse, UserListResponse,
};
use crate::session::SessionClaims;
use crate::shared::{AppError, AppJson, AppState, MessageResponse};

/// HTTP handler for user registration
///
/// POST /users/register
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = state.user_service().register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /users/login
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.user_service().login(request).await?;
    Ok(Json(response))
}

/// GET /users/profile
#[instrument(name = "get_profile", skip(state, claims), fields(user_id = %claims.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.user_service().get_profile(&claims.id).await?;
    Ok(Json(ProfileResponse { user }))
}

/// PUT /users/profile
#[instrument(name = "update_profile", skip(state, claims, request), fields(user_id = %claims.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    AppJson(request): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileUpdatedResponse>, AppError> {
    let user = state
        .user_service()
        .update_profile(&claims.id, request)
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}

/// POST /users/change-password
#[instrument(name = "change_password", skip(state, claims, request), fields(user_id = %claims.id))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    AppJson(request): AppJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .user_service()
        .change_password(&claims.id, request)
        .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /admin/users
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, AppError> {
    let users = state.user_service().list_users().await?;

    info!(user_count = users.len(), "Users listed");
    Ok(Json(UserListResponse { users }))
}

/// GET /admin/users/:id
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.user_service().get_profile(&user_id).await?;
    Ok(Json(ProfileResponse { user }))
}

/// PUT /admin/users/:id
#[instrument(name = "update_user", skip(state, request))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    AppJson(request): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileUpdatedResponse>, AppError> {
    let user = state
        .user_service()
        .update_profile(&user_id, request)
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// DELETE /admin/users/:id
/// Removes the user together with all of their orders
#[instrument(name = "delete_user", skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDeletedResponse>, AppError> {
    let deleted_orders = state.user_service().delete_user(&user_id).await?;

    Ok(Json(UserDeletedResponse {
        message: "User deleted successfully".to_string(),
        deleted_orders,
    }))
}
