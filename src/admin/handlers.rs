use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::types::{
    AdminAuthResponse, AdminDetailResponse, AdminListResponse, AdminSavedResponse,
    CreateAdminRequest, StatsResponse, UpdateAdminRequest,
};
use crate::session::SessionClaims;
use crate::shared::{AppError, AppJson, AppState, MessageResponse};
use crate::user::types::{ChangePasswordRequest, LoginRequest};

/// POST /admin/login
#[instrument(name = "admin_login", skip(state, request))]
pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<AdminAuthResponse>, AppError> {
    let response = state.admin_service().login(request).await?;
    Ok(Json(response))
}

/// GET /admin/profile
#[instrument(name = "admin_profile", skip(state, claims), fields(admin_id = %claims.id))]
pub async fn admin_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<AdminDetailResponse>, AppError> {
    let admin = state.admin_service().get_admin(&claims.id).await?;
    Ok(Json(AdminDetailResponse { admin }))
}

/// POST /admin/change-password
#[instrument(name = "admin_change_password", skip(state, claims, request), fields(admin_id = %claims.id))]
pub async fn admin_change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    AppJson(request): AppJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .admin_service()
        .change_password(&claims.id, request)
        .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /admin/stats
#[instrument(name = "stats", skip(state))]
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.admin_service().stats().await?;
    Ok(Json(stats))
}

/// GET /admin/admins
#[instrument(name = "list_admins", skip(state))]
pub async fn list_admins(
    State(state): State<AppState>,
) -> Result<Json<AdminListResponse>, AppError> {
    let admins = state.admin_service().list_admins().await?;

    info!(admin_count = admins.len(), "Admins listed");
    Ok(Json(AdminListResponse { admins }))
}

/// POST /admin/admins
#[instrument(name = "create_admin", skip(state, claims, request), fields(caller = %claims.id))]
pub async fn create_admin(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    AppJson(request): AppJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminSavedResponse>), AppError> {
    let admin = state
        .admin_service()
        .create_admin(&claims.id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminSavedResponse {
            message: "Admin created successfully".to_string(),
            admin,
        }),
    ))
}

/// GET /admin/admins/:id
#[instrument(name = "get_admin", skip(state))]
pub async fn get_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
) -> Result<Json<AdminDetailResponse>, AppError> {
    let admin = state.admin_service().get_admin(&admin_id).await?;
    Ok(Json(AdminDetailResponse { admin }))
}

/// PUT /admin/admins/:id
#[instrument(name = "update_admin", skip(state, claims, request), fields(caller = %claims.id))]
pub async fn update_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
    Extension(claims): Extension<SessionClaims>,
    AppJson(request): AppJson<UpdateAdminRequest>,
) -> Result<Json<AdminSavedResponse>, AppError> {
    let admin = state
        .admin_service()
        .update_admin(&claims.id, &admin_id, request)
        .await?;

    Ok(Json(AdminSavedResponse {
        message: "Admin updated successfully".to_string(),
        admin,
    }))
}

/// DELETE /admin/admins/:id
#[instrument(name = "delete_admin", skip(state, claims))]
pub async fn delete_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .admin_service()
        .delete_admin(&claims.id, &admin_id)
        .await?;
    Ok(Json(MessageResponse::new("Admin deleted successfully")))
}
