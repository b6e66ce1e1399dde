use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use super::types::{
    CreateOrderRequest, OrderDetailResponse, OrderListResponse, OrderResponse, UpdateStatusRequest,
};
use crate::session::SessionClaims;
use crate::shared::{AppError, AppJson, AppState, MessageResponse};

/// HTTP handler for placing an order
///
/// POST /orders
#[instrument(name = "create_order", skip(state, claims, request), fields(user_id = %claims.id))]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    AppJson(request): AppJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = state.order_service().create_order(&claims.id, request).await?;

    info!(order_id = %order.order_id, "Order created successfully");

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order created successfully".to_string(),
            order,
        }),
    ))
}

/// GET /orders/user
/// Orders owned by the caller, newest first
#[instrument(name = "list_user_orders", skip(state, claims), fields(user_id = %claims.id))]
pub async fn list_user_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<OrderListResponse>, AppError> {
    let orders = state.order_service().list_user_orders(&claims.id).await?;

    info!(order_count = orders.len(), "User orders listed");
    Ok(Json(OrderListResponse { orders }))
}

/// GET /orders (admin)
#[instrument(name = "list_all_orders", skip(state))]
pub async fn list_all_orders(
    State(state): State<AppState>,
) -> Result<Json<OrderListResponse>, AppError> {
    let orders = state.order_service().list_all_orders().await?;

    info!(order_count = orders.len(), "All orders listed");
    Ok(Json(OrderListResponse { orders }))
}

/// GET /orders/:order_id
/// Visible to the owner and to admins
#[instrument(name = "get_order", skip(state, claims))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<OrderDetailResponse>, AppError> {
    let order = state.order_service().get_order(&claims, &order_id).await?;
    Ok(Json(OrderDetailResponse { order }))
}

/// PATCH /orders/:order_id/status (admin)
#[instrument(name = "update_order_status", skip(state, request))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    AppJson(request): AppJson<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .order_service()
        .update_status(&order_id, request)
        .await?;

    Ok(Json(OrderResponse {
        message: "Order updated successfully".to_string(),
        order,
    }))
}

/// DELETE /orders/:order_id (admin)
#[instrument(name = "delete_order", skip(state))]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.order_service().delete_order(&order_id).await?;
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}
