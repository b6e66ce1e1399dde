use serde::{Deserialize, Serialize};

use super::models::OrderModel;

/// Request payload for placing an order.
/// Owner fields (`userId`, `userName`, `userEmail`) and status are never read from the body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Client-chosen business id; generated when absent
    pub id: Option<String>,
    pub service_type: Option<String>,
    pub service_text: Option<String>,
    pub item_count: Option<i32>,
    pub special_instructions: Option<String>,
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_contact: Option<String>,
    pub pickup_phone: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_contact: Option<String>,
    pub delivery_phone: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub status_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub message: String,
    pub order: OrderModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderDetailResponse {
    pub order: OrderModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderModel>,
}
