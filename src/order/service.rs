use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::{generate_order_id, OrderModel, DEFAULT_STATUS, DEFAULT_STATUS_TEXT},
    repository::OrderRepository,
    types::{CreateOrderRequest, UpdateStatusRequest},
};
use crate::{session::SessionClaims, shared::AppError, user::repository::UserRepository};

/// Service for handling order business logic
pub struct OrderService {
    repository: Arc<dyn OrderRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl OrderService {
    pub fn new(
        repository: Arc<dyn OrderRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self { repository, users }
    }

    /// Places an order owned by the caller, copying their name and email onto it
    #[instrument(skip(self, request))]
    pub async fn create_order(
        &self,
        user_id: &str,
        request: CreateOrderRequest,
    ) -> Result<OrderModel, AppError> {
        let user = self.users.get_user(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "Order placed by unknown user");
            AppError::NotFound("User not found".to_string())
        })?;

        let order_id = match request.id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => generate_order_id(),
        };
        debug!(order_id = %order_id, "Resolved order ID");

        let order = OrderModel {
            id: Uuid::new_v4().to_string(),
            order_id,
            user_id: user.id,
            user_name: user.name,
            user_email: user.email,
            service_type: request.service_type,
            service_text: request.service_text,
            item_count: request.item_count,
            special_instructions: request.special_instructions,
            pickup_date: request.pickup_date,
            pickup_time: request.pickup_time,
            pickup_address: request.pickup_address,
            pickup_contact: request.pickup_contact,
            pickup_phone: request.pickup_phone,
            delivery_date: request.delivery_date,
            delivery_time: request.delivery_time,
            delivery_address: request.delivery_address,
            delivery_contact: request.delivery_contact,
            delivery_phone: request.delivery_phone,
            status: DEFAULT_STATUS.to_string(),
            status_text: DEFAULT_STATUS_TEXT.to_string(),
            price: request.price,
            created_at: chrono::Utc::now(),
        };

        self.repository.create_order(&order).await?;

        info!(order_id = %order.order_id, user_id = %order.user_id, "Order created");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn list_user_orders(&self, user_id: &str) -> Result<Vec<OrderModel>, AppError> {
        self.repository.list_orders_by_user(user_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_all_orders(&self) -> Result<Vec<OrderModel>, AppError> {
        self.repository.list_orders().await
    }

    /// Only the owning user or an admin may read an order
    #[instrument(skip(self, claims), fields(caller = %claims.id))]
    pub async fn get_order(
        &self,
        claims: &SessionClaims,
        order_id: &str,
    ) -> Result<OrderModel, AppError> {
        let order = self
            .repository
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        if !claims.is_admin() && order.user_id != claims.id {
            warn!(order_id = %order_id, "Caller does not own order");
            return Err(AppError::Forbidden(
                "You do not have access to this order".to_string(),
            ));
        }

        Ok(order)
    }

    #[instrument(skip(self, request))]
    pub async fn update_status(
        &self,
        order_id: &str,
        request: UpdateStatusRequest,
    ) -> Result<OrderModel, AppError> {
        let status = request.status.trim();
        if status.is_empty() {
            return Err(AppError::BadRequest("Status is required".to_string()));
        }
        let status_text = request
            .status_text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| humanize_status(status));

        let order = self
            .repository
            .update_status(order_id, status, &status_text)
            .await?;

        info!(order_id = %order_id, status = %status, "Order status updated");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: &str) -> Result<(), AppError> {
        self.repository.delete_order(order_id).await?;
        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }
}

/// "pickup_scheduled" -> "Pickup Scheduled"
fn humanize_status(status: &str) -> String {
    status
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
