use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_STATUS: &str = "order_placed";
pub const DEFAULT_STATUS_TEXT: &str = "Order Placed";

/// Statuses counted as pending on the admin dashboard
pub const PENDING_STATUSES: [&str; 2] = ["order_placed", "pickup_scheduled"];

/// Database model for orders table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderModel {
    pub id: String,       // Store id, UUID v4 as string
    pub order_id: String, // Business id shown to customers
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
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
    pub status: String,
    pub status_text: String,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Random, collision-free business order id
pub fn generate_order_id() -> String {
    format!("ORD-{}", Uuid::new_v4().simple()).to_uppercase()
}

impl OrderModel {
    pub fn is_pending(&self) -> bool {
        PENDING_STATUSES.contains(&self.status.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_order_id_format() {
        let id = generate_order_id();
        assert!(id.starts_with("ORD-"));
        assert_eq!(id.len(), 4 + 32);
        assert_eq!(id, id.to_uppercase());
    }

    #[test]
    fn test_generated_order_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..1000).map(|_| generate_order_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
