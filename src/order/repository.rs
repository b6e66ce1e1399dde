use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::models::OrderModel;
use crate::shared::{is_foreign_key_violation, is_unique_violation, AppError};

/// Trait for order repository operations, keyed by business order id
#[async_trait]
pub trait OrderRepository {
    /// Fails with `BadRequest` when the order id is already taken
    async fn create_order(&self, order: &OrderModel) -> Result<(), AppError>;
    async fn get_order(&self, order_id: &str) -> Result<Option<OrderModel>, AppError>;
    /// Orders owned by `user_id`, newest first
    async fn list_orders_by_user(&self, user_id: &str) -> Result<Vec<OrderModel>, AppError>;
    /// Every order, newest first
    async fn list_orders(&self) -> Result<Vec<OrderModel>, AppError>;
    async fn update_status(
        &self,
        order_id: &str,
        status: &str,
        status_text: &str,
    ) -> Result<OrderModel, AppError>;
    async fn delete_order(&self, order_id: &str) -> Result<(), AppError>;
    /// Returns how many orders were removed
    async fn delete_orders_by_user(&self, user_id: &str) -> Result<u64, AppError>;
    async fn count_orders(&self) -> Result<u64, AppError>;
    async fn count_orders_with_status(&self, statuses: &[&str]) -> Result<u64, AppError>;
    /// Sum of all prices, missing prices count as zero
    async fn total_revenue(&self) -> Result<f64, AppError>;
}

fn order_id_taken() -> AppError {
    AppError::BadRequest("Order ID already exists".to_string())
}

fn order_not_found() -> AppError {
    AppError::NotFound("Order not found".to_string())
}

fn newest_first(mut orders: Vec<OrderModel>) -> Vec<OrderModel> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

/// In-memory implementation of OrderRepository for development and testing
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<String, OrderModel>>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrderRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current number of orders in the repository
    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    #[instrument(skip(self, order))]
    async fn create_order(&self, order: &OrderModel) -> Result<(), AppError> {
        debug!(order_id = %order.order_id, user_id = %order.user_id, "Creating order in memory");

        let mut orders = self.orders.lock().unwrap();
        if orders.contains_key(&order.order_id) {
            warn!(order_id = %order.order_id, "Order already exists in memory");
            return Err(order_id_taken());
        }
        orders.insert(order.order_id.clone(), order.clone());

        debug!(order_id = %order.order_id, "Order created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_order(&self, order_id: &str) -> Result<Option<OrderModel>, AppError> {
        debug!(order_id = %order_id, "Fetching order from memory");

        let orders = self.orders.lock().unwrap();
        Ok(orders.get(order_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_orders_by_user(&self, user_id: &str) -> Result<Vec<OrderModel>, AppError> {
        let orders = self.orders.lock().unwrap();
        let owned = orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();

        Ok(newest_first(owned))
    }

    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<OrderModel>, AppError> {
        let orders = self.orders.lock().unwrap();
        Ok(newest_first(orders.values().cloned().collect()))
    }

    #[instrument(skip(self))]
    async fn update_status(
        &self,
        order_id: &str,
        status: &str,
        status_text: &str,
    ) -> Result<OrderModel, AppError> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(order_id).ok_or_else(|| {
            warn!(order_id = %order_id, "Order not found for status update in memory");
            order_not_found()
        })?;

        order.status = status.to_string();
        order.status_text = status_text.to_string();

        debug!(order_id = %order_id, status = %status, "Order status updated in memory");
        Ok(order.clone())
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, order_id: &str) -> Result<(), AppError> {
        let mut orders = self.orders.lock().unwrap();
        if orders.remove(order_id).is_none() {
            warn!(order_id = %order_id, "Order not found for deletion in memory");
            return Err(order_not_found());
        }

        debug!(order_id = %order_id, "Order deleted successfully from memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_orders_by_user(&self, user_id: &str) -> Result<u64, AppError> {
        let mut orders = self.orders.lock().unwrap();
        let initial_count = orders.len();

        orders.retain(|_, order| order.user_id != user_id);

        let removed_count = (initial_count - orders.len()) as u64;
        info!(user_id = %user_id, removed_orders = removed_count, "Removed orders for user from memory");
        Ok(removed_count)
    }

    async fn count_orders(&self) -> Result<u64, AppError> {
        Ok(self.orders.lock().unwrap().len() as u64)
    }

    async fn count_orders_with_status(&self, statuses: &[&str]) -> Result<u64, AppError> {
        let orders = self.orders.lock().unwrap();
        let count = orders
            .values()
            .filter(|o| statuses.contains(&o.status.as_str()))
            .count();
        Ok(count as u64)
    }

    async fn total_revenue(&self) -> Result<f64, AppError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.values().filter_map(|o| o.price).sum())
    }
}

const ORDER_COLUMNS: &str = "id, order_id, user_id, user_name, user_email, service_type, \
     service_text, item_count, special_instructions, pickup_date, pickup_time, pickup_address, \
     pickup_contact, pickup_phone, delivery_date, delivery_time, delivery_address, \
     delivery_contact, delivery_phone, status, status_text, price, created_at";

/// PostgreSQL implementation of order repository
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[instrument(skip(self, order))]
    async fn create_order(&self, order: &OrderModel) -> Result<(), AppError> {
        debug!(order_id = %order.order_id, user_id = %order.user_id, "Creating order in database");

        let sql = format!(
            "INSERT INTO orders ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
             $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)",
            ORDER_COLUMNS
        );

        sqlx::query(&sql)
            .bind(&order.id)
            .bind(&order.order_id)
            .bind(&order.user_id)
            .bind(&order.user_name)
            .bind(&order.user_email)
            .bind(&order.service_type)
            .bind(&order.service_text)
            .bind(order.item_count)
            .bind(&order.special_instructions)
            .bind(&order.pickup_date)
            .bind(&order.pickup_time)
            .bind(&order.pickup_address)
            .bind(&order.pickup_contact)
            .bind(&order.pickup_phone)
            .bind(&order.delivery_date)
            .bind(&order.delivery_time)
            .bind(&order.delivery_address)
            .bind(&order.delivery_contact)
            .bind(&order.delivery_phone)
            .bind(&order.status)
            .bind(&order.status_text)
            .bind(order.price)
            .bind(order.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    return order_id_taken();
                }
                // The owner was deleted after the service looked it up
                if is_foreign_key_violation(&e) {
                    warn!(user_id = %order.user_id, "Order owner no longer exists");
                    return AppError::NotFound("User not found".to_string());
                }
                warn!(error = %e, "Failed to create order in database");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(order_id = %order.order_id, "Order created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_order(&self, order_id: &str) -> Result<Option<OrderModel>, AppError> {
        let sql = format!("SELECT {} FROM orders WHERE order_id = $1", ORDER_COLUMNS);
        let order = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    #[instrument(skip(self))]
    async fn list_orders_by_user(&self, user_id: &str) -> Result<Vec<OrderModel>, AppError> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id = %user_id, order_count = orders.len(), "Orders listed for user");
        Ok(orders)
    }

    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<OrderModel>, AppError> {
        let sql = format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLUMNS);
        let orders = sqlx::query_as::<_, OrderModel>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    #[instrument(skip(self))]
    async fn update_status(
        &self,
        order_id: &str,
        status: &str,
        status_text: &str,
    ) -> Result<OrderModel, AppError> {
        let sql = format!(
            "UPDATE orders SET status = $2, status_text = $3 WHERE order_id = $1 RETURNING {}",
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(order_id)
            .bind(status)
            .bind(status_text)
            .fetch_optional(&self.pool)
            .await?;

        order.ok_or_else(|| {
            warn!(order_id = %order_id, "Order not found for status update");
            order_not_found()
        })
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, order_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(order_id = %order_id, "Order not found for deletion");
            return Err(order_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_orders_by_user(&self, user_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let removed_count = result.rows_affected();
        info!(user_id = %user_id, removed_orders = removed_count, "Removed orders for user");
        Ok(removed_count)
    }

    async fn count_orders(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count_orders_with_status(&self, statuses: &[&str]) -> Result<u64, AppError> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ANY($1)")
            .bind(statuses)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn total_revenue(&self) -> Result<f64, AppError> {
        let total: f64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(price), 0)::FLOAT8 FROM orders")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::order::models::{generate_order_id, DEFAULT_STATUS, DEFAULT_STATUS_TEXT};
    use chrono::{Duration, Utc};

    /// Test helper functions for creating test data
    pub mod helpers {
        use super::*;

        pub fn create_test_order(user_id: &str, price: Option<f64>) -> OrderModel {
            OrderModel {
                id: uuid::Uuid::new_v4().to_string(),
                order_id: generate_order_id(),
                user_id: user_id.to_string(),
                user_name: "Jane".to_string(),
                user_email: "jane@example.com".to_string(),
                service_type: Some("wash_fold".to_string()),
                service_text: Some("Wash & Fold".to_string()),
                item_count: Some(3),
                special_instructions: None,
                pickup_date: Some("2026-10-20".to_string()),
                pickup_time: Some("09:00".to_string()),
                pickup_address: Some("12 Moi Avenue".to_string()),
                pickup_contact: None,
                pickup_phone: None,
                delivery_date: None,
                delivery_time: None,
                delivery_address: None,
                delivery_contact: None,
                delivery_phone: None,
                status: DEFAULT_STATUS.to_string(),
                status_text: DEFAULT_STATUS_TEXT.to_string(),
                price,
                created_at: Utc::now(),
            }
        }
    }

    use helpers::*;

    #[tokio::test]
    async fn test_create_and_get_order() {
        let repo = InMemoryOrderRepository::new();
        let order = create_test_order("user-1", Some(500.0));

        repo.create_order(&order).await.unwrap();

        let retrieved = repo.get_order(&order.order_id).await.unwrap().unwrap();
        assert_eq!(retrieved, order);
    }

    #[tokio::test]
    async fn test_create_duplicate_order_id() {
        let repo = InMemoryOrderRepository::new();
        let order = create_test_order("user-1", None);
        repo.create_order(&order).await.unwrap();

        let mut clash = create_test_order("user-2", None);
        clash.order_id = order.order_id.clone();

        let result = repo.create_order(&clash).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(repo.order_count(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_user_newest_first() {
        let repo = InMemoryOrderRepository::new();
        let mut old = create_test_order("user-1", None);
        old.created_at = Utc::now() - Duration::days(1);
        let new = create_test_order("user-1", None);
        let other = create_test_order("user-2", None);

        for order in [&old, &new, &other] {
            repo.create_order(order).await.unwrap();
        }

        let orders = repo.list_orders_by_user("user-1").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, new.order_id);
        assert_eq!(orders[1].order_id, old.order_id);

        let all = repo.list_orders().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_update_status() {
        let repo = InMemoryOrderRepository::new();
        let order = create_test_order("user-1", None);
        repo.create_order(&order).await.unwrap();

        let updated = repo
            .update_status(&order.order_id, "pickup_scheduled", "Pickup Scheduled")
            .await
            .unwrap();
        assert_eq!(updated.status, "pickup_scheduled");
        assert_eq!(updated.status_text, "Pickup Scheduled");

        let result = repo.update_status("ORD-MISSING", "delivered", "Delivered").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_order() {
        let repo = InMemoryOrderRepository::new();
        let order = create_test_order("user-1", None);
        repo.create_order(&order).await.unwrap();

        repo.delete_order(&order.order_id).await.unwrap();
        assert!(repo.get_order(&order.order_id).await.unwrap().is_none());

        let result = repo.delete_order(&order.order_id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_orders_by_user() {
        let repo = InMemoryOrderRepository::new();
        for _ in 0..3 {
            repo.create_order(&create_test_order("user-1", None))
                .await
                .unwrap();
        }
        repo.create_order(&create_test_order("user-2", None))
            .await
            .unwrap();

        let removed = repo.delete_orders_by_user("user-1").await.unwrap();
        assert_eq!(removed, 3);
        assert!(repo.list_orders_by_user("user-1").await.unwrap().is_empty());
        assert_eq!(repo.order_count(), 1);
    }

    #[tokio::test]
    async fn test_stats_queries() {
        let repo = InMemoryOrderRepository::new();
        repo.create_order(&create_test_order("user-1", Some(300.0)))
            .await
            .unwrap();
        repo.create_order(&create_test_order("user-1", None))
            .await
            .unwrap();
        let delivered = create_test_order("user-2", Some(200.5));
        repo.create_order(&delivered).await.unwrap();
        repo.update_status(&delivered.order_id, "delivered", "Delivered")
            .await
            .unwrap();

        assert_eq!(repo.count_orders().await.unwrap(), 3);
        assert_eq!(
            repo.count_orders_with_status(&["order_placed", "pickup_scheduled"])
                .await
                .unwrap(),
            2
        );
        assert_eq!(repo.total_revenue().await.unwrap(), 500.5);
    }

    #[test]
    fn test_orders_are_removed_with_their_owner() {
        let schema = include_str!("../../migrations/20261018000000_init.sql");
        assert!(schema.contains("user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE"));
    }
}
