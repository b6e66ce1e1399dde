use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::ServiceModel;
use crate::shared::AppError;

/// Trait for the service catalog, keyed by business id
#[async_trait]
pub trait ServiceRepository {
    /// Every service ordered by id
    async fn list_services(&self) -> Result<Vec<ServiceModel>, AppError>;
    async fn get_service(&self, id: &str) -> Result<Option<ServiceModel>, AppError>;
    /// Inserts the service or replaces the one with the same id
    async fn upsert_service(&self, service: &ServiceModel) -> Result<ServiceModel, AppError>;
    /// Overwrites an existing entry; fails with `NotFound` when absent
    async fn update_service(&self, service: &ServiceModel) -> Result<(), AppError>;
    async fn delete_service(&self, id: &str) -> Result<(), AppError>;
}

fn service_not_found() -> AppError {
    AppError::NotFound("Service not found".to_string())
}

/// In-memory implementation of ServiceRepository for development and testing
pub struct InMemoryServiceRepository {
    services: Mutex<BTreeMap<String, ServiceModel>>,
}

impl Default for InMemoryServiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryServiceRepository {
    pub fn new() -> Self {
        Self {
            services: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn service_count(&self) -> usize {
        self.services.lock().unwrap().len()
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    #[instrument(skip(self))]
    async fn list_services(&self) -> Result<Vec<ServiceModel>, AppError> {
        let services = self.services.lock().unwrap();
        Ok(services.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn get_service(&self, id: &str) -> Result<Option<ServiceModel>, AppError> {
        let services = self.services.lock().unwrap();
        Ok(services.get(id).cloned())
    }

    #[instrument(skip(self, service), fields(service_id = %service.id))]
    async fn upsert_service(&self, service: &ServiceModel) -> Result<ServiceModel, AppError> {
        let mut services = self.services.lock().unwrap();
        let replaced = services
            .insert(service.id.clone(), service.clone())
            .is_some();

        debug!(replaced, "Service saved in memory");
        Ok(service.clone())
    }

    #[instrument(skip(self, service), fields(service_id = %service.id))]
    async fn update_service(&self, service: &ServiceModel) -> Result<(), AppError> {
        let mut services = self.services.lock().unwrap();
        match services.get_mut(&service.id) {
            Some(existing) => {
                *existing = service.clone();
                Ok(())
            }
            None => {
                warn!("Service not found for update");
                Err(service_not_found())
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_service(&self, id: &str) -> Result<(), AppError> {
        let mut services = self.services.lock().unwrap();
        if services.remove(id).is_none() {
            warn!(service_id = %id, "Service not found for deletion");
            return Err(service_not_found());
        }
        Ok(())
    }
}

/// PostgreSQL implementation of the service catalog
pub struct PostgresServiceRepository {
    pool: PgPool,
}

impl PostgresServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepository {
    #[instrument(skip(self))]
    async fn list_services(&self) -> Result<Vec<ServiceModel>, AppError> {
        let services = sqlx::query_as::<_, ServiceModel>(
            "SELECT id, name, description, price, image FROM services ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(service_count = services.len(), "Services listed");
        Ok(services)
    }

    #[instrument(skip(self))]
    async fn get_service(&self, id: &str) -> Result<Option<ServiceModel>, AppError> {
        let service = sqlx::query_as::<_, ServiceModel>(
            "SELECT id, name, description, price, image FROM services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    #[instrument(skip(self, service), fields(service_id = %service.id))]
    async fn upsert_service(&self, service: &ServiceModel) -> Result<ServiceModel, AppError> {
        let saved = sqlx::query_as::<_, ServiceModel>(
            r#"
            INSERT INTO services (id, name, description, price, image)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                image = EXCLUDED.image
            RETURNING id, name, description, price, image
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(&service.image)
        .fetch_one(&self.pool)
        .await?;

        debug!("Service saved in database");
        Ok(saved)
    }

    #[instrument(skip(self, service), fields(service_id = %service.id))]
    async fn update_service(&self, service: &ServiceModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE services SET name = $2, description = $3, price = $4, image = $5 WHERE id = $1",
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(&service.image)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!("Service not found for update");
            return Err(service_not_found());
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_service(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(service_id = %id, "Service not found for deletion");
            return Err(service_not_found());
        }
        Ok(())
    }
}
