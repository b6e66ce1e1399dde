use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::ServiceModel,
    repository::ServiceRepository,
    types::{UpdateServiceRequest, UpsertServiceRequest},
};
use crate::shared::AppError;

/// Business logic for the laundry service catalog
pub struct CatalogService {
    repository: Arc<dyn ServiceRepository + Send + Sync>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ServiceRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<Vec<ServiceModel>, AppError> {
        self.repository.list_services().await
    }

    #[instrument(skip(self))]
    pub async fn get_service(&self, id: &str) -> Result<ServiceModel, AppError> {
        self.repository
            .get_service(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }

    #[instrument(skip(self, request), fields(service_id = %request.id))]
    pub async fn upsert_service(
        &self,
        request: UpsertServiceRequest,
    ) -> Result<ServiceModel, AppError> {
        let id = request.id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("Service id is required".to_string()));
        }
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Service name is required".to_string()));
        }
        check_price(request.price)?;

        let service = ServiceModel {
            id: id.to_string(),
            name: name.to_string(),
            description: request.description,
            price: request.price,
            image: request.image,
        };
        let saved = self.repository.upsert_service(&service).await?;

        info!(service_id = %saved.id, "Service saved");
        Ok(saved)
    }

    /// Applies only the fields present in the request
    #[instrument(skip(self, request))]
    pub async fn update_service(
        &self,
        id: &str,
        request: UpdateServiceRequest,
    ) -> Result<ServiceModel, AppError> {
        let mut service = self.get_service(id).await?;

        if let Some(name) = request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::BadRequest("Service name is required".to_string()));
            }
            service.name = name.to_string();
        }
        if request.description.is_some() {
            service.description = request.description;
        }
        if request.price.is_some() {
            check_price(request.price)?;
            service.price = request.price;
        }
        if request.image.is_some() {
            service.image = request.image;
        }

        self.repository.update_service(&service).await?;

        info!(service_id = %id, "Service updated");
        Ok(service)
    }

    #[instrument(skip(self))]
    pub async fn delete_service(&self, id: &str) -> Result<(), AppError> {
        self.repository.delete_service(id).await?;
        info!(service_id = %id, "Service deleted");
        Ok(())
    }
}

fn check_price(price: Option<f64>) -> Result<(), AppError> {
    match price {
        Some(price) if !price.is_finite() || price < 0.0 => Err(AppError::BadRequest(
            "Price must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}
