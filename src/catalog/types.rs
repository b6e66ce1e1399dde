use serde::{Deserialize, Serialize};

use super::models::ServiceModel;

/// Full service record for POST /services; replaces any entry with the same id
#[derive(Debug, Deserialize)]
pub struct UpsertServiceRequest {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
}

/// Partial update for PUT /services/:id
#[derive(Debug, Default, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceModel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceDetailResponse {
    pub service: ServiceModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceSavedResponse {
    pub message: String,
    pub service: ServiceModel,
}
