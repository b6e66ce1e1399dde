use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for services table, keyed by business id
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ServiceModel {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
}
