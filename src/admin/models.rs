use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use tracing::warn;
use uuid::Uuid;

use crate::shared::AppError;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdminRole {
    #[default]
    Admin,
    SuperAdmin,
}

/// Domain model for an admin account
#[derive(Debug, Clone, PartialEq)]
pub struct AdminModel {
    pub id: String, // UUID v4 as string
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminModel {
    pub fn new(name: String, email: String, password_hash: String, role: AdminRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            role,
            status: None,
            created_at: Utc::now(),
        }
    }
}

/// Row shape of the admins table; `role` is stored as text
#[derive(Debug, FromRow)]
pub struct AdminRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AdminRow> for AdminModel {
    type Error = AppError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let role = AdminRole::from_str(&row.role).map_err(|_| {
            warn!(admin_id = %row.id, role = %row.role, "Unknown admin role in database");
            AppError::DatabaseError(format!("unknown admin role: {}", row.role))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            status: row.status,
            created_at: row.created_at,
        })
    }
}
