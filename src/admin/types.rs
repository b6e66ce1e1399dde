use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{AdminModel, AdminRole};

#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `admin`
    pub role: Option<AdminRole>,
    pub status: Option<String>,
}

/// Partial admin update; a present `password` resets it
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAdminRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<AdminRole>,
    pub status: Option<String>,
}

/// Public view of an admin, never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AdminModel> for AdminProfile {
    fn from(admin: AdminModel) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            role: admin.role,
            status: admin.status,
            created_at: admin.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminAuthResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminDetailResponse {
    pub admin: AdminProfile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminSavedResponse {
    pub message: String,
    pub admin: AdminProfile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminListResponse {
    pub admins: Vec<AdminProfile>,
}

/// Dashboard counters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub total_revenue: f64,
}
