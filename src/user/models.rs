use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub id: String, // UUID v4 as string
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a new user model with generated ID and timestamp
    pub fn new(name: String, email: String, password_hash: String, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            phone,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_model() {
        let user = UserModel::new(
            "Jane".to_string(),
            "jane@example.com".to_string(),
            "hash".to_string(),
            None,
        );

        assert!(Uuid::parse_str(&user.id).is_ok());
        assert_eq!(user.email, "jane@example.com");
        assert!(user.created_at <= Utc::now());
    }
}
