use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::{is_unique_violation, AppError};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// Fails with `BadRequest` when the email is already taken
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    /// Newest first
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError>;
    async fn update_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), AppError>;
    async fn count_users(&self) -> Result<u64, AppError>;
}

fn email_taken() -> AppError {
    AppError::BadRequest("Email already registered".to_string())
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current number of users in the repository
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, email = %user.email, "Creating user in memory");

        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            warn!(email = %user.email, "Email already registered in memory");
            return Err(email_taken());
        }
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::DatabaseError("User already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());

        debug!(user_id = %user.id, "User created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        debug!(user_id = %user_id, "Fetching user from memory");

        let users = self.users.lock().unwrap();
        Ok(users.get(user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!(email = %email, "Fetching user by email from memory");

        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let users = self.users.lock().unwrap();
        let mut list: Vec<UserModel> = users.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(user_count = list.len(), "Users listed from memory");
        Ok(list)
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, "Updating user in memory");

        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User not found for update in memory");
            return Err(user_not_found());
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            warn!(email = %user.email, "Email already registered to another user");
            return Err(email_taken());
        }
        users.insert(user.id.clone(), user.clone());

        debug!(user_id = %user.id, "User updated successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        debug!(user_id = %user_id, "Deleting user from memory");

        let mut users = self.users.lock().unwrap();
        if users.remove(user_id).is_none() {
            warn!(user_id = %user_id, "User not found for deletion in memory");
            return Err(user_not_found());
        }

        debug!(user_id = %user_id, "User deleted successfully from memory");
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        Ok(self.users.lock().unwrap().len() as u64)
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, email = %user.email, "Creating user in database");

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, phone, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return email_taken();
            }
            warn!(error = %e, "Failed to create user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(user_id = %user.id, "User created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        debug!(user_id = %user_id, "Fetching user from database");

        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, name, email, password_hash, phone, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!(email = %email, "Fetching user by email from database");

        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, name, email, password_hash, phone, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let users = sqlx::query_as::<_, UserModel>(
            "SELECT id, name, email, password_hash, phone, created_at FROM users ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(user_count = users.len(), "Users listed from database");
        Ok(users)
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, "Updating user in database");

        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, phone = $5 WHERE id = $1",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return email_taken();
            }
            warn!(error = %e, user_id = %user.id, "Failed to update user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(user_id = %user.id, "User not found for update");
            return Err(user_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        debug!(user_id = %user_id, "Deleting user from database");

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(user_id = %user_id, "User not found for deletion");
            return Err(user_not_found());
        }

        Ok(())
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
