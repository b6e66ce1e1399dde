use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{AdminModel, AdminRow};
use crate::shared::{is_unique_violation, AppError};

const ADMIN_COLUMNS: &str = "id, name, email, password_hash, role, status, created_at";

/// Trait for admin account storage
#[async_trait]
pub trait AdminRepository {
    /// Fails with `BadRequest` when the email is already taken
    async fn create_admin(&self, admin: &AdminModel) -> Result<(), AppError>;
    async fn get_admin(&self, admin_id: &str) -> Result<Option<AdminModel>, AppError>;
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminModel>, AppError>;
    /// Newest first
    async fn list_admins(&self) -> Result<Vec<AdminModel>, AppError>;
    async fn update_admin(&self, admin: &AdminModel) -> Result<(), AppError>;
    async fn delete_admin(&self, admin_id: &str) -> Result<(), AppError>;
}

fn email_taken() -> AppError {
    AppError::BadRequest("Email already registered".to_string())
}

fn admin_not_found() -> AppError {
    AppError::NotFound("Admin not found".to_string())
}

/// In-memory implementation of AdminRepository for development and testing
pub struct InMemoryAdminRepository {
    admins: Mutex<HashMap<String, AdminModel>>,
}

impl Default for InMemoryAdminRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAdminRepository {
    pub fn new() -> Self {
        Self {
            admins: Mutex::new(HashMap::new()),
        }
    }

    pub fn admin_count(&self) -> usize {
        self.admins.lock().unwrap().len()
    }
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    #[instrument(skip(self, admin))]
    async fn create_admin(&self, admin: &AdminModel) -> Result<(), AppError> {
        debug!(admin_id = %admin.id, email = %admin.email, "Creating admin in memory");

        let mut admins = self.admins.lock().unwrap();
        if admins.values().any(|a| a.email == admin.email) {
            warn!(email = %admin.email, "Admin email already exists in memory");
            return Err(email_taken());
        }
        admins.insert(admin.id.clone(), admin.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_admin(&self, admin_id: &str) -> Result<Option<AdminModel>, AppError> {
        let admins = self.admins.lock().unwrap();
        Ok(admins.get(admin_id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminModel>, AppError> {
        let admins = self.admins.lock().unwrap();
        Ok(admins.values().find(|a| a.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn list_admins(&self) -> Result<Vec<AdminModel>, AppError> {
        let admins = self.admins.lock().unwrap();
        let mut list: Vec<AdminModel> = admins.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    #[instrument(skip(self, admin))]
    async fn update_admin(&self, admin: &AdminModel) -> Result<(), AppError> {
        let mut admins = self.admins.lock().unwrap();
        if admins
            .values()
            .any(|a| a.email == admin.email && a.id != admin.id)
        {
            return Err(email_taken());
        }

        match admins.get_mut(&admin.id) {
            Some(existing) => {
                *existing = admin.clone();
                Ok(())
            }
            None => {
                warn!(admin_id = %admin.id, "Admin not found for update");
                Err(admin_not_found())
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_admin(&self, admin_id: &str) -> Result<(), AppError> {
        let mut admins = self.admins.lock().unwrap();
        if admins.remove(admin_id).is_none() {
            warn!(admin_id = %admin_id, "Admin not found for deletion");
            return Err(admin_not_found());
        }
        Ok(())
    }
}

/// PostgreSQL implementation of admin repository
pub struct PostgresAdminRepository {
    pool: PgPool,
}

impl PostgresAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
    #[instrument(skip(self, admin))]
    async fn create_admin(&self, admin: &AdminModel) -> Result<(), AppError> {
        debug!(admin_id = %admin.id, email = %admin.email, "Creating admin in database");

        let sql = format!(
            "INSERT INTO admins ({}) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            ADMIN_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&admin.id)
            .bind(&admin.name)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(admin.role.to_string())
            .bind(&admin.status)
            .bind(admin.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    return email_taken();
                }
                warn!(error = %e, "Failed to create admin in database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_admin(&self, admin_id: &str) -> Result<Option<AdminModel>, AppError> {
        let sql = format!("SELECT {} FROM admins WHERE id = $1", ADMIN_COLUMNS);
        let row = sqlx::query_as::<_, AdminRow>(&sql)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AdminModel::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminModel>, AppError> {
        let sql = format!("SELECT {} FROM admins WHERE email = $1", ADMIN_COLUMNS);
        let row = sqlx::query_as::<_, AdminRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AdminModel::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_admins(&self) -> Result<Vec<AdminModel>, AppError> {
        let sql = format!("SELECT {} FROM admins ORDER BY created_at DESC", ADMIN_COLUMNS);
        let rows = sqlx::query_as::<_, AdminRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AdminModel::try_from).collect()
    }

    #[instrument(skip(self, admin))]
    async fn update_admin(&self, admin: &AdminModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE admins SET name = $2, email = $3, password_hash = $4, role = $5, status = $6 WHERE id = $1",
        )
        .bind(&admin.id)
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.role.to_string())
        .bind(&admin.status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return email_taken();
            }
            warn!(error = %e, admin_id = %admin.id, "Failed to update admin in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(admin_id = %admin.id, "Admin not found for update");
            return Err(admin_not_found());
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_admin(&self, admin_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(admin_id = %admin_id, "Admin not found for deletion");
            return Err(admin_not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::admin::models::AdminRole;

    pub mod helpers {
        use super::*;

        pub fn create_test_admin(email: &str, role: AdminRole) -> AdminModel {
            AdminModel::new(
                "Admin".to_string(),
                email.to_string(),
                "hash".to_string(),
                role,
            )
        }
    }

    use helpers::*;

    #[tokio::test]
    async fn test_create_and_lookup_admin() {
        let repo = InMemoryAdminRepository::new();
        let admin = create_test_admin("admin@example.com", AdminRole::SuperAdmin);
        repo.create_admin(&admin).await.unwrap();

        let by_id = repo.get_admin(&admin.id).await.unwrap().unwrap();
        let by_email = repo
            .get_admin_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_id, admin);
        assert_eq!(by_email.role, AdminRole::SuperAdmin);
    }

    #[tokio::test]
    async fn test_duplicate_admin_email() {
        let repo = InMemoryAdminRepository::new();
        repo.create_admin(&create_test_admin("admin@example.com", AdminRole::Admin))
            .await
            .unwrap();

        let result = repo
            .create_admin(&create_test_admin("admin@example.com", AdminRole::Admin))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(repo.admin_count(), 1);
    }

    #[tokio::test]
    async fn test_update_to_taken_email() {
        let repo = InMemoryAdminRepository::new();
        repo.create_admin(&create_test_admin("first@example.com", AdminRole::Admin))
            .await
            .unwrap();
        let mut second = create_test_admin("second@example.com", AdminRole::Admin);
        repo.create_admin(&second).await.unwrap();

        second.email = "first@example.com".to_string();
        let result = repo.update_admin(&second).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_admin() {
        let repo = InMemoryAdminRepository::new();
        let admin = create_test_admin("admin@example.com", AdminRole::Admin);
        repo.create_admin(&admin).await.unwrap();

        repo.delete_admin(&admin.id).await.unwrap();
        assert_eq!(repo.admin_count(), 0);
        assert!(matches!(
            repo.delete_admin(&admin.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
