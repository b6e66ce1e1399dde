use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{AdminModel, AdminRole},
    repository::AdminRepository,
    types::{AdminAuthResponse, AdminProfile, CreateAdminRequest, StatsResponse, UpdateAdminRequest},
};
use crate::order::{models::PENDING_STATUSES, repository::OrderRepository};
use crate::session::{
    check_password_length, CredentialHasher, TokenConfig, TokenKind, INVALID_CREDENTIALS,
};
use crate::shared::{required, AppError};
use crate::user::{
    repository::UserRepository,
    types::{ChangePasswordRequest, LoginRequest},
};

/// Service for admin accounts and the dashboard
pub struct AdminService {
    repository: Arc<dyn AdminRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    orders: Arc<dyn OrderRepository + Send + Sync>,
    token_config: TokenConfig,
    hasher: CredentialHasher,
}

impl AdminService {
    pub fn new(
        repository: Arc<dyn AdminRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        orders: Arc<dyn OrderRepository + Send + Sync>,
        token_config: TokenConfig,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            repository,
            users,
            orders,
            token_config,
            hasher,
        }
    }

    /// Unknown email and wrong password fail identically
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<AdminAuthResponse, AppError> {
        let admin = match self
            .repository
            .get_admin_by_email(request.email.trim())
            .await?
        {
            Some(admin) => admin,
            None => {
                debug!("Admin login for unknown email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !self.hasher.verify(&request.password, &admin.password_hash) {
            debug!(admin_id = %admin.id, "Admin login with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .token_config
            .create_token(&admin.id, &admin.email, TokenKind::Admin)?;

        info!(admin_id = %admin.id, "Admin logged in");
        Ok(AdminAuthResponse {
            message: "Admin login successful".to_string(),
            token,
            admin: admin.into(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_admin(&self, admin_id: &str) -> Result<AdminProfile, AppError> {
        Ok(self.find(admin_id).await?.into())
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        admin_id: &str,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let mut admin = self.find(admin_id).await?;

        if !self
            .hasher
            .verify(&request.current_password, &admin.password_hash)
        {
            warn!(admin_id = %admin_id, "Admin password change with wrong current password");
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }
        check_password_length(&request.new_password)?;

        admin.password_hash = self.hasher.hash(&request.new_password)?;
        self.repository.update_admin(&admin).await?;

        info!(admin_id = %admin_id, "Admin password changed");
        Ok(())
    }

    /// Pending orders are those still `order_placed` or `pickup_scheduled`
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<StatsResponse, AppError> {
        let stats = StatsResponse {
            total_users: self.users.count_users().await?,
            total_orders: self.orders.count_orders().await?,
            pending_orders: self
                .orders
                .count_orders_with_status(&PENDING_STATUSES)
                .await?,
            total_revenue: self.orders.total_revenue().await?,
        };

        debug!(?stats, "Dashboard stats computed");
        Ok(stats)
    }

    #[instrument(skip(self))]
    pub async fn list_admins(&self) -> Result<Vec<AdminProfile>, AppError> {
        let admins = self.repository.list_admins().await?;
        Ok(admins.into_iter().map(AdminProfile::from).collect())
    }

    /// Only a super admin may add admins
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_admin(
        &self,
        caller_id: &str,
        request: CreateAdminRequest,
    ) -> Result<AdminProfile, AppError> {
        self.require_super_admin(caller_id).await?;

        let name = required(&request.name, "Name")?;
        let email = required(&request.email, "Email")?;
        check_password_length(&request.password)?;

        if self.repository.get_admin_by_email(email).await?.is_some() {
            warn!(email = %email, "Admin email already registered");
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let mut admin = AdminModel::new(
            name.to_string(),
            email.to_string(),
            password_hash,
            request.role.unwrap_or_default(),
        );
        admin.status = request.status;

        self.repository.create_admin(&admin).await?;

        info!(admin_id = %admin.id, role = %admin.role, "Admin created");
        Ok(admin.into())
    }

    /// Applies only the fields present in the request. Only a super admin may
    /// edit admins, and the last super admin keeps its role.
    #[instrument(skip(self, request))]
    pub async fn update_admin(
        &self,
        caller_id: &str,
        admin_id: &str,
        request: UpdateAdminRequest,
    ) -> Result<AdminProfile, AppError> {
        self.require_super_admin(caller_id).await?;
        let mut admin = self.find(admin_id).await?;

        if let Some(name) = request.name {
            admin.name = required(&name, "Name")?.to_string();
        }
        if let Some(email) = request.email {
            let email = required(&email, "Email")?;
            if email != admin.email {
                if let Some(existing) = self.repository.get_admin_by_email(email).await? {
                    if existing.id != admin.id {
                        return Err(AppError::BadRequest(
                            "Email already registered".to_string(),
                        ));
                    }
                }
                admin.email = email.to_string();
            }
        }
        if let Some(password) = request.password {
            check_password_length(&password)?;
            admin.password_hash = self.hasher.hash(&password)?;
        }
        if let Some(role) = request.role {
            if admin.role == AdminRole::SuperAdmin && role != AdminRole::SuperAdmin {
                self.ensure_other_super_admin(&admin.id).await?;
            }
            admin.role = role;
        }
        if request.status.is_some() {
            admin.status = request.status;
        }

        self.repository.update_admin(&admin).await?;

        info!(admin_id = %admin.id, "Admin updated");
        Ok(admin.into())
    }

    /// Only a super admin may delete admins; nobody deletes their own account
    /// or the last super admin
    #[instrument(skip(self))]
    pub async fn delete_admin(&self, caller_id: &str, admin_id: &str) -> Result<(), AppError> {
        self.require_super_admin(caller_id).await?;

        if caller_id == admin_id {
            warn!(admin_id = %admin_id, "Admin attempted to delete own account");
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        let admin = self.find(admin_id).await?;
        if admin.role == AdminRole::SuperAdmin {
            self.ensure_other_super_admin(&admin.id).await?;
        }

        self.repository.delete_admin(admin_id).await?;
        info!(admin_id = %admin_id, "Admin deleted");
        Ok(())
    }

    /// Looks the caller up in the store, so a deleted or demoted account loses access at once
    async fn require_super_admin(&self, caller_id: &str) -> Result<AdminModel, AppError> {
        match self.repository.get_admin(caller_id).await? {
            Some(admin) if admin.role == AdminRole::SuperAdmin => Ok(admin),
            _ => {
                warn!(caller_id = %caller_id, "Admin management without super admin role");
                Err(AppError::Forbidden(
                    "Super admin access required".to_string(),
                ))
            }
        }
    }

    async fn ensure_other_super_admin(&self, admin_id: &str) -> Result<(), AppError> {
        let others = self
            .repository
            .list_admins()
            .await?
            .iter()
            .filter(|admin| admin.role == AdminRole::SuperAdmin && admin.id != admin_id)
            .count();

        if others == 0 {
            warn!(admin_id = %admin_id, "Refusing to remove the last super admin");
            return Err(AppError::BadRequest(
                "At least one super admin must remain".to_string(),
            ));
        }
        Ok(())
    }

    async fn find(&self, admin_id: &str) -> Result<AdminModel, AppError> {
        self.repository
            .get_admin(admin_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))
    }
}
