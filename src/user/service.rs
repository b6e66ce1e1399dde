use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::UserModel,
    repository::UserRepository,
    types::{
        AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
        UserProfile,
    },
};
use crate::order::repository::OrderRepository;
use crate::session::{
    check_password_length, CredentialHasher, TokenConfig, TokenKind, INVALID_CREDENTIALS,
};
use crate::shared::{required, AppError};

/// Service for user accounts: registration, login, profile and the admin-side user management
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    orders: Arc<dyn OrderRepository + Send + Sync>,
    token_config: TokenConfig,
    hasher: CredentialHasher,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        orders: Arc<dyn OrderRepository + Send + Sync>,
        token_config: TokenConfig,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            repository,
            orders,
            token_config,
            hasher,
        }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let name = required(&request.name, "Name")?;
        let email = required(&request.email, "Email")?;
        if request.password.is_empty() {
            return Err(AppError::BadRequest("Password is required".to_string()));
        }
        check_password_length(&request.password)?;

        if self.repository.get_user_by_email(email).await?.is_some() {
            warn!(email = %email, "Registration with existing email");
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let phone = request.phone.filter(|phone| !phone.trim().is_empty());
        let user = UserModel::new(name.to_string(), email.to_string(), password_hash, phone);

        // The store enforces uniqueness too, so a concurrent duplicate still fails here
        self.repository.create_user(&user).await?;

        let token = self
            .token_config
            .create_token(&user.id, &user.email, TokenKind::User)?;

        info!(user_id = %user.id, "User registered");
        Ok(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: user.into(),
        })
    }

    /// Unknown email and wrong password fail identically
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let user = match self.repository.get_user_by_email(request.email.trim()).await? {
            Some(user) => user,
            None => {
                debug!("Login for unknown email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !self.hasher.verify(&request.password, &user.password_hash) {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .token_config
            .create_token(&user.id, &user.email, TokenKind::User)?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: user.into(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, AppError> {
        Ok(self.find(user_id).await?.into())
    }

    /// Applies only the fields present in the request
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        let mut user = self.find(user_id).await?;

        if let Some(name) = request.name {
            user.name = required(&name, "Name")?.to_string();
        }

        if let Some(email) = request.email {
            let email = required(&email, "Email")?;
            if email != user.email {
                if let Some(existing) = self.repository.get_user_by_email(email).await? {
                    if existing.id != user.id {
                        warn!(email = %email, "Profile update to taken email");
                        return Err(AppError::BadRequest(
                            "Email already registered".to_string(),
                        ));
                    }
                }
                user.email = email.to_string();
            }
        }

        if let Some(phone) = request.phone {
            let phone = phone.trim();
            user.phone = if phone.is_empty() {
                None
            } else {
                Some(phone.to_string())
            };
        }

        self.repository.update_user(&user).await?;

        info!(user_id = %user.id, "User profile updated");
        Ok(user.into())
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: &str,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let mut user = self.find(user_id).await?;

        if !self
            .hasher
            .verify(&request.current_password, &user.password_hash)
        {
            warn!(user_id = %user_id, "Password change with wrong current password");
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }
        check_password_length(&request.new_password)?;

        user.password_hash = self.hasher.hash(&request.new_password)?;
        self.repository.update_user(&user).await?;

        info!(user_id = %user_id, "User password changed");
        Ok(())
    }

    /// All users, newest first
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        let users = self.repository.list_users().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    /// Deletes the user and every order they own, returning the number of orders removed
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str) -> Result<u64, AppError> {
        // Fail before touching orders when the user does not exist
        self.find(user_id).await?;

        let deleted_orders = self.orders.delete_orders_by_user(user_id).await?;
        self.repository.delete_user(user_id).await?;

        info!(user_id = %user_id, deleted_orders, "User deleted with orders");
        Ok(deleted_orders)
    }

    async fn find(&self, user_id: &str) -> Result<UserModel, AppError> {
        self.repository
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
