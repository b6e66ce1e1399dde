use axum::Router;
use std::sync::Arc;

use vwash::{
    admin::repository::InMemoryAdminRepository,
    bootstrap::ensure_default_admin,
    build_router,
    catalog::repository::InMemoryServiceRepository,
    order::repository::InMemoryOrderRepository,
    user::repository::InMemoryUserRepository,
    AdminSeed, AppConfig, AppState, CredentialHasher, TokenConfig,
};

pub const TEST_SECRET: &str = "integration-secret";
pub const ADMIN_EMAIL: &str = "admin@vwashlaundry.co.ke";
pub const ADMIN_PASSWORD: &str = "admin-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub orders: Arc<InMemoryOrderRepository>,
    pub services: Arc<InMemoryServiceRepository>,
    pub admins: Arc<InMemoryAdminRepository>,
}

pub struct TestAppBuilder {
    seed_admin: bool,
    token_expiration_days: i64,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            seed_admin: true,
            token_expiration_days: 7,
        }
    }

    /// Skip creating the bootstrap admin
    #[allow(dead_code)]
    pub fn without_admin(mut self) -> Self {
        self.seed_admin = false;
        self
    }

    /// Negative values issue tokens that are already expired
    #[allow(dead_code)]
    pub fn with_token_expiration_days(mut self, days: i64) -> Self {
        self.token_expiration_days = days;
        self
    }

    pub async fn build(self) -> TestApp {
        let users = Arc::new(InMemoryUserRepository::new());
        let orders = Arc::new(InMemoryOrderRepository::new());
        let services = Arc::new(InMemoryServiceRepository::new());
        let admins = Arc::new(InMemoryAdminRepository::new());

        let config = AppConfig {
            port: 0,
            database_url: None,
            jwt_secret: TEST_SECRET.to_string(),
            token_expiration_days: self.token_expiration_days,
            admin: AdminSeed {
                email: ADMIN_EMAIL.to_string(),
                name: "Admin".to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
            cors_allowed_origins: None,
            static_dir: None,
        };

        let state = AppState::new(
            users.clone(),
            orders.clone(),
            services.clone(),
            admins.clone(),
            TokenConfig::new(TEST_SECRET, self.token_expiration_days),
            CredentialHasher::with_params(8, 1).unwrap(),
        );

        if self.seed_admin {
            ensure_default_admin(&state, &config.admin).await.unwrap();
        }

        TestApp {
            router: build_router(state.clone(), &config),
            state,
            users,
            orders,
            services,
            admins,
        }
    }
}
