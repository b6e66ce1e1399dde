// Library crate for the V-Wash laundry backend
// This file exposes the public API for the binary and integration tests

pub mod admin;
pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod order;
pub mod routes;
pub mod session;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use config::{AdminSeed, AppConfig, ConfigError};
pub use routes::build_router;
pub use session::{CredentialHasher, SessionClaims, TokenConfig, TokenKind};
pub use shared::{AppError, AppState};
