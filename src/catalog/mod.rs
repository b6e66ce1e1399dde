// Public API - what other modules can use
pub use handlers::{delete_service, get_service, list_services, update_service, upsert_service};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
