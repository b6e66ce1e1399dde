// Public API - what other modules can use
pub use handlers::{
    create_order, delete_order, get_order, list_all_orders, list_user_orders, update_order_status,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
