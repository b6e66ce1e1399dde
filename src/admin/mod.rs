// Public API - what other modules can use
pub use handlers::{
    admin_change_password, admin_login, admin_profile, create_admin, delete_admin, get_admin,
    list_admins, stats, update_admin,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
