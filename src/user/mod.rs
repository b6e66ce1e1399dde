// Public API - what other modules can use
pub use handlers::{
    change_password, delete_user, get_profile, get_user, list_users, login, register,
    update_profile, update_user,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
