use tracing::{info, instrument};

use crate::admin::{
    models::{AdminModel, AdminRole},
    repository::AdminRepository,
};
use crate::config::AdminSeed;
use crate::shared::{AppError, AppState};

/// Creates the seed super admin unless an admin with its email already exists.
/// Returns whether an account was created.
#[instrument(skip(state, seed), fields(email = %seed.email))]
pub async fn ensure_default_admin(state: &AppState, seed: &AdminSeed) -> Result<bool, AppError> {
    if state
        .admin_repository
        .get_admin_by_email(&seed.email)
        .await?
        .is_some()
    {
        info!("Default admin already present");
        return Ok(false);
    }

    let password_hash = state.hasher.hash(&seed.password)?;
    let admin = AdminModel::new(
        seed.name.clone(),
        seed.email.clone(),
        password_hash,
        AdminRole::SuperAdmin,
    );
    state.admin_repository.create_admin(&admin).await?;

    info!(admin_id = %admin.id, "Default admin account created");
    Ok(true)
}
