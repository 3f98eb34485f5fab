//! One-shot password reset applied while the server starts.

use myficdb_core::types::DbId;
use myficdb_db::repositories::{SessionRepo, UserRepo};
use myficdb_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::ResetPasswordOptions;

/// What the startup reset did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    Disabled,
    InvalidPassword,
    NoUser,
    Reset { user_id: DbId },
    Failed,
}

/// Replace the account password when `MYFICDB_RESET_PASSWORD=true`.
///
/// Never fails startup: every problem is logged and reported through
/// [`ResetOutcome`]. All sessions of the account are revoked on success.
pub async fn apply_startup_reset(pool: &DbPool, options: &ResetPasswordOptions) -> ResetOutcome {
    if !options.enabled {
        return ResetOutcome::Disabled;
    }

    tracing::info!("Password reset is enabled, beginning reset process");

    let Some(new_password) = options
        .new_password
        .as_deref()
        .filter(|p| validate_password_strength(p).is_ok())
    else {
        tracing::error!(
            "Password reset requested but MYFICDB_RESET_PASSWORD_VALUE is missing or invalid"
        );
        return ResetOutcome::InvalidPassword;
    };

    match reset_first_user(pool, new_password).await {
        Ok(Some(user_id)) => {
            tracing::warn!(
                user_id,
                "Password was reset. Set MYFICDB_RESET_PASSWORD=false before the next start"
            );
            ResetOutcome::Reset { user_id }
        }
        Ok(None) => {
            tracing::error!("Password reset requested but no user exists");
            ResetOutcome::NoUser
        }
        Err(e) => {
            tracing::error!(error = %e, "Password reset failed");
            ResetOutcome::Failed
        }
    }
}

async fn reset_first_user(pool: &DbPool, new_password: &str) -> Result<Option<DbId>, String> {
    let user = UserRepo::find_first(pool).await.map_err(|e| e.to_string())?;
    let Some(user) = user else {
        return Ok(None);
    };

    let hash = hash_password(new_password).map_err(|e| e.to_string())?;
    UserRepo::update_password(pool, user.id, &hash)
        .await
        .map_err(|e| e.to_string())?;
    SessionRepo::revoke_all_for_user(pool, user.id)
        .await
        .map_err(|e| e.to_string())?;

    Ok(Some(user.id))
}
