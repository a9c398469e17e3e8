//! Startup data seeding.

use crate::config::AppConfig;
use crate::state::AppState;

/// Create the configured first superuser unless an account with that email
/// already exists. Failures are logged; the server still starts.
pub async fn seed_first_superuser(state: &AppState, config: &AppConfig) {
    let Some(first) = config.first_superuser.as_ref() else {
        tracing::debug!("FIRST_SUPERUSER not configured; skipping seed");
        return;
    };

    match state
        .services
        .users
        .ensure_superuser(&first.email, &first.password)
        .await
    {
        Ok(user) => tracing::info!(user_id = %user.id, email = %user.email, "First superuser ready"),
        Err(e) => tracing::error!(error = %e, "Failed to seed first superuser"),
    }
}
