//! Revoke tokens command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_revoke(config: Config, email: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let email = email.trim().to_lowercase();

    let Some(worker) = state.store.get_worker_by_email(&email).await? else {
        println!("No worker registered with {email}");
        return Ok(());
    };

    let removed = state
        .credential_service
        .revoke_all_tokens(&worker.id)
        .await?;

    println!("Revoked {removed} token(s) of {} ({})", worker.name, worker.id);
    Ok(())
}
