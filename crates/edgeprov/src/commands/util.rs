//! Shared helpers for command handlers.

use std::path::PathBuf;

use edgeprov_api::{OrchClient, TlsMode};
use edgeprov_config::OrchSettings;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// A configured client plus the settings it was built from. Login is left
/// to the handlers so logout can be paired with it on every exit path.
pub struct Session {
    pub client: OrchClient,
    pub settings: OrchSettings,
}

/// Resolve config and build a client for orchestrator-bound commands.
pub fn connect(
    global: &GlobalOpts,
    output_dir_flag: Option<&PathBuf>,
) -> Result<Session, CliError> {
    let cfg = edgeprov_config::load_config_or_default();
    let profile_name = edgeprov_config::active_profile_name(global.profile.as_deref(), &cfg);

    let mut settings = edgeprov_config::resolve_settings(
        &cfg,
        &profile_name,
        global.orchestrator.as_deref(),
        global.timeout,
        output_dir_flag,
    )?;
    if global.verify_tls {
        settings.transport.tls = TlsMode::System;
    }

    let mut client = OrchClient::new(settings.url.clone(), &settings.transport)?;
    client.set_auth_mode(settings.auth_mode);

    Ok(Session { client, settings })
}

/// Log out, swallowing failures. The session is dead either way; the
/// orchestrator expires abandoned ones on its own.
pub async fn logout_best_effort(client: &OrchClient) {
    if let Err(e) = client.logout().await {
        tracing::warn!("logout failed: {e}");
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
