//! Sign-in commands.

use glamora_client::{AppState, Result};
use secrecy::SecretString;

use crate::output;

pub async fn login(state: &AppState, email: &str, password: &SecretString) -> Result<()> {
    let user = state.session().login(email, password).await?;
    output::line(&format!("Signed in as {}", user.name));
    Ok(())
}

pub async fn register(
    state: &AppState,
    name: &str,
    email: &str,
    password: &SecretString,
) -> Result<()> {
    let user = state.session().register(name, email, password).await?;
    output::line(&format!("Welcome to Glamora, {}", user.name));
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<()> {
    state.session().logout().await;
    output::line("Signed out");
    Ok(())
}

/// Resume the stored session and print the account.
pub async fn whoami(state: &AppState) -> Result<()> {
    match state.session().restore().await? {
        Some(user) => output::user(&user),
        None => output::line("Not signed in"),
    }
    Ok(())
}
