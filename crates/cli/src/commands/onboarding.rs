//! First-run gate.

use glamora_client::onboarding::{self, Route};
use glamora_client::{AppState, Result};

use crate::output;

pub async fn show(state: &AppState) -> Result<()> {
    let route = match state.initial_route().await {
        Route::Onboarding => "onboarding",
        Route::Login => "login",
    };
    output::line(route);
    Ok(())
}

pub async fn complete(state: &AppState) -> Result<()> {
    onboarding::complete_onboarding(state.local().as_ref()).await?;
    output::line("Onboarding complete");
    Ok(())
}
