//! Design generator.

use glamora_client::{AppState, Result};
use glamora_core::DesignType;

use crate::output;

pub async fn generate(
    state: &AppState,
    kind: DesignType,
    style: &str,
    description: Option<&str>,
) -> Result<()> {
    output::line(&format!("Generating {kind} ({style})..."));
    let design = state.designs().generate(kind, style, description).await?;
    output::design(&design);
    Ok(())
}

pub async fn list(state: &AppState, page: u32, limit: u32) -> Result<()> {
    let listing = state.designs().fetch_remote(page, limit).await?;
    if listing.designs.is_empty() {
        output::line("No saved designs");
    }
    for design in &listing.designs {
        output::design(design);
    }
    Ok(())
}
