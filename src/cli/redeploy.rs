//! `redeploy` command handler.

use super::output;
use crate::application::workflow::redeploy::redeploy;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_client;
use crate::infrastructure::config::Config;

pub async fn execute(config: &Config) -> Result<()> {
    let client = build_client(config)?;

    output::header("redeploy");
    let pb = output::spinner("Triggering redeploy...");
    let result = redeploy(&client, &config.target).await;
    output::spinner_done(&pb);
    let report = result?;

    super::print_target(&report.target, &config.target);
    output::section("Redeploy");
    match &report.deployment {
        Some(id) => output::success(&format!("New deployment {}", output::highlight(id))),
        None => output::success("Redeploy triggered"),
    }
    output::note("The previous deployment is stopped by the platform");
    Ok(())
}
