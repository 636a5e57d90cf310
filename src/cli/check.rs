//! `check` command handler.

use super::output;
use crate::application::workflow::check::check;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_client;
use crate::infrastructure::config::Config;

pub async fn execute(config: &Config) -> Result<()> {
    let client = build_client(config)?;

    output::header("check");
    let pb = output::spinner("Contacting control plane...");
    let result = check(&client).await;
    output::spinner_done(&pb);
    let report = result?;

    output::section("Control plane");
    output::field("Endpoint", output::highlight(&config.api.endpoint));
    output::field("Root type", &report.typename);
    output::field("Elapsed", format!("{} ms", report.elapsed.as_millis()));
    output::success("Credential accepted");
    Ok(())
}
