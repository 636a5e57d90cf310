//! `stop-all` command handler.

use super::output;
use crate::application::workflow::stop::{stop_all, StopReport, StopSummary};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_client;
use crate::infrastructure::config::Config;

pub async fn execute(config: &Config) -> Result<()> {
    let client = build_client(config)?;

    output::header("stop-all");
    let pb = output::spinner("Stopping running deployments...");
    let result = stop_all(&client, &config.target).await;
    output::spinner_done(&pb);
    let report = result?;

    super::print_target(&report.target, &config.target);
    render(&report);
    Ok(())
}

fn render(report: &StopReport) {
    output::section(&format!("Deployments ({})", report.total));
    for attempt in &report.attempts {
        let label = format!("{} [{}]", attempt.deployment.short(), attempt.status);
        match &attempt.error {
            None => output::success(&format!("{label} stopped")),
            Some(err) => output::failure(&format!("{label} {err}")),
        }
    }

    output::section("Summary");
    let counts = format!("{}/{} stopped", report.stopped(), report.attempted());
    match report.summary() {
        StopSummary::NothingToStop => output::note("No running deployments"),
        StopSummary::AllStopped => output::success(&counts),
        StopSummary::Partial => output::warning(&counts),
        StopSummary::NoneStopped => {
            output::failure(&format!("{counts}; none stopped"));
            output::note("Stop them manually in the console");
        }
    }
}
