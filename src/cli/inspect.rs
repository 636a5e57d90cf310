//! `inspect` command handler.

use tabled::{Table, Tabled};

use super::command::InspectArgs;
use super::output;
use crate::application::workflow::inspect::{inspect, InspectReport, LogsOutcome, Verdict};
use crate::domain::{is_sensitive, mask, CheckState, LogLevel, Service, ServiceStatus};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_client;
use crate::infrastructure::config::Config;

/// Longest log line shown before truncation.
const LOG_LINE_CHARS: usize = 100;

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "")]
    icon: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Service> for ServiceRow {
    fn from(service: &Service) -> Self {
        Self {
            icon: status_icon(&service.status),
            name: service.name.clone(),
            kind: service.kind.to_string(),
            status: service.status.to_string(),
        }
    }
}

pub async fn execute(config: &Config, args: &InspectArgs) -> Result<()> {
    let client = build_client(config)?;
    let fetch_logs = args.fetch_logs(config.inspect.fetch_logs);

    output::header("inspect");
    let pb = output::spinner("Inspecting service...");
    let result = inspect(&client, &config.target, &config.inspect, fetch_logs).await;
    output::spinner_done(&pb);

    render(&result?, config);
    Ok(())
}

fn render(report: &InspectReport, config: &Config) {
    let target = &report.target;
    super::print_target(target, &config.target);

    output::section("Services");
    let rows: Vec<ServiceRow> = target.services.iter().map(ServiceRow::from).collect();
    output::lines(&Table::new(rows).to_string());

    let detail = &report.detail;
    output::section("Deployment");
    output::field("Status", format!("{} {}", status_icon(&detail.status), detail.status));
    output::field("Deployments", detail.deployments.len());
    match detail.deployments.first() {
        Some(latest) => {
            output::field("Latest", output::highlight(latest.id.short()));
            output::field("Latest status", &latest.status);
            if let Some(created) = latest.created_at {
                output::field("Created", created.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(updated) = latest.updated_at {
                output::field("Updated", updated.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        None => output::note("No deployments yet"),
    }

    output::section(&format!("Variables ({})", detail.variables.len()));
    let limit = config.inspect.variable_display_limit;
    let url_var = config.target.database_url_var.as_str();
    for var in detail.variables.iter().take(limit) {
        output::item(format!(
            "{} = {}",
            var.name,
            display_value(&var.name, &var.value, url_var)
        ));
    }
    if detail.variables.len() > limit {
        output::note(&format!("+{} more", detail.variables.len() - limit));
    }

    output::section("Required variables");
    for item in &report.checklist {
        match item.state {
            CheckState::Present => output::success(&item.name),
            CheckState::Placeholder => {
                output::warning(&format!("{} is empty or a placeholder", item.name));
            }
            CheckState::Missing => output::failure(&format!("{} is missing", item.name)),
        }
    }

    render_logs(&report.logs);

    output::section("Verdict");
    match &report.verdict {
        Verdict::Running => output::success("Service is running"),
        Verdict::Building => {
            output::warning("Service is building; check again in a few minutes");
        }
        Verdict::Failed { unsatisfied } => {
            output::failure("Service failed");
            if unsatisfied.is_empty() {
                output::note("All required variables are set; check the build logs in the console");
            } else {
                output::note("Set these variables, then redeploy:");
                for name in unsatisfied {
                    output::item(name);
                }
            }
        }
        Verdict::Other(status) => {
            output::warning(&format!("Service status is {status}; check the console"));
        }
    }
}

fn render_logs(logs: &LogsOutcome) {
    match logs {
        LogsOutcome::Skipped => {}
        LogsOutcome::NoDeployments => {
            output::section("Logs");
            output::note("No deployments yet");
        }
        LogsOutcome::Unavailable(reason) => {
            output::section("Logs");
            output::warning(&format!("Logs unavailable: {reason}"));
        }
        LogsOutcome::Entries {
            deployment,
            total,
            tail,
        } => {
            output::section(&format!(
                "Logs ({} of {total}, deployment {})",
                tail.len(),
                deployment.short()
            ));
            if tail.is_empty() {
                output::note("No log entries");
            }
            for entry in tail {
                println!(
                    "  {} [{}] {}",
                    log_icon(entry.severity()),
                    output::muted(&entry.timestamp),
                    truncate(&entry.content, LOG_LINE_CHARS)
                );
            }
        }
    }
}

/// The value as shown in reports: credentials and the database URL are masked.
pub(crate) fn display_value(name: &str, value: &str, url_var: &str) -> String {
    if is_sensitive(name, &[url_var]) {
        mask(value)
    } else {
        value.to_string()
    }
}

fn status_icon(status: &ServiceStatus) -> &'static str {
    match status {
        ServiceStatus::Running => "🟢",
        ServiceStatus::Building => "🟡",
        _ => "🔴",
    }
}

fn log_icon(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "❌",
        LogLevel::Warn => "⚠️",
        LogLevel::Info => "ℹ️",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}…")
}
