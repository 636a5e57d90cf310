//! Command-line interface.
//!
//! Each subcommand has its own handler module; they share the output
//! helpers and the resolved-target printer defined here.

pub mod check;
pub mod command;
pub mod config;
pub mod deploy;
pub mod inspect;
pub mod output;
pub mod redeploy;
pub mod stop;

pub use command::{Cli, ColorChoice, Commands, ConfigCommand, DEFAULT_CONFIG};

use std::path::Path;

use crate::application::workflow::Target;
use crate::error::Result;
use crate::infrastructure::config::target::TargetConfig;
use crate::infrastructure::config::Config;

/// Run a parsed command against a loaded configuration.
pub async fn run(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Inspect(args) => inspect::execute(config, args).await,
        Commands::Deploy(args) => deploy::execute(config, args).await,
        Commands::StopAll => stop::execute(config).await,
        Commands::Redeploy => redeploy::execute(config).await,
        Commands::Check => check::execute(config).await,
        Commands::Config(ConfigCommand::Validate) => self::config::validate(config, config_path),
    }
}

/// Print the resolved project and service, flagging any fallback.
pub(crate) fn print_target(target: &Target, selection: &TargetConfig) {
    output::section("Target");
    output::field(
        "Project",
        format!("{} {}", target.project.name, output::muted(&target.project.id)),
    );
    if target.project.is_fallback() {
        output::warning(&format!(
            "Project '{}' not found, using the first project",
            selection.project
        ));
        let names: Vec<&str> = target.projects.iter().map(|p| p.name.as_str()).collect();
        output::note(&format!("Available: {}", names.join(", ")));
    }
    output::field(
        "Service",
        format!("{} {}", target.service.name, output::muted(&target.service.id)),
    );
    if target.service.is_fallback() {
        output::warning("No application service matched, using the first service");
    }
}
