//! `config` command handlers.

use std::path::Path;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Report on a configuration that already loaded and validated.
pub fn validate(config: &Config, path: &Path) -> Result<()> {
    output::header("config validate");

    output::section("Configuration");
    if path.exists() {
        output::field("File", path.display());
    } else {
        output::field("File", format!("{} (not found, defaults)", path.display()));
    }
    output::field("Endpoint", &config.api.endpoint);
    output::field("Project", &config.target.project);
    output::field("Service", &config.target.service);
    output::field("Variables", config.deploy.variables.len());
    output::field(
        "Retry",
        format!(
            "{} attempts, {} ms base",
            config.api.retry_max_attempts, config.api.retry_base_delay_ms
        ),
    );

    output::section("Credential");
    match config.require_token() {
        Ok(_) => output::success("ZEABUR_API_KEY is set"),
        Err(_) => output::warning("ZEABUR_API_KEY is not set; API commands will fail"),
    }

    let secrets: Vec<&str> = config
        .deploy
        .variables
        .iter()
        .filter(|spec| spec.required && spec.value.is_none())
        .filter_map(|spec| spec.from_env.as_deref())
        .collect();
    if !secrets.is_empty() {
        output::section("Secrets");
        for name in secrets {
            if std::env::var(name).is_ok_and(|v| !v.trim().is_empty()) {
                output::success(name);
            } else {
                output::warning(&format!("{name} is not set; deploy will fail"));
            }
        }
    }

    println!();
    output::success("Configuration is valid");
    Ok(())
}
