use clap::Parser;
use tokio::signal;
use tracing::{debug, info};
use zeabur_ops::cli::{output, run, Cli};
use zeabur_ops::infrastructure::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(cli.color);

    let config_path = cli.config_path();
    let loaded = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(&config_path),
    };
    let mut config = match loaded {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json_logs {
        config.logging.format = "json".into();
    }
    config.init_logging();
    debug!(config = %config_path.display(), "zeabur-ops starting");

    tokio::select! {
        result = run(&cli.command, &config, &config_path) => {
            if let Err(e) = result {
                output::error(&e.to_string());
                if e.is_config() {
                    output::note("Set missing values in the environment, a .env file, or the config file");
                }
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Interrupted");
            output::error("Interrupted");
            std::process::exit(1);
        }
    }
}
