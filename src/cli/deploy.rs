//! `deploy` command handler.

use super::command::DeployArgs;
use super::inspect::display_value;
use super::output;
use crate::application::workflow::deploy::{apply, plan, DatabaseSource, DeployPlan};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_client;
use crate::infrastructure::config::Config;

pub async fn execute(config: &Config, args: &DeployArgs) -> Result<()> {
    let client = build_client(config)?;

    output::header(if args.dry_run { "deploy (dry run)" } else { "deploy" });
    let pb = output::spinner("Resolving target...");
    let result = plan(&client, config, |name| std::env::var(name).ok()).await;
    output::spinner_done(&pb);
    let plan = result?;

    print_plan(&plan, config);

    if args.dry_run {
        println!();
        output::note("Dry run: nothing was changed");
        return Ok(());
    }

    let pb = output::spinner("Applying variables and redeploying...");
    let result = apply(&client, &plan).await;
    output::spinner_done(&pb);
    let outcome = result?;

    output::section("Applied");
    if let Some(dir) = &plan.root_directory {
        output::success(&format!("Root directory set to {dir}"));
    }
    output::success(&format!("{} variables applied", outcome.variables_applied));
    match &outcome.deployment {
        Some(id) => output::success(&format!("Redeploy triggered: {}", output::highlight(id))),
        None => output::success("Redeploy triggered"),
    }

    output::section("Next");
    if plan.database.is_placeholder() {
        output::warning(&format!(
            "Replace the placeholder {} in the console, then redeploy",
            config.target.database_url_var
        ));
    }
    output::note("Building takes a few minutes; run `zeabur-ops inspect` to follow it");
    Ok(())
}

fn print_plan(plan: &DeployPlan, config: &Config) {
    super::print_target(&plan.target, &config.target);

    let url_var = config.target.database_url_var.as_str();
    output::section("Database");
    match &plan.database {
        DatabaseSource::Table => output::field(url_var, "from variable table"),
        DatabaseSource::Service { name } => {
            output::success(&format!("{url_var} copied from {name}"));
        }
        DatabaseSource::Placeholder { reason } => {
            output::warning(&format!("{url_var} set to placeholder ({reason})"));
        }
    }

    if let Some(dir) = &plan.root_directory {
        output::section("Build");
        output::field("Root directory", dir);
    }

    output::section(&format!("Variables ({})", plan.variables.len()));
    for var in plan.variables.iter() {
        output::item(format!(
            "{} = {}",
            var.name,
            display_value(&var.name, &var.value, url_var)
        ));
    }
}
