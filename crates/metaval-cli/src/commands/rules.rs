//! `metaval rules`: inspect rule files.

use tracing::instrument;

use metaval_adapters::TomlRuleLoader;

use crate::{
    cli::{RulesArgs, RulesCommands},
    commands::{rules_path, service_for},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(cmd: RulesCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        RulesCommands::List(args) => list(args, &config, &output),
        RulesCommands::Check(args) => check(args, &config, &output),
    }
}

#[instrument(skip_all)]
fn list(args: RulesArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let path = rules_path(args.rules, config);
    let classes = service_for(&path)?.classes()?;

    if output.is_json() {
        output.json(&classes)?;
        return Ok(());
    }

    if classes.is_empty() {
        output.warning(&format!("No rule files found under {}", path.display()))?;
        return Ok(());
    }

    output.header("Registered classes:")?;
    for class in &classes {
        output.print(&format!("  {} ({})", class.name, class.properties.join(", ")))?;
    }
    Ok(())
}

#[instrument(skip_all)]
fn check(args: RulesArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let path = rules_path(args.rules, config);
    output.info(&format!("Checking rules in {}", path.display()))?;

    let classes = TomlRuleLoader::new(&path).load_strict()?;

    output.success(&format!("{} class(es) OK", classes.len()))?;
    Ok(())
}
