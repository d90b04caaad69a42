use std::sync::Arc;

use clap::Parser;

use doltcli::utils::logger;
use doltcli::utils::validation::Validate;
use doltcli::{CliCommand, CliConfig, Dolt, ToolConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let tool = match load_tool_config(&cli) {
        Ok(tool) => tool,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    };

    match tool.log_directive() {
        Some(directive) => logger::init_logger_with(&directive),
        None => logger::init_logger(cli.verbose),
    }

    if let Err(e) = run(cli, tool).await {
        tracing::error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn load_tool_config(cli: &CliConfig) -> anyhow::Result<ToolConfig> {
    let tool = match &cli.config {
        Some(path) => ToolConfig::from_file(path)?,
        None => ToolConfig::default(),
    };
    tool.validate()?;
    Ok(tool)
}

async fn run(cli: CliConfig, tool: ToolConfig) -> anyhow::Result<()> {
    let executor = Arc::new(tool.executor());

    if matches!(cli.command, CliCommand::Version) {
        println!("{}", Dolt::version_with(executor).await?);
        return Ok(());
    }

    let dolt = Dolt::with_executor(&cli.repo, executor)?;

    match cli.command {
        CliCommand::Status => print_json(&dolt.status().await?)?,
        CliCommand::Log { number, commit } => {
            print_json(&dolt.log(number, commit.as_deref()).await?)?
        }
        CliCommand::Ls { system, all } => print_json(&dolt.ls(system, all).await?)?,
        CliCommand::Branch => {
            let (active, branches) = dolt.branch_list().await?;
            print_json(&serde_json::json!({ "active": active, "branches": branches }))?;
        }
        CliCommand::Sql { query, format } => match format.as_str() {
            "csv" => print_json(&dolt.sql_rows(&query).await?)?,
            "json" => print_json(&dolt.sql_json(&query).await?)?,
            other => anyhow::bail!("unsupported result format: {other} (expected csv or json)"),
        },
        CliCommand::Version => unreachable!(),
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
