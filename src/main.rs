//! lawdesk - Legal case lookup over a SQL warehouse.

use anyhow::{Context, Result};
use lawdesk::cli::{Cli, Command, OutputFormat};
use lawdesk::config::{Config, WarehouseConfig};
use lawdesk::error::LawdeskError;
use lawdesk::lookup::CaseLookup;
use lawdesk::output::format_outcome_text;
use lawdesk::query::{build_statement, ensure_read_only};
use lawdesk::tools::{get_tool_definitions, CaseLookupTool, ToolCall, CASE_LOOKUP_TOOL};
use lawdesk::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    match cli.log_path() {
        Some(path) => logging::init_file_logging(&path),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<LawdeskError>() {
            Some(inner) => error!("{}: {:#}", inner.category(), e),
            None => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let settings = resolve_settings(&cli, Config::load_from_file(&config_path)?);

    match &cli.command {
        Command::Tools => {
            let definitions = serde_json::to_string_pretty(&get_tool_definitions())
                .context("Failed to serialize tool definitions")?;
            println!("{definitions}");
        }
        Command::Sql { filters } => {
            let sql = build_statement(&filters.to_filters());
            ensure_read_only(&sql)?;
            println!("{sql}");
        }
        Command::Query { filters, output } => {
            let format: OutputFormat = output.parse().map_err(anyhow::Error::msg)?;
            let lookup = connect(&cli, &settings)?;
            let outcome = lookup.lookup(&filters.to_filters()).await?;

            match format {
                OutputFormat::Text => println!("{}", format_outcome_text(&outcome)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&outcome).context("Failed to serialize rows")?
                ),
            }
        }
        Command::Call { arguments } => {
            let lookup = connect(&cli, &settings)?;
            let call = ToolCall {
                id: "cli".to_string(),
                name: CASE_LOOKUP_TOOL.to_string(),
                arguments: arguments.clone(),
            };
            let result = CaseLookupTool::new(&lookup).dispatch(&call).await?;
            println!("{}", result.content);
        }
    }

    Ok(())
}

/// Applies command-line overrides on top of the config file.
fn resolve_settings(cli: &Cli, mut settings: Config) -> Config {
    if let Some(interval) = cli.poll_interval {
        settings.polling.interval_secs = interval;
    }
    if let Some(max_polls) = cli.max_polls {
        settings.polling.max_attempts = max_polls;
    }
    settings
}

/// Builds the lookup service from the environment and the resolved settings.
fn connect(cli: &Cli, settings: &Config) -> Result<CaseLookup> {
    let mut config = WarehouseConfig::from_env()?;
    if let Some(warehouse_id) = &cli.warehouse_id {
        config = config.with_warehouse_id(warehouse_id.clone())?;
    }
    info!("Target: {}", config.display_string());
    Ok(CaseLookup::connect(config, settings)?)
}
