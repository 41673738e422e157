//! Command-line argument parsing for lawdesk.
//!
//! Uses clap to parse the global options and the subcommand to run.

use crate::query::FilterSet;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Output format for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated rows.
    #[default]
    Text,
    /// The full outcome as JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Legal case lookup over a SQL warehouse.
#[derive(Parser, Debug)]
#[command(name = "lawdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Warehouse to run statements on (overrides DATABRICKS_WAREHOUSE_ID)
    #[arg(long, global = true, value_name = "ID")]
    pub warehouse_id: Option<String>,

    /// Seconds between status polls (overrides config)
    #[arg(long, global = true, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Maximum number of status polls (overrides config)
    #[arg(long, global = true, value_name = "N")]
    pub max_polls: Option<u32>,

    /// Write logs to a file instead of stderr (default location if no path given)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up cases matching the given filters
    Query {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output format: text or json
        #[arg(long, value_name = "FORMAT", default_value = "text")]
        output: String,
    },

    /// Print the statement that would be submitted, without running it
    Sql {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the agent tool definitions as JSON
    Tools,

    /// Run the case lookup tool with JSON arguments, as an agent would
    Call {
        /// Tool arguments, e.g. '{"status": "Julgado"}'
        #[arg(value_name = "ARGS_JSON", default_value = "{}")]
        arguments: String,
    },
}

/// Case filters shared by the query subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Exact case status (e.g. "Em andamento")
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Exact court ("vara")
    #[arg(long, value_name = "COURT")]
    pub court: Option<String>,

    /// Exact case type ("tipo_acao")
    #[arg(long, value_name = "TYPE")]
    pub case_type: Option<String>,

    /// Substring of a party name
    #[arg(long, value_name = "PARTY")]
    pub party: Option<String>,
}

impl FilterArgs {
    /// Converts the arguments into a filter set.
    pub fn to_filters(&self) -> FilterSet {
        FilterSet {
            status: self.status.clone(),
            court: self.court.clone(),
            case_type: self.case_type.clone(),
            party: self.party.clone(),
        }
    }
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the log file requested with --log-file, if any.
    ///
    /// A bare `--log-file` selects the default location.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|path| {
            if path.is_empty() {
                crate::logging::get_log_path()
            } else {
                PathBuf::from(path)
            }
        })
    }
}
