// Command-line interface definitions for arbflow

use crate::config::CliConfig;
use crate::core::constants::endpoints;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arbflow", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    // Connection
    /// Analytics API base URL (default: http://localhost:8000)
    #[arg(long, value_name = "URL", global = true, help_heading = "Connection")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        global = true,
        help_heading = "Connection"
    )]
    pub timeout: Option<u64>,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", global = true, help_heading = "Configuration")]
    pub config: Option<String>,

    /// Directory holding the stored session and logo
    #[arg(long, value_name = "DIR", global = true, help_heading = "Configuration")]
    pub data_dir: Option<String>,

    // Output & Verbosity
    /// Suppress progress output and logs
    #[arg(short = 'q', long, global = true, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true, help_heading = "Output & Verbosity")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a session token issued by the ArbFlow login flow
    Login {
        /// Token to store; prompted for when omitted
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Remove the stored session
    Logout,
    /// Load and show the workspace dashboard
    Dashboard {
        /// Scope the dashboard to one property
        #[arg(long, value_name = "ID")]
        property: Option<String>,
        /// Treat the load as a manual refresh
        #[arg(long)]
        sync: bool,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export workspace data as a CSV file or a PDF report
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
        /// Output directory
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
        /// Export data for one property
        #[arg(long, value_name = "ID")]
        property: Option<String>,
    },
    /// Manage the logo embedded in reports
    Logo {
        #[command(subcommand)]
        action: LogoCommand,
    },
    /// Connect an analytics data source to the workspace
    Connect {
        /// Analytics property to connect
        #[arg(long, value_name = "ID")]
        property_id: String,
        /// Service account key (JSON)
        #[arg(long, value_name = "FILE")]
        key_file: PathBuf,
        /// Data source provider
        #[arg(long, value_name = "PROVIDER", default_value = endpoints::DEFAULT_PROVIDER)]
        provider: String,
    },
    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogoCommand {
    /// Store an image file (PNG or JPEG) as the report logo
    Set {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Remove the stored logo
    Clear,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated channel data
    Csv,
    /// Paginated, branded PDF report
    Report,
}

/// Convert the global CLI options into a CliConfig
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        api_base_url: cli.api_url.clone(),
        timeout: cli.timeout,
        data_dir: cli.data_dir.clone(),
        verbose: cli.verbose,
    }
}
