use anyhow::Result;
use clap::{Parser, Subcommand};

use optiview::cli;

#[derive(Debug, Parser)]
#[command(name = "optiview")]
#[command(about = "Console for the Kruize optimization service")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the full reconciled dashboard: health, profiles, scan tables
    Status {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Include unoptimized resources in the scan
        #[arg(long)]
        all: bool,
    },
    /// List scanned namespaces
    Namespaces {
        /// Case-insensitive substring filter on the namespace name
        #[arg(long, default_value = "")]
        filter: String,
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
        /// Rows per page
        #[arg(long, default_value = "10")]
        page_size: usize,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Include unoptimized resources in the scan
        #[arg(long)]
        all: bool,
    },
    /// List scanned workloads with their containers
    Workloads {
        /// Case-insensitive substring filter on workload name or namespace
        #[arg(long, default_value = "")]
        filter: String,
        /// Substring filter against the `key=value` label pairs
        #[arg(long, default_value = "")]
        labels: String,
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
        /// Rows per page
        #[arg(long, default_value = "10")]
        page_size: usize,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Include unoptimized resources in the scan
        #[arg(long)]
        all: bool,
    },
    /// Show profiles and layers with pending updates
    Diff {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Install missing profiles/layers on the service
    Install {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Apply all pending profile/layer updates
    Update {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Periodically refresh and re-render the dashboard
    Watch {
        /// Seconds between refreshes
        #[arg(long, default_value = "30")]
        interval: u64,
        /// Include unoptimized resources in the scan
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Status { format, all } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_status(fmt, all)
        }
        Commands::Namespaces {
            filter,
            page,
            page_size,
            format,
            all,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_namespaces(&filter, page, page_size, fmt, all)
        }
        Commands::Workloads {
            filter,
            labels,
            page,
            page_size,
            format,
            all,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_workloads(&filter, &labels, page, page_size, fmt, all)
        }
        Commands::Diff { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_diff(fmt)
        }
        Commands::Install { yes } => cli::run_install(yes),
        Commands::Update { yes } => cli::run_update(yes),
        Commands::Watch { interval, all } => cli::run_watch(interval, all),
    }
}
