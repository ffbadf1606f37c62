mod commands;

use clap::{Parser, Subcommand};
use novafleet_compute::FleetManager;
use novafleet_config::FleetConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "novafleet")]
#[command(about = "Move OpenStack compute hosts between availability zones", long_about = None)]
struct Cli {
    /// keystonerc file sourced when OS_* variables are not set
    #[arg(long, env = "NOVAFLEET_RC", global = true)]
    rc: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List hosts
    Hosts {
        /// Only hosts running this service role (e.g. compute)
        #[arg(short, long)]
        service: Option<String>,
    },
    /// List host aggregates and their availability zones
    Zones,
    /// Show the aggregate behind an availability zone
    Zone {
        zone: String,
    },
    /// Show the availability zones of a host
    HostZones {
        host: String,
    },
    /// Check whether a host is in an availability zone
    InZone {
        host: String,
        zone: String,
        /// Service role of the host
        #[arg(short, long)]
        service: Option<String>,
    },
    /// Inspect or toggle a host's service
    #[command(subcommand)]
    Service(ServiceCommands),
    /// Move a compute host into an availability zone
    ///
    /// Fails with "already member" when the host is already in that zone.
    AddToZone {
        host: String,
        zone: String,
    },
    /// Take a compute host out of an availability zone
    RemoveFromZone {
        host: String,
        zone: String,
    },
    /// Add a compute node to a host aggregate by name
    AddToAggregate {
        compute: String,
        aggregate: String,
    },
    /// Show the resolved OpenStack credentials (password not shown)
    Credentials,
    /// Show version
    Version,
}

#[derive(Subcommand)]
pub enum ServiceCommands {
    /// Show the service status
    Status {
        host: String,
        /// Service binary (default: nova-compute)
        #[arg(short, long)]
        binary: Option<String>,
    },
    /// Enable the service
    Enable {
        host: String,
        #[arg(short, long)]
        binary: Option<String>,
    },
    /// Disable the service
    Disable {
        host: String,
        #[arg(short, long)]
        binary: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if matches!(cli.command, Commands::Version) {
        println!("novafleet {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = FleetConfig::load()?;
    if let Some(rc) = cli.rc {
        config.keystonerc_path = rc;
    }
    tracing::debug!(
        rc = %config.keystonerc_path().display(),
        default_zone = %config.default_zone,
        "Loaded configuration"
    );

    if matches!(cli.command, Commands::Credentials) {
        return commands::credentials::handle_show(&config);
    }

    let mut fleet = FleetManager::connect(&config).await?;

    match cli.command {
        Commands::Hosts { service } => {
            commands::hosts::handle_list(&fleet, service.as_deref());
        }
        Commands::Zones => {
            commands::zones::handle_list(&fleet);
        }
        Commands::Zone { zone } => {
            commands::zones::handle_show(&fleet, &zone)?;
        }
        Commands::HostZones { host } => {
            commands::hosts::handle_zones(&fleet, &host);
        }
        Commands::InZone {
            host,
            zone,
            service,
        } => {
            commands::hosts::handle_in_zone(&fleet, &host, &zone, service.as_deref())?;
        }
        Commands::Service(action) => {
            commands::service::handle(&fleet, action).await?;
        }
        Commands::AddToZone { host, zone } => {
            commands::zones::handle_add_host(&mut fleet, &host, &zone).await?;
        }
        Commands::RemoveFromZone { host, zone } => {
            commands::zones::handle_remove_host(&mut fleet, &host, &zone).await?;
        }
        Commands::AddToAggregate { compute, aggregate } => {
            commands::zones::handle_add_compute(&mut fleet, &compute, &aggregate).await?;
        }
        Commands::Credentials | Commands::Version => {}
    }

    Ok(())
}
