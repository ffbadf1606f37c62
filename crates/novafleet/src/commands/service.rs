use crate::ServiceCommands;
use colored::Colorize;
use novafleet_compute::{FleetManager, ServiceStatus};

pub async fn handle(fleet: &FleetManager, action: ServiceCommands) -> anyhow::Result<()> {
    match action {
        ServiceCommands::Status { host, binary } => {
            let status = fleet.service_status(&host, binary.as_deref()).await?;
            let binary = binary.unwrap_or_else(|| fleet.settings().compute_binary.clone());
            let status_colored = match status {
                ServiceStatus::Enabled => status.to_string().green(),
                ServiceStatus::Disabled => status.to_string().yellow(),
                ServiceStatus::Unknown => status.to_string().dimmed(),
            };
            println!("{} on {}: {}", binary, host.cyan(), status_colored);
        }
        ServiceCommands::Enable { host, binary } => {
            toggle(fleet, &host, binary.as_deref(), true).await?;
        }
        ServiceCommands::Disable { host, binary } => {
            toggle(fleet, &host, binary.as_deref(), false).await?;
        }
    }

    Ok(())
}

async fn toggle(
    fleet: &FleetManager,
    host: &str,
    binary: Option<&str>,
    enable: bool,
) -> anyhow::Result<()> {
    let wanted = ServiceStatus::from_enabled(enable);
    println!("{}", format!("Setting service on '{}' to {}...", host, wanted).blue());

    if !fleet.set_service_enabled(host, binary, enable).await? {
        anyhow::bail!("Service on '{}' could not be set to {}", host, wanted);
    }

    println!("{}", format!("✓ Service on '{}' is {}", host, wanted).green().bold());
    Ok(())
}
