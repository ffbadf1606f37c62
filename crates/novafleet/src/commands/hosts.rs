use colored::Colorize;
use novafleet_compute::FleetManager;

pub fn handle_list(fleet: &FleetManager, service: Option<&str>) {
    let hosts = fleet.list_hosts(service);

    if hosts.is_empty() {
        println!("{}", "No hosts found".dimmed());
        return;
    }

    println!(
        "{}",
        format!("{:<40} {:<15} {:<20}", "HOST", "SERVICE", "ZONE").bold()
    );
    println!("{}", "─".repeat(75).dimmed());

    for host in hosts {
        let zone = if host.zone == fleet.settings().default_zone {
            host.zone.dimmed()
        } else {
            host.zone.cyan()
        };
        println!("{:<40} {:<15} {:<20}", host.host_name, host.service, zone);
    }
}

pub fn handle_zones(fleet: &FleetManager, host: &str) {
    let zones = fleet.host_zones(host);

    if zones.is_empty() {
        println!("{}", format!("Host '{}' is in no zone", host).dimmed());
        return;
    }

    for zone in zones {
        println!("{}", zone);
    }
}

pub fn handle_in_zone(
    fleet: &FleetManager,
    host: &str,
    zone: &str,
    service: Option<&str>,
) -> anyhow::Result<()> {
    if !fleet.host_in_zone(host, zone, service) {
        anyhow::bail!("Host '{}' is not in zone '{}'", host, zone);
    }

    println!("{}", format!("✓ '{}' is in zone '{}'", host, zone).green());
    Ok(())
}
