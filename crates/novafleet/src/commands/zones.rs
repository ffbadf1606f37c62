use colored::Colorize;
use novafleet_compute::FleetManager;

pub fn handle_list(fleet: &FleetManager) {
    let aggregates = &fleet.snapshot().aggregates;

    if aggregates.is_empty() {
        println!("{}", "No host aggregates".dimmed());
        return;
    }

    println!(
        "{}",
        format!("{:<6} {:<30} {:<20} {:<6}", "ID", "AGGREGATE", "ZONE", "HOSTS").bold()
    );
    println!("{}", "─".repeat(65).dimmed());

    for aggregate in aggregates {
        let zone = aggregate.availability_zone.as_deref().unwrap_or("-");
        println!(
            "{:<6} {:<30} {:<20} {:<6}",
            aggregate.id,
            aggregate.name,
            zone.cyan(),
            aggregate.hosts.len()
        );
    }
}

pub fn handle_show(fleet: &FleetManager, zone: &str) -> anyhow::Result<()> {
    let aggregate = fleet
        .zone_exists(zone)
        .ok_or_else(|| anyhow::anyhow!("No such zone '{}'", zone))?;

    println!("{} {}", "Zone:".bold(), zone.cyan());
    println!("{} {} (id {})", "Aggregate:".bold(), aggregate.name, aggregate.id);
    println!("{}", "Hosts:".bold());
    if aggregate.hosts.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for host in &aggregate.hosts {
        println!("  {}", host);
    }
    Ok(())
}

pub async fn handle_add_host(
    fleet: &mut FleetManager,
    host: &str,
    zone: &str,
) -> anyhow::Result<()> {
    println!("{}", format!("Moving '{}' to zone '{}'...", host, zone).blue());

    if !fleet.add_host_to_zone(host, zone).await? {
        anyhow::bail!(
            "'{}' does not report zone '{}' after the move (zones: {})",
            host,
            zone,
            fleet.host_zones(host).join(", ")
        );
    }

    println!("{}", format!("✓ '{}' is in zone '{}'", host, zone).green().bold());
    Ok(())
}

pub async fn handle_remove_host(
    fleet: &mut FleetManager,
    host: &str,
    zone: &str,
) -> anyhow::Result<()> {
    println!("{}", format!("Removing '{}' from zone '{}'...", host, zone).blue());

    if !fleet.remove_host_from_zone(host, zone).await? {
        anyhow::bail!("'{}' still reports zone '{}'", host, zone);
    }

    println!(
        "{}",
        format!(
            "✓ '{}' removed from '{}' (now in: {})",
            host,
            zone,
            fleet.host_zones(host).join(", ")
        )
        .green()
        .bold()
    );
    Ok(())
}

pub async fn handle_add_compute(
    fleet: &mut FleetManager,
    compute: &str,
    aggregate: &str,
) -> anyhow::Result<()> {
    let added = fleet.add_compute_to_aggregate(compute, aggregate).await?;
    println!(
        "{}",
        format!("✓ '{}' added to host aggregate '{}'", added, aggregate)
            .green()
            .bold()
    );
    Ok(())
}
