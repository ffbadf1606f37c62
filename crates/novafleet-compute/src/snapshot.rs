//! Point-in-time copy of the fleet's aggregates and hosts
//!
//! A snapshot never changes after it is taken. [`FleetManager::refresh`]
//! replaces it with a new one and bumps `version`.
//!
//! [`FleetManager::refresh`]: crate::FleetManager::refresh

use crate::error::Result;
use crate::model::{Aggregate, Host};
use crate::provider::ComputeProvider;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    /// Starts at 1 and increases with every refresh
    pub version: u64,

    pub taken_at: DateTime<Utc>,

    pub aggregates: Vec<Aggregate>,

    pub hosts: Vec<Host>,
}

impl FleetSnapshot {
    pub fn new(version: u64, aggregates: Vec<Aggregate>, hosts: Vec<Host>) -> Self {
        Self {
            version,
            taken_at: Utc::now(),
            aggregates,
            hosts,
        }
    }

    /// Fetch aggregates and hosts from the provider
    pub async fn fetch<P: ComputeProvider + ?Sized>(provider: &P, version: u64) -> Result<Self> {
        let aggregates = provider.list_aggregates().await?;
        let hosts = provider.list_hosts().await?;
        tracing::debug!(
            provider = provider.name(),
            version,
            aggregates = aggregates.len(),
            hosts = hosts.len(),
            "Captured fleet snapshot"
        );
        Ok(Self::new(version, aggregates, hosts))
    }

    /// Hosts running the given service role
    pub fn hosts_by_service<'a, 's>(
        &'a self,
        service: &'s str,
    ) -> impl Iterator<Item = &'a Host> + use<'a, 's> {
        self.hosts.iter().filter(move |h| h.service == service)
    }

    /// Exact, case-sensitive match on host name and role
    pub fn has_host(&self, host: &str, service: &str) -> bool {
        self.hosts
            .iter()
            .any(|h| h.host_name == host && h.service == service)
    }

    /// First aggregate exposing the given availability zone
    pub fn aggregate_for_zone(&self, zone: &str) -> Option<&Aggregate> {
        self.aggregates
            .iter()
            .find(|a| a.availability_zone.as_deref() == Some(zone))
    }

    pub fn aggregate_named(&self, name: &str) -> Option<&Aggregate> {
        self.aggregates.iter().find(|a| a.name == name)
    }

    /// Zones of every host entry with this name, in listing order, without duplicates
    pub fn host_zones(&self, host: &str) -> Vec<String> {
        self.zones_where(|h| h.host_name == host)
    }

    /// Zones of the host's entries for one service role
    pub fn service_zones(&self, host: &str, service: &str) -> Vec<String> {
        self.zones_where(|h| h.host_name == host && h.service == service)
    }

    fn zones_where<F>(&self, predicate: F) -> Vec<String>
    where
        F: Fn(&Host) -> bool,
    {
        let mut zones: Vec<String> = Vec::new();
        for host in self.hosts.iter().filter(|h| predicate(h)) {
            if !zones.contains(&host.zone) {
                zones.push(host.zone.clone());
            }
        }
        zones
    }
}
