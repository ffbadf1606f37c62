//! Host, service and availability-zone management on top of a compute provider
//!
//! Queries read the manager's [`FleetSnapshot`]. Service lookups always go to
//! the provider. Mutations take `&mut self`, so one manager never runs two of
//! them at once, and each mutation refreshes the snapshot before verifying
//! its own result.

use crate::error::{ComputeError, Result};
use crate::model::{Aggregate, Host, Service, ServiceStatus};
use crate::nova::{ClientSettings, NovaClient};
use crate::provider::ComputeProvider;
use crate::snapshot::FleetSnapshot;
use novafleet_auth::{CredentialResolver, Credentials};
use novafleet_config::FleetConfig;
use tracing::{debug, info, warn};

/// Fleet conventions the manager works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerSettings {
    /// Zone a host falls back to when it is in no zoned aggregate
    pub default_zone: String,
    pub compute_service: String,
    pub compute_binary: String,
    pub compute_domain_suffix: String,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self::from(&FleetConfig::default())
    }
}

impl From<&FleetConfig> for ManagerSettings {
    fn from(config: &FleetConfig) -> Self {
        Self {
            default_zone: config.default_zone.clone(),
            compute_service: config.compute_service.clone(),
            compute_binary: config.compute_binary.clone(),
            compute_domain_suffix: config.compute_domain_suffix.clone(),
        }
    }
}

pub struct FleetManager<P: ComputeProvider = NovaClient> {
    provider: P,
    settings: ManagerSettings,
    snapshot: FleetSnapshot,
}

impl FleetManager<NovaClient> {
    /// Resolve credentials, authenticate and take the first snapshot
    ///
    /// Fails before any network call when credentials cannot be resolved.
    pub async fn connect(config: &FleetConfig) -> Result<Self> {
        let credentials = CredentialResolver::new(config.keystonerc_path()).resolve()?;
        Self::connect_with_credentials(&credentials, config).await
    }

    pub async fn connect_with_credentials(
        credentials: &Credentials,
        config: &FleetConfig,
    ) -> Result<Self> {
        info!(
            source = %credentials.source(),
            tenant = %credentials.tenant_name(),
            "Connecting to compute service"
        );
        let client = NovaClient::connect(credentials, &ClientSettings::from(config)).await?;
        Self::with_provider(client, ManagerSettings::from(config)).await
    }
}

impl<P: ComputeProvider> FleetManager<P> {
    /// Build a manager over any provider and take the first snapshot
    pub async fn with_provider(provider: P, settings: ManagerSettings) -> Result<Self> {
        let snapshot = FleetSnapshot::fetch(&provider, 1).await?;
        info!(
            provider = provider.name(),
            aggregates = snapshot.aggregates.len(),
            hosts = snapshot.hosts.len(),
            "Fleet manager ready"
        );
        Ok(Self {
            provider,
            settings,
            snapshot,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> &FleetSnapshot {
        &self.snapshot
    }

    /// Replace the snapshot with fresh provider data; returns the new version
    pub async fn refresh(&mut self) -> Result<u64> {
        let version = self.snapshot.version + 1;
        self.snapshot = FleetSnapshot::fetch(&self.provider, version).await?;
        Ok(version)
    }

    /// Cached hosts, optionally limited to one service role
    pub fn list_hosts(&self, service: Option<&str>) -> Vec<&Host> {
        match service {
            Some(service) => self.snapshot.hosts_by_service(service).collect(),
            None => self.snapshot.hosts.iter().collect(),
        }
    }

    /// Whether the snapshot has `host` for `service` (compute by default)
    pub fn host_exists(&self, host: &str, service: Option<&str>) -> bool {
        let service = service.unwrap_or(&self.settings.compute_service);
        let exists = self.snapshot.has_host(host, service);
        if !exists {
            warn!("Host {} not found for service {}", host, service);
        }
        exists
    }

    /// The aggregate exposing `zone`, if any
    pub fn zone_exists(&self, zone: &str) -> Option<&Aggregate> {
        match self.snapshot.aggregate_for_zone(zone) {
            Some(aggregate) => {
                debug!("Found zone {} in host aggregate {}", zone, aggregate.name);
                Some(aggregate)
            }
            None => {
                warn!("No such zone {}", zone);
                None
            }
        }
    }

    /// Zones the snapshot reports for `host`, across all its service roles
    pub fn host_zones(&self, host: &str) -> Vec<String> {
        self.snapshot.host_zones(host)
    }

    pub fn host_in_zone(&self, host: &str, zone: &str, service: Option<&str>) -> bool {
        if !self.host_exists(host, service) {
            return false;
        }
        if self.zone_exists(zone).is_none() {
            return false;
        }
        if !self.host_zones(host).iter().any(|z| z == zone) {
            warn!("Host {} not in zone {}", host, zone);
            return false;
        }
        true
    }

    /// Look up a service record with a fresh provider listing
    pub async fn find_service(&self, host: &str, binary: Option<&str>) -> Result<Option<Service>> {
        let binary = binary.unwrap_or(&self.settings.compute_binary);
        let services = self.provider.list_services().await?;
        Ok(services
            .into_iter()
            .find(|s| s.host == host && s.binary == binary))
    }

    /// Status of the host's service, `Unknown` when there is no such record
    pub async fn service_status(&self, host: &str, binary: Option<&str>) -> Result<ServiceStatus> {
        match self.find_service(host, binary).await? {
            Some(service) => Ok(service.status),
            None => {
                debug!(
                    "No {} service record on {}",
                    binary.unwrap_or(&self.settings.compute_binary),
                    host
                );
                Ok(ServiceStatus::Unknown)
            }
        }
    }

    /// Enable or disable the host's service
    ///
    /// `Ok(false)` when there is no such service record or the provider
    /// reports a different status afterwards.
    pub async fn set_service_enabled(
        &self,
        host: &str,
        binary: Option<&str>,
        enable: bool,
    ) -> Result<bool> {
        let binary = binary.unwrap_or(&self.settings.compute_binary);
        if self.find_service(host, Some(binary)).await?.is_none() {
            warn!("No {} service record on {}", binary, host);
            return Ok(false);
        }

        let status = if enable {
            self.provider.enable_service(host, binary).await?
        } else {
            self.provider.disable_service(host, binary).await?
        };

        let wanted = ServiceStatus::from_enabled(enable);
        if status != wanted {
            warn!(
                "Service {} on {} is {} after requesting {}",
                binary, host, status, wanted
            );
            return Ok(false);
        }

        info!("Service {} on {} is now {}", binary, host, status);
        Ok(true)
    }

    /// Move a compute host into the aggregate exposing `zone`
    ///
    /// Re-enables the host's compute service and takes it out of any
    /// non-default zone first. Returns whether the refreshed snapshot shows
    /// the host in `zone`.
    pub async fn add_host_to_zone(&mut self, host: &str, zone: &str) -> Result<bool> {
        let service = self.settings.compute_service.clone();
        if !self.host_exists(host, Some(service.as_str())) {
            return Err(ComputeError::NoSuchHost {
                host: host.to_string(),
                service,
            });
        }
        let aggregate_id = self
            .zone_exists(zone)
            .map(|a| a.id)
            .ok_or_else(|| ComputeError::NoSuchZone(zone.to_string()))?;

        let current = self.snapshot.service_zones(host, &service);
        if current.iter().any(|z| z == zone) {
            return Err(ComputeError::HostAlreadyAssigned {
                host: host.to_string(),
                zones: current,
            });
        }

        if !self.set_service_enabled(host, None, true).await? {
            warn!("Could not confirm compute service on {} is enabled", host);
        }

        let stale: Vec<String> = current
            .into_iter()
            .filter(|z| *z != self.settings.default_zone)
            .collect();
        for old_zone in &stale {
            info!("Removing {} from zone {}", host, old_zone);
            if !self.remove_host_from_zone(host, old_zone).await? {
                warn!("{} still reports zone {}", host, old_zone);
            }
        }

        info!(provider = self.provider.name(), "Adding {} to zone {}", host, zone);
        self.provider
            .add_host_to_aggregate(aggregate_id, host)
            .await?;
        self.refresh().await?;

        let added = self.host_zones(host).iter().any(|z| z == zone);
        if !added {
            warn!("Host {} was not added to zone {}", host, zone);
        }
        Ok(added)
    }

    /// Take a host out of the aggregate exposing `zone`
    ///
    /// Returns whether the refreshed snapshot no longer shows the host in
    /// `zone`. The provider decides which zone the host falls back to.
    pub async fn remove_host_from_zone(&mut self, host: &str, zone: &str) -> Result<bool> {
        let aggregate_id = self
            .zone_exists(zone)
            .map(|a| a.id)
            .ok_or_else(|| ComputeError::NoSuchZone(zone.to_string()))?;

        let service = self.settings.compute_service.clone();
        if !self.host_exists(host, Some(service.as_str())) {
            return Err(ComputeError::NoSuchHost {
                host: host.to_string(),
                service,
            });
        }
        if !self.host_zones(host).iter().any(|z| z == zone) {
            return Err(ComputeError::HostNotInZone {
                host: host.to_string(),
                zone: zone.to_string(),
            });
        }

        self.provider
            .remove_host_from_aggregate(aggregate_id, host)
            .await?;
        self.refresh().await?;

        let removed = !self.host_zones(host).iter().any(|z| z == zone);
        if !removed {
            warn!("Host {} still reports zone {} after removal", host, zone);
        }
        Ok(removed)
    }

    /// Add a compute node to a host aggregate by aggregate name
    ///
    /// Bare names get the compute domain suffix appended. Returns the name
    /// that was added.
    pub async fn add_compute_to_aggregate(
        &mut self,
        compute: &str,
        aggregate: &str,
    ) -> Result<String> {
        let compute = self.qualified_compute_name(compute);
        let aggregate_id = self
            .snapshot
            .aggregate_named(aggregate)
            .map(|a| a.id)
            .ok_or_else(|| {
                warn!("No host aggregate named {}", aggregate);
                ComputeError::NoSuchAggregate(aggregate.to_string())
            })?;

        info!("Adding {} to host aggregate {}", compute, aggregate);
        self.provider
            .add_host_to_aggregate(aggregate_id, &compute)
            .await?;
        self.refresh().await?;
        Ok(compute)
    }

    fn qualified_compute_name(&self, compute: &str) -> String {
        let suffix = &self.settings.compute_domain_suffix;
        if compute.ends_with(suffix.as_str()) {
            compute.to_string()
        } else {
            format!("{}{}", compute, suffix)
        }
    }
}
