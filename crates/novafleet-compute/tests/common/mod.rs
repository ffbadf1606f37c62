use async_trait::async_trait;
use novafleet_compute::{
    Aggregate, ComputeError, ComputeProvider, Host, Result, Service, ServiceStatus,
};
use std::sync::Mutex;

/// In-memory Nova: a compute host's zone is the zone of the first zoned
/// aggregate it belongs to, or "nova"
pub struct FakeNova {
    state: Mutex<FakeState>,
}

struct FakeState {
    aggregates: Vec<Aggregate>,
    hosts: Vec<(String, String)>,
    services: Vec<Service>,
    calls: Vec<String>,
    ignore_aggregate_adds: bool,
    stuck_services: bool,
}

impl FakeNova {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                aggregates: Vec::new(),
                hosts: Vec::new(),
                services: Vec::new(),
                calls: Vec::new(),
                ignore_aggregate_adds: false,
                stuck_services: false,
            }),
        }
    }

    pub fn with_zone(self, id: u64, name: &str, zone: Option<&str>, hosts: &[&str]) -> Self {
        self.state.lock().unwrap().aggregates.push(Aggregate {
            id,
            name: name.to_string(),
            availability_zone: zone.map(str::to_string),
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            metadata: Default::default(),
        });
        self
    }

    /// Register a compute host with an enabled/disabled nova-compute record
    pub fn with_compute(self, host: &str, enabled: bool) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.hosts.push((host.to_string(), "compute".to_string()));
            let id = state.services.len() as u64 + 1;
            state.services.push(Service {
                id,
                host: host.to_string(),
                binary: "nova-compute".to_string(),
                status: ServiceStatus::from_enabled(enabled),
                state: Some("up".to_string()),
                zone: None,
                disabled_reason: None,
            });
        }
        self
    }

    pub fn with_host(self, host: &str, service: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .hosts
            .push((host.to_string(), service.to_string()));
        self
    }

    /// Accept add_host calls without changing membership
    pub fn ignoring_aggregate_adds(self) -> Self {
        self.state.lock().unwrap().ignore_aggregate_adds = true;
        self
    }

    /// Accept enable/disable calls without changing status
    pub fn with_stuck_services(self) -> Self {
        self.state.lock().unwrap().stuck_services = true;
        self
    }

    /// Mutating calls seen so far
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn status_of(&self, host: &str) -> Option<ServiceStatus> {
        self.state
            .lock()
            .unwrap()
            .services
            .iter()
            .find(|s| s.host == host)
            .map(|s| s.status)
    }

    fn set_status(&self, host: &str, binary: &str, enabled: bool) -> Result<ServiceStatus> {
        let mut state = self.state.lock().unwrap();
        let action = if enabled { "enable" } else { "disable" };
        state.calls.push(format!("{}:{}:{}", action, host, binary));
        let stuck = state.stuck_services;
        let service = state
            .services
            .iter_mut()
            .find(|s| s.host == host && s.binary == binary)
            .ok_or_else(|| ComputeError::Api {
                status: 404,
                message: format!("Host {} has no {}", host, binary),
            })?;
        if !stuck {
            service.status = ServiceStatus::from_enabled(enabled);
        }
        Ok(service.status)
    }
}

#[async_trait]
impl ComputeProvider for FakeNova {
    fn name(&self) -> &str {
        "fake-nova"
    }

    async fn list_aggregates(&self) -> Result<Vec<Aggregate>> {
        Ok(self.state.lock().unwrap().aggregates.clone())
    }

    async fn list_hosts(&self) -> Result<Vec<Host>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .hosts
            .iter()
            .map(|(name, service)| {
                let zone = if service == "compute" {
                    state
                        .aggregates
                        .iter()
                        .filter(|a| a.has_host(name))
                        .find_map(|a| a.availability_zone.clone())
                        .unwrap_or_else(|| "nova".to_string())
                } else {
                    "internal".to_string()
                };
                Host::new(name.clone(), service.clone(), zone)
            })
            .collect())
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.state.lock().unwrap().services.clone())
    }

    async fn enable_service(&self, host: &str, binary: &str) -> Result<ServiceStatus> {
        self.set_status(host, binary, true)
    }

    async fn disable_service(&self, host: &str, binary: &str) -> Result<ServiceStatus> {
        self.set_status(host, binary, false)
    }

    async fn add_host_to_aggregate(&self, aggregate_id: u64, host: &str) -> Result<Aggregate> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("add:{}:{}", aggregate_id, host));
        let ignore = state.ignore_aggregate_adds;
        let aggregate = state
            .aggregates
            .iter_mut()
            .find(|a| a.id == aggregate_id)
            .ok_or_else(|| ComputeError::Api {
                status: 404,
                message: format!("Aggregate {} could not be found", aggregate_id),
            })?;
        if !ignore && !aggregate.has_host(host) {
            aggregate.hosts.push(host.to_string());
        }
        Ok(aggregate.clone())
    }

    async fn remove_host_from_aggregate(
        &self,
        aggregate_id: u64,
        host: &str,
    ) -> Result<Aggregate> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("remove:{}:{}", aggregate_id, host));
        let aggregate = state
            .aggregates
            .iter_mut()
            .find(|a| a.id == aggregate_id)
            .ok_or_else(|| ComputeError::Api {
                status: 404,
                message: format!("Aggregate {} could not be found", aggregate_id),
            })?;
        aggregate.hosts.retain(|h| h != host);
        Ok(aggregate.clone())
    }
}
