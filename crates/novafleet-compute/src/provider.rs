//! Compute provider trait definition

use crate::error::Result;
use crate::model::{Aggregate, Host, Service, ServiceStatus};
use async_trait::async_trait;

/// Authenticated session against a compute service
///
/// [`NovaClient`](crate::NovaClient) talks to a real Nova endpoint; tests
/// plug in in-memory implementations.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Returns the provider name used in log output
    fn name(&self) -> &str;

    async fn list_aggregates(&self) -> Result<Vec<Aggregate>>;

    /// All hosts, one entry per (host, service role)
    async fn list_hosts(&self) -> Result<Vec<Host>>;

    async fn list_services(&self) -> Result<Vec<Service>>;

    /// Enable a service and return the status the provider reports afterwards
    async fn enable_service(&self, host: &str, binary: &str) -> Result<ServiceStatus>;

    /// Disable a service and return the status the provider reports afterwards
    async fn disable_service(&self, host: &str, binary: &str) -> Result<ServiceStatus>;

    async fn add_host_to_aggregate(&self, aggregate_id: u64, host: &str) -> Result<Aggregate>;

    async fn remove_host_from_aggregate(&self, aggregate_id: u64, host: &str)
    -> Result<Aggregate>;
}
