//! Records returned by the compute API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the host listing: a host running one service role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub host_name: String,

    /// Service role (e.g. "compute", "conductor")
    pub service: String,

    /// Availability zone the host reports for this role
    pub zone: String,

    /// Other provider-reported fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Host {
    pub fn new(
        host_name: impl Into<String>,
        service: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            host_name: host_name.into(),
            service: service.into(),
            zone: zone.into(),
            extra: HashMap::new(),
        }
    }
}

/// Host aggregate, optionally exposed as an availability zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub id: u64,

    pub name: String,

    pub availability_zone: Option<String>,

    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Aggregate {
    pub fn has_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }
}

/// Enabled state of a service record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Enabled,
    Disabled,
    #[serde(other)]
    Unknown,
}

impl ServiceStatus {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            ServiceStatus::Enabled
        } else {
            ServiceStatus::Disabled
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Enabled => write!(f, "enabled"),
            ServiceStatus::Disabled => write!(f, "disabled"),
            ServiceStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Per-host service record (e.g. the `nova-compute` binary on one host)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: u64,

    pub host: String,

    pub binary: String,

    pub status: ServiceStatus,

    /// Liveness as reported by the provider ("up"/"down")
    pub state: Option<String>,

    pub zone: Option<String>,

    pub disabled_reason: Option<String>,
}
