//! Compute fleet error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("No such availability-zone {0}")]
    NoSuchZone(String),

    #[error("No such host {host} for service {service}")]
    NoSuchHost { host: String, service: String },

    #[error("Host {host} is not in availability-zone {zone}")]
    HostNotInZone { host: String, zone: String },

    #[error("Host {host} already member of availability-zone(s) {}", .zones.join(", "))]
    HostAlreadyAssigned { host: String, zones: Vec<String> },

    #[error("No such host aggregate {0}")]
    NoSuchAggregate(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("No {interface} compute endpoint in service catalog")]
    EndpointNotFound { interface: String },

    #[error("Compute API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Credential error: {0}")]
    Credentials(#[from] novafleet_auth::AuthError),
}

impl ComputeError {
    /// True for violated preconditions about fleet state, false for transport,
    /// API and credential failures
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            ComputeError::NoSuchZone(_)
                | ComputeError::NoSuchHost { .. }
                | ComputeError::HostNotInZone { .. }
                | ComputeError::HostAlreadyAssigned { .. }
                | ComputeError::NoSuchAggregate(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ComputeError>;
