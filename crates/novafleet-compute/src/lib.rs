//! Nova compute fleet management for NovaFleet
//!
//! Opens a session against the compute service, keeps a snapshot of host
//! aggregates and hosts, and moves hosts between availability zones.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 FleetManager                 │
//! │   host / zone queries   ──►  FleetSnapshot   │
//! │   zone + service moves  ──►  refresh()       │
//! └──────────────────┬───────────────────────────┘
//!                    │ trait ComputeProvider
//!            ┌───────▼───────┐
//!            │  NovaClient   │  Keystone v2.0 token
//!            │  (reqwest)    │  + os-aggregates / os-hosts / os-services
//!            └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use novafleet_compute::FleetManager;
//! use novafleet_config::FleetConfig;
//!
//! let config = FleetConfig::load()?;
//! let mut fleet = FleetManager::connect(&config).await?;
//!
//! if fleet.add_host_to_zone("compute-07", "az2").await? {
//!     println!("compute-07 is now in {:?}", fleet.host_zones("compute-07"));
//! }
//! ```

pub mod error;
pub mod manager;
pub mod model;
pub mod nova;
pub mod provider;
pub mod snapshot;

pub use error::{ComputeError, Result};
pub use manager::{FleetManager, ManagerSettings};
pub use model::{Aggregate, Host, Service, ServiceStatus};
pub use nova::{ClientSettings, NovaClient};
pub use provider::ComputeProvider;
pub use snapshot::FleetSnapshot;
