//! NovaFleet configuration
//!
//! Locates and loads `novafleet.yaml`. Every field has a default, so running
//! without any config file is valid.

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable pointing directly at a config file
pub const CONFIG_PATH_ENV: &str = "NOVAFLEET_CONFIG";

const LOCAL_CANDIDATES: [&str; 2] = ["novafleet.local.yaml", "novafleet.yaml"];

/// Which catalog URL to use for the compute endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointInterface {
    #[default]
    Public,
    Internal,
    Admin,
}

impl EndpointInterface {
    /// Field name of this interface in a Keystone v2 catalog endpoint
    pub fn catalog_key(&self) -> &'static str {
        match self {
            EndpointInterface::Public => "publicURL",
            EndpointInterface::Internal => "internalURL",
            EndpointInterface::Admin => "adminURL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Shell rc file sourced when OS_* variables are missing
    pub keystonerc_path: PathBuf,

    /// Availability zone every host falls back to
    pub default_zone: String,

    /// Service role of compute hosts in the host listing
    pub compute_service: String,

    /// Binary name of the compute service record
    pub compute_binary: String,

    /// Suffix appended to bare compute names
    pub compute_domain_suffix: String,

    pub endpoint_interface: EndpointInterface,

    /// Workflow service endpoint carried by the workflow credential shape
    pub mistral_url: Option<String>,

    pub request_timeout_secs: u64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            keystonerc_path: PathBuf::from("~/keystonerc_admin"),
            default_zone: "nova".to_string(),
            compute_service: "compute".to_string(),
            compute_binary: "nova-compute".to_string(),
            compute_domain_suffix: ".local".to_string(),
            endpoint_interface: EndpointInterface::Public,
            mistral_url: None,
            request_timeout_secs: 30,
        }
    }
}

impl FleetConfig {
    /// Load the first config file found, or defaults when there is none
    pub fn load() -> Result<Self> {
        match find_config_file()? {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: FleetConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.keystonerc_path = expand_home(&config.keystonerc_path);
        config.validate()?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// The rc path with `~` expanded
    pub fn keystonerc_path(&self) -> PathBuf {
        expand_home(&self.keystonerc_path)
    }

    fn validate(&self) -> Result<()> {
        if self.default_zone.trim().is_empty() {
            return Err(ConfigError::Invalid("default_zone must not be empty".into()));
        }
        if self.compute_binary.trim().is_empty() {
            return Err(ConfigError::Invalid("compute_binary must not be empty".into()));
        }
        if self.compute_service.trim().is_empty() {
            return Err(ConfigError::Invalid("compute_service must not be empty".into()));
        }
        Ok(())
    }
}

/// NovaFleet's global config directory (`~/.config/novafleet`)
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("novafleet"))
}

/// Find the config file to load
///
/// Search order:
/// 1. `NOVAFLEET_CONFIG` (must exist when set)
/// 2. current directory: novafleet.local.yaml, novafleet.yaml
/// 3. ~/.config/novafleet/config.yaml
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::ExplicitPathMissing(path));
    }

    let current_dir = std::env::current_dir()?;
    for filename in &LOCAL_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
