//! Canonical OpenStack credentials and the client-specific shapes derived from them

use crate::error::{AuthError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub const OS_USERNAME: &str = "OS_USERNAME";
pub const OS_PASSWORD: &str = "OS_PASSWORD";
pub const OS_AUTH_URL: &str = "OS_AUTH_URL";
pub const OS_TENANT_NAME: &str = "OS_TENANT_NAME";

/// The four variables every credential set needs, in reporting order
pub const REQUIRED_KEYS: [&str; 4] = [OS_USERNAME, OS_PASSWORD, OS_AUTH_URL, OS_TENANT_NAME];

/// Where a credential set came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Script(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Script(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A complete, validated credential set
///
/// Fields are private so a value can only exist with all four fields non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
    auth_url: String,
    tenant_name: String,
    source: CredentialSource,
}

impl Credentials {
    /// Build credentials from a variable map
    ///
    /// Blank values count as missing. Values are stored as given.
    pub fn from_map(vars: &HashMap<String, String>, source: CredentialSource) -> Result<Self> {
        let value = |key: &str| vars.get(key).filter(|v| !v.trim().is_empty()).cloned();

        match (
            value(OS_USERNAME),
            value(OS_PASSWORD),
            value(OS_AUTH_URL),
            value(OS_TENANT_NAME),
        ) {
            (Some(username), Some(password), Some(auth_url), Some(tenant_name)) => Ok(Self {
                username,
                password,
                auth_url,
                tenant_name,
                source,
            }),
            _ => Err(AuthError::MissingCredentials(missing_keys(value))),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    pub fn tenant_name(&self) -> &str {
        &self.tenant_name
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// Identity client shape
    pub fn password_auth(&self) -> PasswordAuth<'_> {
        PasswordAuth {
            username: &self.username,
            password: &self.password,
            auth_url: &self.auth_url,
            tenant_name: &self.tenant_name,
        }
    }

    /// Compute client (v2) shape
    pub fn api_key_auth(&self) -> ApiKeyAuth<'_> {
        ApiKeyAuth {
            username: &self.username,
            api_key: &self.password,
            auth_url: &self.auth_url,
            project_id: &self.tenant_name,
        }
    }

    /// Workflow client shape
    pub fn workflow_auth<'a>(&'a self, mistral_url: Option<&'a str>) -> WorkflowAuth<'a> {
        WorkflowAuth {
            username: &self.username,
            api_key: &self.password,
            auth_url: &self.auth_url,
            project_name: &self.tenant_name,
            mistral_url,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("auth_url", &self.auth_url)
            .field("tenant_name", &self.tenant_name)
            .field("source", &self.source)
            .finish()
    }
}

/// Return the required keys for which `lookup` yields nothing usable
pub(crate) fn missing_keys<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_KEYS
        .into_iter()
        .filter(|key| lookup(*key).is_none_or(|v| v.trim().is_empty()))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordAuth<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub auth_url: &'a str,
    pub tenant_name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApiKeyAuth<'a> {
    pub username: &'a str,
    pub api_key: &'a str,
    pub auth_url: &'a str,
    pub project_id: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowAuth<'a> {
    pub username: &'a str,
    pub api_key: &'a str,
    pub auth_url: &'a str,
    pub project_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mistral_url: Option<&'a str>,
}
