//! Nova API client
//!
//! Authenticates against Keystone v2.0 with the compute client credential
//! shape, picks the compute endpoint from the service catalog and talks to
//! the `os-aggregates`, `os-hosts` and `os-services` APIs.

use crate::error::{ComputeError, Result};
use crate::model::{Aggregate, Host, Service, ServiceStatus};
use crate::provider::ComputeProvider;
use async_trait::async_trait;
use novafleet_auth::Credentials;
use novafleet_config::{EndpointInterface, FleetConfig};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Transport settings for [`NovaClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub interface: EndpointInterface,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            interface: EndpointInterface::Public,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&FleetConfig> for ClientSettings {
    fn from(config: &FleetConfig) -> Self {
        Self {
            interface: config.endpoint_interface,
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Nova compute API client
pub struct NovaClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl NovaClient {
    /// Authenticate and resolve the compute endpoint
    pub async fn connect(credentials: &Credentials, settings: &ClientSettings) -> Result<Self> {
        let client = build_http_client(settings)?;
        let creds = credentials.api_key_auth();
        let url = format!("{}/tokens", creds.auth_url.trim_end_matches('/'));

        let request_body = TokenRequest {
            auth: TokenAuth {
                tenant_name: creds.project_id,
                password_credentials: PasswordCredentials {
                    username: creds.username,
                    password: creds.api_key,
                },
            },
        };

        tracing::debug!(url = %url, username = %creds.username, "Requesting Keystone token");

        let response = client.post(&url).json(&request_body).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(ComputeError::AuthenticationFailed(error_message(&body)));
        }
        let access: TokenResponse = parse_response(response).await?;

        let endpoint = compute_endpoint(&access.access.service_catalog, settings.interface)?;
        tracing::info!(endpoint = %endpoint, "Authenticated against Keystone");

        Ok(Self {
            client,
            endpoint,
            token: access.access.token.id,
        })
    }

    /// Use an already known endpoint and token
    pub fn with_token(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        settings: &ClientSettings,
    ) -> Result<Self> {
        Ok(Self {
            client: build_http_client(settings)?,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .header(AUTH_TOKEN_HEADER, &self.token)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        tracing::debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .header(AUTH_TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        tracing::debug!("PUT {}", path);
        let response = self
            .client
            .put(self.url(path))
            .header(AUTH_TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn toggle_service(&self, action: &str, host: &str, binary: &str) -> Result<ServiceStatus> {
        let body = ServiceActionRequest { host, binary };
        let response: ServiceActionResponse = self
            .put(&format!("/os-services/{}", action), &body)
            .await?;
        Ok(response.service.status)
    }
}

#[async_trait]
impl ComputeProvider for NovaClient {
    fn name(&self) -> &str {
        "nova"
    }

    async fn list_aggregates(&self) -> Result<Vec<Aggregate>> {
        let response: AggregatesResponse = self.get("/os-aggregates").await?;
        Ok(response.aggregates)
    }

    async fn list_hosts(&self) -> Result<Vec<Host>> {
        let response: HostsResponse = self.get("/os-hosts").await?;
        Ok(response.hosts)
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        let response: ServicesResponse = self.get("/os-services").await?;
        Ok(response.services)
    }

    async fn enable_service(&self, host: &str, binary: &str) -> Result<ServiceStatus> {
        self.toggle_service("enable", host, binary).await
    }

    async fn disable_service(&self, host: &str, binary: &str) -> Result<ServiceStatus> {
        self.toggle_service("disable", host, binary).await
    }

    async fn add_host_to_aggregate(&self, aggregate_id: u64, host: &str) -> Result<Aggregate> {
        let body = AggregateAction::AddHost { host };
        let response: AggregateResponse = self
            .post(&format!("/os-aggregates/{}/action", aggregate_id), &body)
            .await?;
        Ok(response.aggregate)
    }

    async fn remove_host_from_aggregate(
        &self,
        aggregate_id: u64,
        host: &str,
    ) -> Result<Aggregate> {
        let body = AggregateAction::RemoveHost { host };
        let response: AggregateResponse = self
            .post(&format!("/os-aggregates/{}/action", aggregate_id), &body)
            .await?;
        Ok(response.aggregate)
    }
}

fn build_http_client(settings: &ClientSettings) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()?)
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ComputeError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pull the message out of `{"itemNotFound": {"message": ..}}`-style fault bodies
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.as_object()?
                .values()
                .find_map(|fault| fault.get("message")?.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn compute_endpoint(catalog: &[CatalogEntry], interface: EndpointInterface) -> Result<String> {
    catalog
        .iter()
        .filter(|entry| entry.r#type == "compute")
        .flat_map(|entry| entry.endpoints.iter())
        .find_map(|endpoint| endpoint.get(interface.catalog_key())?.as_str())
        .map(|url| url.trim_end_matches('/').to_string())
        .ok_or_else(|| ComputeError::EndpointNotFound {
            interface: interface.catalog_key().to_string(),
        })
}

// ============ API Types ============

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    auth: TokenAuth<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenAuth<'a> {
    tenant_name: &'a str,
    password_credentials: PasswordCredentials<'a>,
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: Access,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Access {
    token: Token,
    #[serde(default)]
    service_catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct Token {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    r#type: String,
    #[serde(default)]
    endpoints: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    aggregates: Vec<Aggregate>,
}

#[derive(Debug, Deserialize)]
struct AggregateResponse {
    aggregate: Aggregate,
}

#[derive(Debug, Deserialize)]
struct HostsResponse {
    hosts: Vec<Host>,
}

#[derive(Debug, Deserialize)]
struct ServicesResponse {
    services: Vec<Service>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum AggregateAction<'a> {
    AddHost { host: &'a str },
    RemoveHost { host: &'a str },
}

#[derive(Debug, Serialize)]
struct ServiceActionRequest<'a> {
    host: &'a str,
    binary: &'a str,
}

#[derive(Debug, Deserialize)]
struct ServiceActionResponse {
    service: ServiceActionResult,
}

#[derive(Debug, Deserialize)]
struct ServiceActionResult {
    status: ServiceStatus,
}
