//! REST client for the check custom resource, scoped to one fixed
//! group/version/resource/namespace.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::path::PathBuf;

use super::{CheckResource, CheckResourceStore};
use crate::config::ResourceConfig;
use crate::constants::{in_cluster, OperationStatus};
use crate::error::{HttpCheckError, Result};
use crate::execution::OperationContext;
use crate::logging::log_resource_operation;
use crate::models::{HttpCheck, HttpCheckDefinition};

/// Where the bearer token for the API server comes from.
#[derive(Debug, Clone)]
pub enum BearerToken {
    /// Re-read on every call so projected token rotation is honoured.
    File(PathBuf),
    Static(String),
}

impl BearerToken {
    async fn resolve(&self) -> Result<String> {
        match self {
            BearerToken::Static(token) => Ok(token.clone()),
            BearerToken::File(path) => tokio::fs::read_to_string(path)
                .await
                .map(|token| token.trim().to_string())
                .map_err(|e| {
                    HttpCheckError::Configuration(format!(
                        "failed to read service account token {}: {e}",
                        path.display()
                    ))
                }),
        }
    }
}

/// Error body returned by the API server (`kind: Status`).
#[derive(Debug, Default, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

/// Only the metadata of an existing resource is needed for updates.
#[derive(Debug, Deserialize)]
struct ExistingResource {
    metadata: super::ResourceMetadata,
}

/// Client for the check custom resource API.
#[derive(Debug, Clone)]
pub struct KubeResourceClient {
    http: reqwest::Client,
    api_server: String,
    token: BearerToken,
    resource: ResourceConfig,
}

impl KubeResourceClient {
    pub fn new(
        http: reqwest::Client,
        api_server: impl Into<String>,
        token: BearerToken,
        resource: ResourceConfig,
    ) -> Self {
        Self {
            http,
            api_server: api_server.into().trim_end_matches('/').to_string(),
            token,
            resource,
        }
    }

    /// Build a client from the pod's service account: API server address
    /// from `KUBERNETES_SERVICE_HOST`/`KUBERNETES_SERVICE_PORT`, cluster CA
    /// and token from the standard mount.
    pub fn in_cluster(resource: ResourceConfig) -> Result<Self> {
        let host = std::env::var(in_cluster::SERVICE_HOST_ENV).map_err(|_| {
            HttpCheckError::Configuration(format!(
                "{} is not set; not running inside a cluster",
                in_cluster::SERVICE_HOST_ENV
            ))
        })?;
        let port = std::env::var(in_cluster::SERVICE_PORT_ENV).unwrap_or_else(|_| "443".to_string());
        let api_server = if host.contains(':') {
            format!("https://[{host}]:{port}")
        } else {
            format!("https://{host}:{port}")
        };

        let ca_pem = std::fs::read(in_cluster::CA_CERT_PATH).map_err(|e| {
            HttpCheckError::Configuration(format!(
                "failed to read cluster CA {}: {e}",
                in_cluster::CA_CERT_PATH
            ))
        })?;
        let ca_cert = reqwest::Certificate::from_pem(&ca_pem)
            .map_err(|e| HttpCheckError::Configuration(format!("invalid cluster CA: {e}")))?;

        let http = reqwest::Client::builder()
            .add_root_certificate(ca_cert)
            .build()
            .map_err(|e| HttpCheckError::Configuration(format!("failed to build API client: {e}")))?;

        Ok(Self::new(
            http,
            api_server,
            BearerToken::File(PathBuf::from(in_cluster::TOKEN_PATH)),
            resource,
        ))
    }

    pub fn resource_config(&self) -> &ResourceConfig {
        &self.resource
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.api_server, self.resource.collection_path())
    }

    fn item_url(&self, name: &str) -> String {
        format!("{}{}", self.api_server, self.resource.item_path(name))
    }

    /// Authenticate and send, turning non-2xx replies into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.token.resolve().await?;
        let response = request.bearer_auth(token).send().await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let api_status = serde_json::from_str::<ApiStatus>(&body).unwrap_or_default();
        Err(status_error(status, api_status))
    }

    async fn fetch_resource_version(&self, name: &str) -> Result<String> {
        let response = self.send(self.http.get(self.item_url(name))).await?;
        let existing: ExistingResource = response.json().await?;

        existing.metadata.resource_version.ok_or_else(|| {
            HttpCheckError::Conflict(format!(
                "failed to retrieve resource version for {name}"
            ))
        })
    }

    fn record<T>(&self, operation: &str, name: &str, outcome: &Result<T>) {
        let namespace = &self.resource.namespace;
        match outcome {
            Ok(_) => log_resource_operation(operation, namespace, name, OperationStatus::Succeeded, None),
            Err(e) => {
                let status = if e.is_canceled() {
                    OperationStatus::Canceled
                } else {
                    OperationStatus::Failed
                };
                log_resource_operation(operation, namespace, name, status, Some(&e.to_string()));
            }
        }
    }
}

fn status_error(status: StatusCode, api_status: ApiStatus) -> HttpCheckError {
    let message = if api_status.message.is_empty() {
        status.to_string()
    } else {
        api_status.message
    };

    match status {
        StatusCode::NOT_FOUND => HttpCheckError::NotFound(message),
        StatusCode::CONFLICT => HttpCheckError::Conflict(message),
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
            HttpCheckError::Validation(message)
        }
        StatusCode::TOO_MANY_REQUESTS => HttpCheckError::StoreUnavailable(message),
        s if s.is_server_error() => HttpCheckError::StoreUnavailable(message),
        s => HttpCheckError::ResourceStore(format!("{s} {}: {message}", api_status.reason)),
    }
}

#[async_trait]
impl CheckResourceStore for KubeResourceClient {
    async fn create(&self, definition: &HttpCheckDefinition, ctx: &OperationContext) -> Result<()> {
        let resource = CheckResource::for_definition(&self.resource, definition);

        let outcome = ctx
            .bounded("resource_create", async {
                self.send(self.http.post(self.collection_url()).json(&resource))
                    .await
                    .map(|_| ())
            })
            .await;

        self.record("create", resource.name(), &outcome);
        outcome
    }

    async fn update(&self, check: &HttpCheck, ctx: &OperationContext) -> Result<()> {
        let name = check.name.as_str();

        let outcome = ctx
            .bounded("resource_update", async {
                let resource_version = self.fetch_resource_version(name).await?;
                let resource =
                    CheckResource::for_check(&self.resource, check).with_resource_version(resource_version);

                self.send(self.http.put(self.item_url(name)).json(&resource))
                    .await
                    .map(|_| ())
            })
            .await;

        self.record("update", name, &outcome);
        outcome
    }

    async fn delete(&self, name: &str, ctx: &OperationContext) -> Result<()> {
        let outcome = ctx
            .bounded("resource_delete", async {
                self.send(self.http.delete(self.item_url(name))).await.map(|_| ())
            })
            .await;

        self.record("delete", name, &outcome);
        outcome
    }
}
