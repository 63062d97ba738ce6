//! # Check Custom Resources
//!
//! Each HTTP check is mirrored as a namespaced custom resource so the
//! in-cluster controller can schedule probes for it. The resource name is
//! the check's display name, which is the only key shared with the
//! relational store.
//!
//! - [`CheckResourceStore`] - create/update/delete seam used by the coordinator
//! - [`CheckResource`] - wire shape of the object sent to the API server
//! - [`client::KubeResourceClient`] - REST client using in-cluster credentials

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ResourceConfig;
use crate::error::Result;
use crate::execution::OperationContext;
use crate::models::{HttpCheck, HttpCheckDefinition};

pub use client::{BearerToken, KubeResourceClient};

/// Declarative store holding one resource per check.
///
/// No operation upserts: create on an existing name, update on a stale
/// resource version and delete of a missing name all fail.
#[async_trait]
pub trait CheckResourceStore: Send + Sync {
    /// Create the resource for a check that has no identifier yet.
    async fn create(&self, definition: &HttpCheckDefinition, ctx: &OperationContext)
        -> Result<()>;

    /// Replace the resource named `check.name`, guarded by its current
    /// resource version.
    async fn update(&self, check: &HttpCheck, ctx: &OperationContext) -> Result<()>;

    async fn delete(&self, name: &str, ctx: &OperationContext) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResource {
    pub api_version: String,
    pub kind: String,
    pub metadata: ResourceMetadata,
    pub spec: CheckResourceSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResourceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub uri: String,
    pub is_paused: bool,
    pub num_retries: i32,
    pub uptime_sla: i32,
    pub response_time_sla: i32,
    pub use_ssl: bool,
    pub response_status_code: i32,
    pub check_interval_in_seconds: i32,
}

impl CheckResourceSpec {
    fn from_definition(id: Option<Uuid>, definition: &HttpCheckDefinition) -> Self {
        Self {
            id,
            name: definition.name.clone(),
            uri: definition.uri.clone(),
            is_paused: definition.is_paused,
            num_retries: definition.num_retries,
            uptime_sla: definition.uptime_sla,
            response_time_sla: definition.response_time_sla,
            use_ssl: definition.use_ssl,
            response_status_code: definition.response_status_code,
            check_interval_in_seconds: definition.check_interval_in_seconds,
        }
    }
}

impl CheckResource {
    fn build(config: &ResourceConfig, id: Option<Uuid>, definition: &HttpCheckDefinition) -> Self {
        Self {
            api_version: config.api_version(),
            kind: config.kind.clone(),
            metadata: ResourceMetadata {
                name: definition.name.clone(),
                resource_version: None,
            },
            spec: CheckResourceSpec::from_definition(id, definition),
        }
    }

    /// Resource for a not-yet-persisted check (no identifier).
    pub fn for_definition(config: &ResourceConfig, definition: &HttpCheckDefinition) -> Self {
        Self::build(config, None, definition)
    }

    /// Resource for a persisted check, carrying its identifier.
    pub fn for_check(config: &ResourceConfig, check: &HttpCheck) -> Self {
        Self::build(config, Some(check.id), &check.definition())
    }

    pub fn with_resource_version(mut self, resource_version: impl Into<String>) -> Self {
        self.metadata.resource_version = Some(resource_version.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}
