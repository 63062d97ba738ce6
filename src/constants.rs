//! # System Constants
//!
//! Fixed coordinates of the orchestration-side resource store, request
//! surface defaults and the startup retry policy.

use serde::{Deserialize, Serialize};

/// Coordinates of the custom resource that mirrors each HTTP check.
pub mod resource {
    pub const GROUP: &str = "monitoring.httpcheck.io";
    pub const VERSION: &str = "v1alpha1";
    pub const PLURAL: &str = "cronjobs";
    pub const KIND: &str = "CronJob";
    pub const NAMESPACE: &str = "webapp";
}

/// In-cluster service account mount and API server discovery.
pub mod in_cluster {
    pub const TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
    pub const CA_CERT_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";
    pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
    pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";
}

/// Relational table holding check definitions.
pub const HTTP_CHECKS_TABLE: &str = "http_checks";

/// Deadline applied to every request that reaches the coordinator.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Startup connection policy.
pub const DEFAULT_CONNECT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_CONNECT_RETRY_INTERVAL_MS: u64 = 5_000;
pub const MAX_CONNECT_RETRY_INTERVAL_MS: u64 = 60_000;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Liveness of the relational store as reported by the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Reachable,
    Unreachable,
}

impl HealthStatus {
    pub fn is_reachable(self) -> bool {
        matches!(self, HealthStatus::Reachable)
    }
}

/// Outcome label attached to structured operation logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Succeeded,
    Failed,
    Canceled,
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Succeeded => write!(f, "succeeded"),
            OperationStatus::Failed => write!(f, "failed"),
            OperationStatus::Canceled => write!(f, "canceled"),
        }
    }
}
