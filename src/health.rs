//! # Liveness Probe
//!
//! Reports whether the relational store is reachable. The orchestration API
//! is deliberately not consulted.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error};

use crate::constants::HealthStatus;
use crate::database::HttpCheckRepository;

/// Result of a single liveness probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreHealth {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub duration_ms: u64,
    pub checked_at: String,
}

impl StoreHealth {
    pub fn is_reachable(&self) -> bool {
        self.status.is_reachable()
    }
}

pub async fn check_store_health<R>(repository: &R) -> StoreHealth
where
    R: HttpCheckRepository + ?Sized,
{
    let start = Instant::now();
    let outcome = repository.ping().await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let checked_at = chrono::Utc::now().to_rfc3339();

    match outcome {
        Ok(()) => {
            debug!(duration_ms, "Store liveness probe succeeded");
            StoreHealth {
                status: HealthStatus::Reachable,
                message: None,
                duration_ms,
                checked_at,
            }
        }
        Err(e) => {
            error!(error = %e, duration_ms, "Store liveness probe failed");
            StoreHealth {
                status: HealthStatus::Unreachable,
                message: Some(format!("Database connection failed: {e}")),
                duration_ms,
                checked_at,
            }
        }
    }
}
