use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Result;
use crate::validation;

/// HttpCheck is a single uptime monitor definition.
/// Maps to the `http_checks` table; `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HttpCheck {
    pub id: Uuid,
    pub name: String,
    pub uri: String,
    pub is_paused: bool,
    pub num_retries: i32,
    pub uptime_sla: i32,
    pub response_time_sla: i32,
    pub use_ssl: bool,
    pub response_status_code: i32,
    pub check_interval_in_seconds: i32,
    pub check_created: DateTime<Utc>,
    pub check_updated: DateTime<Utc>,
}

/// Client-supplied check definition (without generated fields).
///
/// Used as the body of both create and update requests. Any `id` or
/// timestamp in the incoming JSON is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpCheckDefinition {
    pub name: String,
    pub uri: String,
    pub is_paused: bool,
    pub num_retries: i32,
    pub uptime_sla: i32,
    pub response_time_sla: i32,
    #[serde(default)]
    pub use_ssl: bool,
    #[serde(default)]
    pub response_status_code: i32,
    #[serde(default)]
    pub check_interval_in_seconds: i32,
}

impl HttpCheckDefinition {
    /// True when the target URI is an http(s) URL with a dotted host.
    pub fn validate_uri(&self) -> bool {
        validation::is_valid_uri(&self.uri)
    }

    /// Full pre-write validation: URI shape and resource-safe name.
    pub fn validate(&self) -> Result<()> {
        validation::validate_uri(&self.uri)?;
        validation::validate_name(&self.name)
    }
}

impl HttpCheck {
    /// The client-facing part of this check.
    pub fn definition(&self) -> HttpCheckDefinition {
        HttpCheckDefinition {
            name: self.name.clone(),
            uri: self.uri.clone(),
            is_paused: self.is_paused,
            num_retries: self.num_retries,
            uptime_sla: self.uptime_sla,
            response_time_sla: self.response_time_sla,
            use_ssl: self.use_ssl,
            response_status_code: self.response_status_code,
            check_interval_in_seconds: self.check_interval_in_seconds,
        }
    }

    /// Overwrite every client field with `definition`, keeping this check's
    /// identifier and creation time.
    pub fn merged_with(&self, definition: &HttpCheckDefinition) -> HttpCheck {
        HttpCheck {
            id: self.id,
            name: definition.name.clone(),
            uri: definition.uri.clone(),
            is_paused: definition.is_paused,
            num_retries: definition.num_retries,
            uptime_sla: definition.uptime_sla,
            response_time_sla: definition.response_time_sla,
            use_ssl: definition.use_ssl,
            response_status_code: definition.response_status_code,
            check_interval_in_seconds: definition.check_interval_in_seconds,
            check_created: self.check_created,
            check_updated: Utc::now(),
        }
    }
}
