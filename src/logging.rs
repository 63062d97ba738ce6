//! # Structured Logging Module
//!
//! Environment-aware structured logging to the console and a JSON log file,
//! plus helpers that give store operations a consistent event shape.

use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::OperationStatus;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call more than once; only the first call installs a subscriber.
/// `RUST_LOG` overrides the environment-derived level.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| get_log_level(&environment));

        let pid = process::id();
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let log_filename = format!("{environment}.{pid}.{timestamp}.log");
        let log_dir = PathBuf::from("log");

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(environment != "production")
            .with_filter(EnvFilter::new(log_level.clone()));

        // A read-only filesystem is common in containers; fall back to console only.
        let file_layer = match fs::create_dir_all(&log_dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                // The guard must outlive the process for buffered lines to flush.
                std::mem::forget(guard);
                Some(
                    fmt::layer()
                        .with_writer(file_writer)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true)
                        .with_ansi(false)
                        .json()
                        .with_filter(EnvFilter::new(log_level)),
                )
            }
            Err(_) => None,
        };

        let file_enabled = file_layer.is_some();
        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = pid,
            environment = %environment,
            log_file = %log_dir.join(&log_filename).display(),
            file_enabled,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("HTTPCHECK_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for relational store operations
pub fn log_store_operation(
    operation: &str,
    record_id: Option<&str>,
    status: OperationStatus,
    duration_ms: u64,
    details: Option<&str>,
) {
    match status {
        OperationStatus::Succeeded => tracing::info!(
            operation = %operation,
            table = crate::constants::HTTP_CHECKS_TABLE,
            record_id = record_id,
            status = %status,
            duration_ms = duration_ms,
            details = details,
            "DATABASE_OPERATION"
        ),
        OperationStatus::Failed | OperationStatus::Canceled => tracing::warn!(
            operation = %operation,
            table = crate::constants::HTTP_CHECKS_TABLE,
            record_id = record_id,
            status = %status,
            duration_ms = duration_ms,
            details = details,
            "DATABASE_OPERATION"
        ),
    }
}

/// Log structured data for custom resource operations
pub fn log_resource_operation(
    operation: &str,
    namespace: &str,
    name: &str,
    status: OperationStatus,
    details: Option<&str>,
) {
    match status {
        OperationStatus::Succeeded => tracing::info!(
            operation = %operation,
            namespace = %namespace,
            name = %name,
            status = %status,
            details = details,
            "RESOURCE_OPERATION"
        ),
        OperationStatus::Failed | OperationStatus::Canceled => tracing::warn!(
            operation = %operation,
            namespace = %namespace,
            name = %name,
            status = %status,
            details = details,
            "RESOURCE_OPERATION"
        ),
    }
}
