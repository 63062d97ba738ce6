#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # HTTP Check Service
//!
//! CRUD service for HTTP check (uptime monitor) definitions that keeps two
//! independent stores in step: a PostgreSQL table, which serves every read,
//! and a namespaced custom resource per check, which the in-cluster
//! controller acts on.
//!
//! ## Architecture
//!
//! A mutating request flows through validation, then the custom resource
//! store, then the relational store, all under one caller deadline:
//!
//! ```text
//! request ─► validation ─► resources (CheckResourceStore) ─► database (HttpCheckRepository)
//! ```
//!
//! The resource write always precedes the relational write. There is no
//! distributed transaction and no automatic rollback: if the relational
//! write fails after the resource write succeeded, the error is reported
//! and the stores diverge until reconciled from resource state.
//!
//! ## Module Organization
//!
//! - [`validation`] - URI and name predicates, run before any write
//! - [`models`] - the check entity and its client-facing definition
//! - [`execution`] - per-request deadlines and detached, abandonable store calls
//! - [`database`] - PostgreSQL repository, pool bootstrap and migrations
//! - [`resources`] - custom resource shape and the orchestration API client
//! - [`instrumentation`] - timing/outcome logging decorator over the repository
//! - [`health`] - relational store liveness probe
//! - [`service`] - the dual-write coordinator
//! - [`web`] - axum routes and status mapping
//! - [`config`], [`error`], [`logging`], [`constants`] - ambient plumbing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use httpcheck::config::ServiceConfig;
//! use httpcheck::database::{DatabaseConnection, PgHttpCheckRepository};
//! use httpcheck::execution::OperationContext;
//! use httpcheck::instrumentation::InstrumentedRepository;
//! use httpcheck::resources::KubeResourceClient;
//! use httpcheck::service::HttpCheckService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::from_env()?;
//! let db = DatabaseConnection::connect_with_retry(&config).await?;
//!
//! let repository = InstrumentedRepository::new(PgHttpCheckRepository::new(db.pool().clone()));
//! let resources = KubeResourceClient::in_cluster(config.resource.clone())?;
//! let service = HttpCheckService::new(Arc::new(repository), Arc::new(resources));
//!
//! let ctx = OperationContext::with_timeout(config.request_timeout());
//! let checks = service.list(&ctx).await?;
//! println!("{} checks defined", checks.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod execution;
pub mod health;
pub mod instrumentation;
pub mod logging;
pub mod models;
pub mod resources;
pub mod service;
pub mod validation;
pub mod web;

pub use config::{ResourceConfig, ServiceConfig};
pub use constants::{HealthStatus, OperationStatus};
pub use error::{HttpCheckError, Result};
pub use execution::OperationContext;
pub use models::{HttpCheck, HttpCheckDefinition};
pub use service::HttpCheckService;
