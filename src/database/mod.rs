//! # Database Operations
//!
//! Relational side of the service: the `http_checks` repository, pool
//! bootstrap with bounded retries, and embedded schema migrations.
//!
//! ## Key Components
//!
//! - [`connection`] - Pool creation, startup retry loop and migrations
//! - [`repository`] - The [`HttpCheckRepository`] trait and its sqlx implementation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use httpcheck::config::ServiceConfig;
//! use httpcheck::database::{DatabaseConnection, HttpCheckRepository, PgHttpCheckRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::from_env()?;
//! let db = DatabaseConnection::connect_with_retry(&config).await?;
//! db.migrate().await?;
//!
//! let repository = PgHttpCheckRepository::new(db.pool().clone());
//! let checks = repository.get_all().await?;
//! println!("{} checks defined", checks.len());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod repository;

pub use connection::DatabaseConnection;
pub use repository::{HttpCheckRepository, PgHttpCheckRepository};
