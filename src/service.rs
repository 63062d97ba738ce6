//! # Dual-Write Coordinator
//!
//! [`HttpCheckService`] sequences the custom resource store and the
//! relational store for every mutating request:
//!
//! - **create**: validate → resource create → row insert
//! - **update**: validate → row read → resource update → row update
//! - **delete**: row read (resolves the resource name) → resource delete → row delete
//!
//! Reads only touch the relational store.
//!
//! The first failure ends the sequence and is returned unchanged. A resource
//! write that succeeded before a relational failure is not rolled back; the
//! in-cluster controller reconciles from resource state, so an orphaned
//! resource is the recoverable direction. Cancellation is terminal: nothing
//! is retried after the deadline passes.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::HttpCheckRepository;
use crate::error::{HttpCheckError, Result};
use crate::execution::{run_detached, OperationContext};
use crate::health::{check_store_health, StoreHealth};
use crate::models::{HttpCheck, HttpCheckDefinition};
use crate::resources::CheckResourceStore;

#[derive(Clone)]
pub struct HttpCheckService {
    repository: Arc<dyn HttpCheckRepository>,
    resources: Arc<dyn CheckResourceStore>,
}

impl std::fmt::Debug for HttpCheckService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCheckService").finish_non_exhaustive()
    }
}

fn not_found(id: Uuid) -> HttpCheckError {
    HttpCheckError::NotFound(format!("HTTP check {id} not found"))
}

impl HttpCheckService {
    pub fn new(
        repository: Arc<dyn HttpCheckRepository>,
        resources: Arc<dyn CheckResourceStore>,
    ) -> Self {
        Self {
            repository,
            resources,
        }
    }

    /// All checks, bounded by the caller's deadline. A deadline miss yields
    /// `Canceled`, never a partial list.
    pub async fn list(&self, ctx: &OperationContext) -> Result<Vec<HttpCheck>> {
        let repository = Arc::clone(&self.repository);
        run_detached("get_all", ctx, async move { repository.get_all().await }).await
    }

    pub async fn get(&self, id: Uuid, ctx: &OperationContext) -> Result<Option<HttpCheck>> {
        self.repository.get_by_id(id, ctx).await
    }

    pub async fn create(
        &self,
        definition: HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        definition.validate()?;

        self.resources.create(&definition, ctx).await?;

        let created = self
            .repository
            .create(&definition, ctx)
            .await
            .inspect_err(|e| warn_relational_lag("create", &definition.name, e))?;

        info!(id = %created.id, name = %created.name, "HTTP check created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        definition: HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        definition.validate()?;

        let existing = self
            .repository
            .get_by_id(id, ctx)
            .await?
            .ok_or_else(|| not_found(id))?;

        // The name is the resource name and the only cross-store key.
        if existing.name != definition.name {
            return Err(HttpCheckError::Validation(format!(
                "check name is immutable: {:?} cannot be renamed to {:?}",
                existing.name, definition.name
            )));
        }

        let merged = existing.merged_with(&definition);
        self.resources.update(&merged, ctx).await?;

        let updated = self
            .repository
            .update(id, &definition, ctx)
            .await
            .inspect_err(|e| warn_relational_lag("update", &definition.name, e))?;

        info!(id = %updated.id, name = %updated.name, "HTTP check updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, ctx: &OperationContext) -> Result<()> {
        let existing = self
            .repository
            .get_by_id(id, ctx)
            .await?
            .ok_or_else(|| not_found(id))?;

        self.resources.delete(&existing.name, ctx).await?;

        self.repository
            .delete(id, ctx)
            .await
            .inspect_err(|e| warn_relational_lag("delete", &existing.name, e))?;

        info!(id = %id, name = %existing.name, "HTTP check deleted");
        Ok(())
    }

    pub async fn health(&self) -> StoreHealth {
        check_store_health(self.repository.as_ref()).await
    }
}

/// The resource write already happened; surface the divergence in logs.
fn warn_relational_lag(operation: &str, name: &str, error: &HttpCheckError) {
    warn!(
        operation,
        name,
        error = %error,
        "Custom resource written but relational write failed; stores diverge until reconciled"
    );
}
