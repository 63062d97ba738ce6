//! # Repository Instrumentation
//!
//! [`InstrumentedRepository`] wraps any [`HttpCheckRepository`], timing each
//! call and logging its outcome. Results and errors pass through untouched,
//! so wrapping twice only logs twice.

use async_trait::async_trait;
use std::time::Instant;
use uuid::Uuid;

use crate::constants::OperationStatus;
use crate::database::HttpCheckRepository;
use crate::error::{HttpCheckError, Result};
use crate::execution::OperationContext;
use crate::logging::log_store_operation;
use crate::models::{HttpCheck, HttpCheckDefinition};

#[derive(Debug, Clone)]
pub struct InstrumentedRepository<R> {
    inner: R,
}

impl<R: HttpCheckRepository> InstrumentedRepository<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

fn outcome_status<T>(outcome: &Result<T>) -> OperationStatus {
    match outcome {
        Ok(_) => OperationStatus::Succeeded,
        Err(HttpCheckError::Canceled { .. }) => OperationStatus::Canceled,
        Err(_) => OperationStatus::Failed,
    }
}

fn record<T>(operation: &str, record_id: Option<Uuid>, started: Instant, outcome: &Result<T>) {
    let record_id = record_id.map(|id| id.to_string());
    let error = outcome.as_ref().err().map(ToString::to_string);
    log_store_operation(
        operation,
        record_id.as_deref(),
        outcome_status(outcome),
        started.elapsed().as_millis() as u64,
        error.as_deref(),
    );
}

#[async_trait]
impl<R: HttpCheckRepository> HttpCheckRepository for InstrumentedRepository<R> {
    async fn get_all(&self) -> Result<Vec<HttpCheck>> {
        let started = Instant::now();
        let outcome = self.inner.get_all().await;
        record("get_all", None, started, &outcome);
        outcome
    }

    async fn get_by_id(&self, id: Uuid, ctx: &OperationContext) -> Result<Option<HttpCheck>> {
        let started = Instant::now();
        let outcome = self.inner.get_by_id(id, ctx).await;
        record("get_by_id", Some(id), started, &outcome);
        outcome
    }

    async fn create(
        &self,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        let started = Instant::now();
        let outcome = self.inner.create(definition, ctx).await;
        let id = outcome.as_ref().ok().map(|check| check.id);
        record("create", id, started, &outcome);
        outcome
    }

    async fn update(
        &self,
        id: Uuid,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        let started = Instant::now();
        let outcome = self.inner.update(id, definition, ctx).await;
        record("update", Some(id), started, &outcome);
        outcome
    }

    async fn delete(&self, id: Uuid, ctx: &OperationContext) -> Result<HttpCheck> {
        let started = Instant::now();
        let outcome = self.inner.delete(id, ctx).await;
        record("delete", Some(id), started, &outcome);
        outcome
    }

    async fn ping(&self) -> Result<()> {
        let started = Instant::now();
        let outcome = self.inner.ping().await;
        record("ping", None, started, &outcome);
        outcome
    }
}
