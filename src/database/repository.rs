//! # HTTP Check Repository
//!
//! CRUD over the `http_checks` table. Every keyed operation runs through
//! [`run_detached`] so a caller is never held past its deadline, even though
//! the underlying sqlx call itself is not cancelled.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{HttpCheckError, Result};
use crate::execution::{run_detached, OperationContext};
use crate::models::{HttpCheck, HttpCheckDefinition};
use crate::validation;

/// Relational store for check definitions.
///
/// The relational store is the source of truth for reads. Implementations
/// must be shareable across requests.
#[async_trait]
pub trait HttpCheckRepository: Send + Sync {
    /// Every stored check in insertion order. Callers bound this with their
    /// own deadline.
    async fn get_all(&self) -> Result<Vec<HttpCheck>>;

    /// `Ok(None)` when no row has `id`; that is not an error.
    async fn get_by_id(&self, id: Uuid, ctx: &OperationContext) -> Result<Option<HttpCheck>>;

    /// Insert a new row. The identifier and timestamps are assigned here.
    async fn create(
        &self,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck>;

    /// Overwrite the row identified by `id`. Fails with `NotFound` and
    /// writes nothing when the row is absent.
    async fn update(
        &self,
        id: Uuid,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck>;

    /// Physically remove the row identified by `id`, returning it.
    async fn delete(&self, id: Uuid, ctx: &OperationContext) -> Result<HttpCheck>;

    /// Verify the underlying connection is usable.
    async fn ping(&self) -> Result<()>;
}

const SELECT_COLUMNS: &str = "id, name, uri, is_paused, num_retries, uptime_sla, \
     response_time_sla, use_ssl, response_status_code, check_interval_in_seconds, \
     check_created, check_updated";

/// sqlx/PostgreSQL implementation backed by a shared pool.
#[derive(Debug, Clone)]
pub struct PgHttpCheckRepository {
    pool: PgPool,
}

impl PgHttpCheckRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn not_found(id: Uuid) -> HttpCheckError {
    HttpCheckError::NotFound(format!("HTTP check {id} not found"))
}

#[async_trait]
impl HttpCheckRepository for PgHttpCheckRepository {
    async fn get_all(&self) -> Result<Vec<HttpCheck>> {
        let checks = sqlx::query_as::<_, HttpCheck>(&format!(
            "SELECT {SELECT_COLUMNS} FROM http_checks ORDER BY check_created, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(checks)
    }

    async fn get_by_id(&self, id: Uuid, ctx: &OperationContext) -> Result<Option<HttpCheck>> {
        let pool = self.pool.clone();
        run_detached("get_by_id", ctx, async move {
            let check = sqlx::query_as::<_, HttpCheck>(&format!(
                "SELECT {SELECT_COLUMNS} FROM http_checks WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&pool)
            .await?;

            Ok(check)
        })
        .await
    }

    async fn create(
        &self,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        validation::validate_uri(&definition.uri)?;

        let pool = self.pool.clone();
        let new_check = definition.clone();
        run_detached("create", ctx, async move {
            let check = sqlx::query_as::<_, HttpCheck>(&format!(
                r#"
                INSERT INTO http_checks (
                    name, uri, is_paused, num_retries, uptime_sla, response_time_sla,
                    use_ssl, response_status_code, check_interval_in_seconds,
                    check_created, check_updated
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
                RETURNING {SELECT_COLUMNS}
                "#
            ))
            .bind(&new_check.name)
            .bind(&new_check.uri)
            .bind(new_check.is_paused)
            .bind(new_check.num_retries)
            .bind(new_check.uptime_sla)
            .bind(new_check.response_time_sla)
            .bind(new_check.use_ssl)
            .bind(new_check.response_status_code)
            .bind(new_check.check_interval_in_seconds)
            .fetch_one(&pool)
            .await?;

            Ok(check)
        })
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        validation::validate_uri(&definition.uri)?;

        let pool = self.pool.clone();
        let changes = definition.clone();
        // Single conditional statement: the row keeps its id and the write
        // only lands if the row still exists.
        run_detached("update", ctx, async move {
            let updated = sqlx::query_as::<_, HttpCheck>(&format!(
                r#"
                UPDATE http_checks
                SET
                    name = $2,
                    uri = $3,
                    is_paused = $4,
                    num_retries = $5,
                    uptime_sla = $6,
                    response_time_sla = $7,
                    use_ssl = $8,
                    response_status_code = $9,
                    check_interval_in_seconds = $10,
                    check_updated = NOW()
                WHERE id = $1
                RETURNING {SELECT_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.uri)
            .bind(changes.is_paused)
            .bind(changes.num_retries)
            .bind(changes.uptime_sla)
            .bind(changes.response_time_sla)
            .bind(changes.use_ssl)
            .bind(changes.response_status_code)
            .bind(changes.check_interval_in_seconds)
            .fetch_optional(&pool)
            .await?;

            updated.ok_or_else(|| not_found(id))
        })
        .await
    }

    async fn delete(&self, id: Uuid, ctx: &OperationContext) -> Result<HttpCheck> {
        let pool = self.pool.clone();
        run_detached("delete", ctx, async move {
            let deleted = sqlx::query_as::<_, HttpCheck>(&format!(
                "DELETE FROM http_checks WHERE id = $1 RETURNING {SELECT_COLUMNS}"
            ))
            .bind(id)
            .fetch_optional(&pool)
            .await?;

            deleted.ok_or_else(|| not_found(id))
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        let health: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await?;

        if health == 1 {
            Ok(())
        } else {
            Err(HttpCheckError::StoreUnavailable(format!(
                "unexpected liveness reply: {health}"
            )))
        }
    }
}

#[async_trait]
impl<T: HttpCheckRepository + ?Sized> HttpCheckRepository for std::sync::Arc<T> {
    async fn get_all(&self) -> Result<Vec<HttpCheck>> {
        (**self).get_all().await
    }

    async fn get_by_id(&self, id: Uuid, ctx: &OperationContext) -> Result<Option<HttpCheck>> {
        (**self).get_by_id(id, ctx).await
    }

    async fn create(
        &self,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        (**self).create(definition, ctx).await
    }

    async fn update(
        &self,
        id: Uuid,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        (**self).update(id, definition, ctx).await
    }

    async fn delete(&self, id: Uuid, ctx: &OperationContext) -> Result<HttpCheck> {
        (**self).delete(id, ctx).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}
