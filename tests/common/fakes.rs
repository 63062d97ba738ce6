//! In-memory stand-ins for both stores. Every call is appended to a shared
//! [`Journal`] so tests can assert cross-store ordering.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use httpcheck::config::ResourceConfig;
use httpcheck::database::HttpCheckRepository;
use httpcheck::error::{HttpCheckError, Result};
use httpcheck::execution::{run_detached, OperationContext};
use httpcheck::models::{HttpCheck, HttpCheckDefinition};
use httpcheck::resources::{CheckResource, CheckResourceStore};

/// Ordered record of store calls, e.g. `resource.create:site-a`, `db.create:site-a`.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

#[derive(Debug, Default)]
struct RepositoryState {
    rows: Vec<HttpCheck>,
    failures: HashMap<&'static str, HttpCheckError>,
}

/// Relational store fake with the same uniqueness and not-found rules as
/// the `http_checks` table.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    state: Arc<Mutex<RepositoryState>>,
    journal: Journal,
    latency: Duration,
    reachable: Arc<AtomicBool>,
    completed: Arc<Mutex<Vec<&'static str>>>,
}

impl InMemoryRepository {
    pub fn new(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal,
            latency: Duration::ZERO,
            reachable: Arc::new(AtomicBool::new(true)),
            completed: Arc::default(),
        }
    }

    /// Every data operation sleeps this long before touching state.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_on(&self, operation: &'static str, error: HttpCheckError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<HttpCheck> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn row_named(&self, name: &str) -> Option<HttpCheck> {
        self.rows().into_iter().find(|row| row.name == name)
    }

    /// Operations whose work ran to completion, including abandoned ones.
    pub fn completed(&self) -> Vec<&'static str> {
        self.completed.lock().unwrap().clone()
    }

    /// Insert a row directly, bypassing the journal.
    pub fn seed(&self, definition: &HttpCheckDefinition) -> HttpCheck {
        let row = new_row(definition);
        self.state.lock().unwrap().rows.push(row.clone());
        row
    }

    async fn run<T, F>(&self, operation: &'static str, apply: F) -> Result<T>
    where
        F: FnOnce(&mut RepositoryState) -> Result<T>,
    {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let outcome = {
            let mut state = self.state.lock().unwrap();
            match state.failures.get(operation).cloned() {
                Some(error) => Err(error),
                None => apply(&mut *state),
            }
        };
        self.completed.lock().unwrap().push(operation);
        outcome
    }
}

fn new_row(definition: &HttpCheckDefinition) -> HttpCheck {
    let now = Utc::now();
    HttpCheck {
        id: Uuid::new_v4(),
        name: definition.name.clone(),
        uri: definition.uri.clone(),
        is_paused: definition.is_paused,
        num_retries: definition.num_retries,
        uptime_sla: definition.uptime_sla,
        response_time_sla: definition.response_time_sla,
        use_ssl: definition.use_ssl,
        response_status_code: definition.response_status_code,
        check_interval_in_seconds: definition.check_interval_in_seconds,
        check_created: now,
        check_updated: now,
    }
}

fn not_found(id: Uuid) -> HttpCheckError {
    HttpCheckError::NotFound(format!("HTTP check {id} not found"))
}

#[async_trait]
impl HttpCheckRepository for InMemoryRepository {
    async fn get_all(&self) -> Result<Vec<HttpCheck>> {
        self.journal.push("db.get_all");
        self.run("get_all", |state| Ok(state.rows.clone())).await
    }

    async fn get_by_id(&self, id: Uuid, ctx: &OperationContext) -> Result<Option<HttpCheck>> {
        self.journal.push(format!("db.get_by_id:{id}"));
        let this = self.clone();
        run_detached("get_by_id", ctx, async move {
            this.run("get_by_id", |state| {
                Ok(state.rows.iter().find(|row| row.id == id).cloned())
            })
            .await
        })
        .await
    }

    async fn create(
        &self,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        self.journal.push(format!("db.create:{}", definition.name));
        let this = self.clone();
        let definition = definition.clone();
        run_detached("create", ctx, async move {
            this.run("create", |state| {
                if state.rows.iter().any(|row| row.name == definition.name) {
                    return Err(HttpCheckError::Conflict(format!(
                        "duplicate key value violates unique constraint \"http_checks_name_key\": {}",
                        definition.name
                    )));
                }
                let row = new_row(&definition);
                state.rows.push(row.clone());
                Ok(row)
            })
            .await
        })
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        definition: &HttpCheckDefinition,
        ctx: &OperationContext,
    ) -> Result<HttpCheck> {
        self.journal.push(format!("db.update:{}", definition.name));
        let this = self.clone();
        let definition = definition.clone();
        run_detached("update", ctx, async move {
            this.run("update", |state| {
                let row = state
                    .rows
                    .iter_mut()
                    .find(|row| row.id == id)
                    .ok_or_else(|| not_found(id))?;
                *row = row.merged_with(&definition);
                Ok(row.clone())
            })
            .await
        })
        .await
    }

    async fn delete(&self, id: Uuid, ctx: &OperationContext) -> Result<HttpCheck> {
        self.journal.push(format!("db.delete:{id}"));
        let this = self.clone();
        run_detached("delete", ctx, async move {
            this.run("delete", |state| {
                let position = state
                    .rows
                    .iter()
                    .position(|row| row.id == id)
                    .ok_or_else(|| not_found(id))?;
                Ok(state.rows.remove(position))
            })
            .await
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(HttpCheckError::StoreUnavailable(
                "connection refused".to_string(),
            ))
        }
    }
}

#[derive(Debug, Default)]
struct ResourceState {
    resources: HashMap<String, CheckResource>,
    next_version: u64,
    failures: HashMap<&'static str, HttpCheckError>,
}

/// Custom resource store fake keyed by resource name, with the API server's
/// create/update/delete status semantics.
#[derive(Debug, Clone)]
pub struct RecordingResourceStore {
    state: Arc<Mutex<ResourceState>>,
    journal: Journal,
    config: ResourceConfig,
}

impl RecordingResourceStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal,
            config: ResourceConfig::default(),
        }
    }

    pub fn fail_on(&self, operation: &'static str, error: HttpCheckError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    pub fn get(&self, name: &str) -> Option<CheckResource> {
        self.state.lock().unwrap().resources.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().resources.len()
    }

    /// Store a resource directly, bypassing the journal.
    pub fn seed(&self, check: &HttpCheck) {
        let mut state = self.state.lock().unwrap();
        state.next_version += 1;
        let resource = CheckResource::for_check(&self.config, check)
            .with_resource_version(state.next_version.to_string());
        state.resources.insert(check.name.clone(), resource);
    }

    fn apply<F>(&self, operation: &'static str, name: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut ResourceState) -> Result<()>,
    {
        self.journal.push(format!("resource.{operation}:{name}"));
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.failures.get(operation).cloned() {
            return Err(error);
        }
        mutate(&mut *state)
    }
}

#[async_trait]
impl CheckResourceStore for RecordingResourceStore {
    async fn create(&self, definition: &HttpCheckDefinition, ctx: &OperationContext) -> Result<()> {
        let resource = CheckResource::for_definition(&self.config, definition);
        ctx.bounded("resource_create", async {
            self.apply("create", &definition.name, |state| {
                if state.resources.contains_key(resource.name()) {
                    return Err(HttpCheckError::Conflict(format!(
                        "cronjobs \"{}\" already exists",
                        resource.name()
                    )));
                }
                state.next_version += 1;
                let stored = resource
                    .clone()
                    .with_resource_version(state.next_version.to_string());
                state.resources.insert(resource.name().to_string(), stored);
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, check: &HttpCheck, ctx: &OperationContext) -> Result<()> {
        ctx.bounded("resource_update", async {
            self.apply("update", &check.name, |state| {
                if !state.resources.contains_key(&check.name) {
                    return Err(HttpCheckError::NotFound(format!(
                        "cronjobs \"{}\" not found",
                        check.name
                    )));
                }
                state.next_version += 1;
                let stored = CheckResource::for_check(&self.config, check)
                    .with_resource_version(state.next_version.to_string());
                state.resources.insert(check.name.clone(), stored);
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, name: &str, ctx: &OperationContext) -> Result<()> {
        ctx.bounded("resource_delete", async {
            self.apply("delete", name, |state| {
                state
                    .resources
                    .remove(name)
                    .map(|_| ())
                    .ok_or_else(|| HttpCheckError::NotFound(format!("cronjobs \"{name}\" not found")))
            })
        })
        .await
    }
}
