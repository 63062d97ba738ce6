use std::sync::Arc;
use std::time::Duration;

use httpcheck::models::HttpCheckDefinition;
use httpcheck::service::HttpCheckService;
use httpcheck::web::{create_app, AppState};

use super::fakes::{InMemoryRepository, Journal, RecordingResourceStore};

/// A definition that passes validation.
pub fn definition(name: &str) -> HttpCheckDefinition {
    HttpCheckDefinition {
        name: name.to_string(),
        uri: "https://example.com/health".to_string(),
        is_paused: false,
        num_retries: 3,
        uptime_sla: 99,
        response_time_sla: 500,
        use_ssl: true,
        response_status_code: 200,
        check_interval_in_seconds: 60,
    }
}

/// Both fakes sharing one journal, plus the coordinator over them.
pub struct Harness {
    pub journal: Journal,
    pub repository: InMemoryRepository,
    pub resources: RecordingResourceStore,
    pub service: HttpCheckService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_repository_latency(Duration::ZERO)
    }

    pub fn with_repository_latency(latency: Duration) -> Self {
        let journal = Journal::default();
        let repository = InMemoryRepository::new(journal.clone()).with_latency(latency);
        let resources = RecordingResourceStore::new(journal.clone());
        let service = HttpCheckService::new(
            Arc::new(repository.clone()),
            Arc::new(resources.clone()),
        );

        Self {
            journal,
            repository,
            resources,
            service,
        }
    }

    pub fn router(&self, request_timeout: Duration) -> axum::Router {
        create_app(AppState::new(self.service.clone(), request_timeout))
    }
}
