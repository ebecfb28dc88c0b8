use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod forms;
pub mod handlers;
pub mod job;
pub mod ledger;
pub mod metrics;
pub mod storage;

use crate::config::WorkerConfig;
use crate::forms::CategoryLabels;
use crate::job::{JobOrchestrator, JobQueue, PostgrestStatusRecorder};
use crate::ledger::PostgrestTransactionStore;
use crate::storage::SupabaseStorage;

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Shared state of the HTTP boundary.
pub struct AppState {
    pub queue: JobQueue,
    pub auth_token: Option<String>,
}

impl AppState {
    pub fn new(queue: JobQueue, auth_token: Option<String>) -> Self {
        Self { queue, auth_token }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::generate_form, handlers::health),
    components(schemas(job::FormJobRequest, handlers::StatusResponse, ErrorResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Forms", description = "Asynchronous tax form generation."),
        (name = "Health", description = "Liveness probe.")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Wire the collaborators, start the worker pool and serve until shutdown.
///
/// Jobs still queued when the server stops are finished before returning.
pub async fn run(config: WorkerConfig) -> std::io::Result<()> {
    let http_client = reqwest::Client::builder()
        .pool_idle_timeout(std::time::Duration::from_secs(900))
        .user_agent("taxform-worker/1.0")
        .build()
        .map_err(std::io::Error::other)?;

    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::new(PostgrestTransactionStore::new(&config.supabase)),
        Arc::new(SupabaseStorage::new(config.supabase.clone(), http_client)),
        Arc::new(PostgrestStatusRecorder::new(&config.supabase)),
        Arc::new(CategoryLabels::default()),
    ));

    let (queue, workers) =
        JobQueue::start(orchestrator, config.worker_count, config.queue_capacity);
    let app_state = web::Data::new(AppState::new(queue, config.auth_token.clone()));

    log::info!(
        "Starting server at http://{}:{}",
        config.bind_address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(handlers::config)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    log::info!("Server stopped, waiting for queued jobs to finish");
    workers.join().await;
    Ok(())
}
