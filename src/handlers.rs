//! HTTP boundary of the worker.
//!
//! Accepts form jobs and hands them to the job queue; everything after
//! acceptance is reported through the job status record only.

use actix_web::error::InternalError;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::job::{FormJobRequest, JobDescriptor, QueueError};
use crate::{metrics, AppState, ErrorResponse};

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

/// Extract token from Authorization header
fn extract_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
}

fn is_authorized(req: &HttpRequest, state: &AppState) -> bool {
    match &state.auth_token {
        Some(expected) => extract_token(req) == Some(expected.as_str()),
        None => true,
    }
}

#[utoipa::path(
    post,
    path = "/generate-form",
    tag = "Forms",
    request_body = FormJobRequest,
    responses(
        (status = 202, description = "Job accepted for processing", body = StatusResponse),
        (status = 400, description = "Malformed job request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 503, description = "Job queue is full", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<FormJobRequest>,
) -> impl Responder {
    if !is_authorized(&req, &state) {
        log::warn!("Rejected form request with missing or invalid token");
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("Unauthorized", "Invalid or missing bearer token"));
    }

    let request = body.into_inner();
    if let Err(e) = request.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e));
    }

    let job = JobDescriptor::from(request);
    let job_id = job.job_id.clone();
    match state.queue.try_enqueue(job) {
        Ok(()) => {
            log::info!("Job {} accepted", job_id);
            HttpResponse::Accepted().json(StatusResponse::new("processing"))
        }
        Err(QueueError::Full) => {
            log::warn!("Job {} rejected: queue is full", job_id);
            metrics::record_rejected_job();
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "ServiceUnavailable",
                "Form queue is full, retry later",
            ))
        }
        Err(QueueError::Closed) => {
            log::error!("Job {} rejected: queue is closed", job_id);
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "ServiceUnavailable",
                "Worker is shutting down",
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Worker is alive", body = StatusResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse::new("healthy"))
}

pub async fn metrics_handler() -> impl Responder {
    match metrics::render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::new(
        "MethodNotAllowed",
        "Method not allowed",
    ))
}

/// Reject unparsable job bodies with a JSON 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("Invalid form request: {}", message);
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
        )
        .into()
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/generate-form")
            .app_data(json_config())
            .route(web::post().to(generate_form))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/health")
            .route(web::get().to(health))
            .default_service(web::to(method_not_allowed)),
    )
    .service(web::resource("/metrics").route(web::get().to(metrics_handler)));
}
