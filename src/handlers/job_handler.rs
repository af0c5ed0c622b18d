//! handlers/job_handler.rs
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    models::job_model::{CreateJobRequest, CreateJobResponse, JobStatus},
    services::{job_service::JobService, progress_service::ProgressService},
};

#[derive(Deserialize)]
pub struct PaginationQuery {
    page: Option<u64>,
    page_size: Option<u64>,
}

/// POST /api/jobs
pub async fn create_job_endpoint(
    job_service: web::Data<JobService>,
    body: web::Json<CreateJobRequest>,
) -> HttpResponse {
    let req = body.into_inner();
    if req.filename.trim().is_empty() || req.total_contacts < 0 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "filename is required and totalContacts must be >= 0"
        }));
    }

    match job_service
        .create_job(req.filename.trim(), req.total_contacts, JobStatus::Pending)
        .await
    {
        Ok(id) => HttpResponse::Ok().json(CreateJobResponse {
            id,
            message: "Job created".to_string(),
        }),
        Err(e) => e.to_response(),
    }
}

/// GET /api/jobs
pub async fn list_jobs_endpoint(
    job_service: web::Data<JobService>,
    query: web::Query<PaginationQuery>,
) -> HttpResponse {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(10);

    match job_service.list_jobs(page, page_size).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => e.to_response(),
    }
}

/// GET /api/jobs/{id}
pub async fn get_job_endpoint(
    job_service: web::Data<JobService>,
    path: web::Path<String>,
) -> HttpResponse {
    match job_service.get_job(&path.into_inner()).await {
        Ok(job) => HttpResponse::Ok().json(job),
        Err(e) => e.to_response(),
    }
}

/// GET /api/jobs/{id}/logs
pub async fn job_logs_endpoint(
    progress_service: web::Data<ProgressService>,
    path: web::Path<String>,
) -> HttpResponse {
    match progress_service.fetch_progress(&path.into_inner()).await {
        Ok(logs) => HttpResponse::Ok().json(logs),
        Err(e) => e.to_response(),
    }
}

/// GET /api/jobs/{id}/progress
pub async fn job_progress_endpoint(
    progress_service: web::Data<ProgressService>,
    path: web::Path<String>,
) -> HttpResponse {
    match progress_service.summarize(&path.into_inner()).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => e.to_response(),
    }
}
