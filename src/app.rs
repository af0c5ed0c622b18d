//! app.rs
use crate::handlers::{dispatch_handler, job_handler};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route(
                "/dispatch",
                web::post().to(dispatch_handler::dispatch_endpoint),
            )
            .service(
                web::scope("/jobs")
                    .route("", web::post().to(job_handler::create_job_endpoint))
                    .route("", web::get().to(job_handler::list_jobs_endpoint))
                    .route("/{id}", web::get().to(job_handler::get_job_endpoint))
                    .route("/{id}/logs", web::get().to(job_handler::job_logs_endpoint))
                    .route(
                        "/{id}/progress",
                        web::get().to(job_handler::job_progress_endpoint),
                    ),
            ),
    );
}
