//! handlers/dispatch_handler.rs
use actix_web::{web, HttpResponse};

use crate::{
    models::dispatch_model::{DispatchRequest, DispatchResponse},
    services::dispatch_service::DispatchService,
};

/// POST /api/dispatch
/// Acepta el lote y responde sin esperar los envíos.
pub async fn dispatch_endpoint(
    dispatch_service: web::Data<DispatchService>,
    body: web::Json<DispatchRequest>,
) -> HttpResponse {
    let req = body.into_inner();
    let total = req.contacts.len();

    match dispatch_service.start(req).await {
        Ok(accepted) => HttpResponse::Ok().json(DispatchResponse {
            success: accepted.accepted,
            message: format!("Dispatch started for {} contacts", total),
            job_id: accepted.job_id,
        }),
        Err(e) => {
            log::error!("(dispatch_endpoint) Envío rechazado: {}", e);
            e.to_response()
        }
    }
}
