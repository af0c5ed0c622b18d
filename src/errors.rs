//! errors.rs
//! Errores visibles para quien llama. Los fallos por contacto (gateway,
//! errores inesperados) no pasan por aquí: quedan como estado del log.

use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;

/// Fallos del almacén de jobs/logs
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid status transition for {entity} {id}: to '{to}'")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        to: String,
    },

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(anyhow::Error::new(e))
    }
}

/// Fallos que abortan una petición de envío antes de empezar el lote
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(#[source] StoreError),
}

impl From<StoreError> for DispatchError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id, .. } => DispatchError::JobNotFound(id),
            other => DispatchError::Persistence(other),
        }
    }
}

impl DispatchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
            DispatchError::JobNotFound(_) => StatusCode::NOT_FOUND,
            DispatchError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl StoreError {
    pub fn to_response(&self) -> HttpResponse {
        let status = match self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
            StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}
