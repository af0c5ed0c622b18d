//! services/mod.rs
//! Módulo que agrupa las capas de negocio del servicio de envíos.

pub mod dispatch_service;
pub mod gateway_service;
pub mod job_service;
pub mod phone_normalizer;
pub mod progress_service;
pub mod sending_log_service;
pub mod template_renderer;
