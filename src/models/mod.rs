//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod dispatch_model;
pub mod job_model;
pub mod sending_log_model;
