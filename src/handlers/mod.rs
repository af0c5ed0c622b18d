//! handlers/mod.rs
pub mod dispatch_handler;
pub mod job_handler;
