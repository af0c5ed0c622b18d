//! config/mod.rs
//! Configuración tipada leída desde variables de entorno (.env incluido).

pub mod app_config;
