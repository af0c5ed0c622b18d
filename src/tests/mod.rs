//! tests/mod.rs
//! Pruebas del servicio. Correr con `cargo test`.

mod support;
