//! logger.rs
//! Configuración del logger usando env_logger.

/// Filtro por defecto: info para el servicio, sqlx solo avisos
/// (si no, cada query del lote sale en el log).
const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// `RUST_LOG` manda cuando viene con algo; si no, `DEFAULT_FILTER`.
pub fn default_filter(rust_log: Option<String>) -> String {
    rust_log
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

pub fn init_logger() {
    let filter = default_filter(std::env::var("RUST_LOG").ok());

    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    log::debug!("(init_logger) Filtro de log: {}", filter);
}
