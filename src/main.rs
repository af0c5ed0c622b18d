use std::{path::Path, sync::Arc};

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::config::app_config::{DispatchConfig, ServerConfig};
use crate::logger::init_logger;
use crate::services::dispatch_service::DispatchService;
use crate::services::gateway_service::HttpGateway;
use crate::services::job_service::JobService;
use crate::services::progress_service::ProgressService;
use crate::services::sending_log_service::SendingLogService;

mod app;
mod config;
mod errors;
mod handlers;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

async fn setup_database(database_path: &str) -> anyhow::Result<Pool<Sqlite>> {
    // La carpeta de la base tiene que existir antes de abrirla
    if let Some(parent) = Path::new(database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("No se pudo crear directorio {:?}", parent))?;
        }
    }

    log::info!("Conectando a SQLite en {}", database_path);

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("No se pudo conectar a la base de datos SQLite")?;

    Ok(db_pool)
}

async fn build_services(
    db_pool: Pool<Sqlite>,
    dispatch_config: DispatchConfig,
) -> anyhow::Result<(JobService, ProgressService, DispatchService)> {
    let job_service = JobService::new(db_pool.clone());
    job_service
        .run_migrations()
        .await
        .context("Fallo en migraciones")?;

    let log_service = SendingLogService::new(db_pool);
    let progress_service = ProgressService::new(job_service.clone(), log_service.clone());

    let gateway = HttpGateway::new(
        &dispatch_config.gateway_base_url,
        dispatch_config.gateway_timeout(),
    )?;
    let dispatch_service = DispatchService::new(
        job_service.clone(),
        log_service,
        Arc::new(gateway),
        dispatch_config,
    )?;

    Ok((job_service, progress_service, dispatch_service))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let server_config = ServerConfig::from_env();
    let dispatch_config = DispatchConfig::from_env();
    log::info!(
        "Gateway={} prefijo={} pausa={}ms",
        dispatch_config.gateway_base_url,
        dispatch_config.country_prefix,
        dispatch_config.pacing_interval_ms
    );

    let db_pool = setup_database(&server_config.database_path)
        .await
        .map_err(std::io::Error::other)?;

    let (job_service, progress_service, dispatch_service) =
        build_services(db_pool, dispatch_config)
            .await
            .map_err(std::io::Error::other)?;

    log::info!(
        "Levantando servidor en {}:{}",
        server_config.host,
        server_config.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(job_service.clone()))
            .app_data(web::Data::new(progress_service.clone()))
            .app_data(web::Data::new(dispatch_service.clone()))
            .configure(app::init_app)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await
}
