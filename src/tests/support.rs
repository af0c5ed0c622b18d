//! tests/support.rs
//! Utilidades compartidas: base SQLite temporal y gateways de prueba.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tempfile::TempDir;
use tokio::sync::Notify;

use crate::{
    config::app_config::DispatchConfig,
    models::dispatch_model::{Contact, DispatchRequest, GatewayCredentials},
    services::{
        dispatch_service::DispatchService,
        gateway_service::{MessageGateway, SendOutcome},
        job_service::JobService,
        progress_service::ProgressService,
        sending_log_service::SendingLogService,
    },
};

/// Base en disco dentro de un directorio temporal; se borra al soltar `_dir`.
pub struct TestDb {
    pub pool: Pool<Sqlite>,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("dispatch_test.db"))
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .expect("Failed to open test database");

    JobService::new(pool.clone())
        .run_migrations()
        .await
        .expect("Failed to run migrations");

    TestDb { pool, _dir: dir }
}

pub fn test_config() -> DispatchConfig {
    DispatchConfig {
        pacing_interval_ms: 0,
        ..DispatchConfig::default()
    }
}

pub struct Services {
    pub jobs: JobService,
    pub logs: SendingLogService,
    pub progress: ProgressService,
    pub dispatch: DispatchService,
}

pub fn build_services(pool: &Pool<Sqlite>, gateway: Arc<dyn MessageGateway>) -> Services {
    build_services_with_config(pool, gateway, test_config())
}

pub fn build_services_with_config(
    pool: &Pool<Sqlite>,
    gateway: Arc<dyn MessageGateway>,
    config: DispatchConfig,
) -> Services {
    let jobs = JobService::new(pool.clone());
    let logs = SendingLogService::new(pool.clone());
    let progress = ProgressService::new(jobs.clone(), logs.clone());
    let dispatch = DispatchService::new(jobs.clone(), logs.clone(), gateway, config)
        .expect("Failed to build DispatchService");
    Services {
        jobs,
        logs,
        progress,
        dispatch,
    }
}

pub fn contact(name: &str, phone: &str) -> Contact {
    Contact {
        name: name.to_string(),
        phone: phone.to_string(),
    }
}

pub fn credentials() -> GatewayCredentials {
    GatewayCredentials {
        instance: "test-instance".to_string(),
        api_key: "secret-token".to_string(),
    }
}

pub fn dispatch_request(contacts: Vec<Contact>, message: &str) -> DispatchRequest {
    DispatchRequest {
        contacts,
        message: message.to_string(),
        job_id: None,
        api_token: Some("secret-token".to_string()),
        instance_name: Some("test-instance".to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCall {
    pub instance: String,
    pub phone: String,
    pub text: String,
}

/// Responde `Sent` salvo para los teléfonos con un fallo programado.
#[derive(Default)]
pub struct ScriptedGateway {
    calls: Mutex<Vec<SentCall>>,
    failures: HashMap<String, SendOutcome>,
}

impl ScriptedGateway {
    pub fn failing(failures: Vec<(&str, SendOutcome)>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: failures
                .into_iter()
                .map(|(phone, outcome)| (phone.to_string(), outcome))
                .collect(),
        }
    }

    pub fn calls(&self) -> Vec<SentCall> {
        self.calls.lock().expect("poisoned").clone()
    }
}

#[async_trait]
impl MessageGateway for ScriptedGateway {
    async fn send_text(
        &self,
        credentials: &GatewayCredentials,
        phone: &str,
        text: &str,
    ) -> SendOutcome {
        self.calls.lock().expect("poisoned").push(SentCall {
            instance: credentials.instance.clone(),
            phone: phone.to_string(),
            text: text.to_string(),
        });
        self.failures
            .get(phone)
            .cloned()
            .unwrap_or(SendOutcome::Sent { status: 200 })
    }
}

/// Bloquea el envío a `gated_phone` hasta que se abra la compuerta.
pub struct GatedGateway {
    pub gated_phone: String,
    pub gate: Arc<Notify>,
}

#[async_trait]
impl MessageGateway for GatedGateway {
    async fn send_text(
        &self,
        _credentials: &GatewayCredentials,
        phone: &str,
        _text: &str,
    ) -> SendOutcome {
        if phone == self.gated_phone {
            self.gate.notified().await;
        }
        SendOutcome::Sent { status: 201 }
    }
}
