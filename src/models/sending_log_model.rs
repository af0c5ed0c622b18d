//! models/sending_log_model.rs
//! Registro por contacto de cada intento de envío, y el resumen de progreso.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job_model::JobStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Pending,
    Sending,
    Sent,
    Error,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Pending => "pending",
            LogStatus::Sending => "sending",
            LogStatus::Sent => "sent",
            LogStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LogStatus::Sent | LogStatus::Error)
    }

    /// Estado que muestra la UI: sent -> success, error -> error, resto -> pending
    pub fn display_status(&self) -> &'static str {
        match self {
            LogStatus::Sent => "success",
            LogStatus::Error => "error",
            LogStatus::Pending | LogStatus::Sending => "pending",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LogStatus::Pending),
            "sending" => Ok(LogStatus::Sending),
            "sent" => Ok(LogStatus::Sent),
            "error" => Ok(LogStatus::Error),
            other => Err(anyhow::anyhow!("Estado de log desconocido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendingLogRecord {
    pub id: String,
    pub job_id: String,
    pub contact_name: String,
    pub phone_number: String, // tal como llegó, sin normalizar
    pub message_text: String, // ya renderizado
    pub status: LogStatus,
    pub error_message: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar un log en estado `sending`
#[derive(Debug, Clone)]
pub struct NewSendingLog {
    pub job_id: String,
    pub contact_name: String,
    pub phone_number: String,
    pub message_text: String,
}

/// Entrada tal como la consume el cliente que hace polling
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    #[serde(flatten)]
    pub log: SendingLogRecord,
    pub display_status: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressCounts {
    pub sent: u64,
    pub error: u64,
    pub pending: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub job_id: String,
    pub job_status: JobStatus,
    pub counts: ProgressCounts,
    /// Job completed y ninguna entrada en pending/sending
    pub finished: bool,
    pub entries: Vec<ProgressEntry>,
}
