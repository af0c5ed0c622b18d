//! models/dispatch_model.rs
//! Petición/respuesta del punto de entrada de envío masivo.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl Contact {
    pub fn has_phone(&self) -> bool {
        !self.phone.trim().is_empty()
    }
}

/// Credenciales del gateway, por petición. Nunca se guardan en el proceso.
#[derive(Clone)]
pub struct GatewayCredentials {
    pub instance: String,
    pub api_key: String,
}

impl GatewayCredentials {
    /// Solo los primeros caracteres del token, para logs
    pub fn masked_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(4).collect();
        format!("{}...", prefix)
    }
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("instance", &self.instance)
            .field("api_key", &self.masked_key())
            .finish()
    }
}

/// POST /api/dispatch
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub message: String,
    pub job_id: Option<String>,
    pub api_token: Option<String>,
    pub instance_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub success: bool,
    pub message: String,
    pub job_id: String,
}

/// Resultado interno de `DispatchService::start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchAccepted {
    pub job_id: String,
    pub accepted: bool,
}
