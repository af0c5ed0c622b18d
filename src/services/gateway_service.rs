//! services/gateway_service.rs
//! Cliente HTTP del gateway de WhatsApp (API estilo Evolution).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::models::dispatch_model::GatewayCredentials;

/// Resultado de un único envío. Un intento = un resultado; aquí no se reintenta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent {
        status: u16,
    },
    Failed {
        /// None si ni siquiera hubo respuesta HTTP
        status: Option<u16>,
        detail: String,
    },
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }

    /// Texto de diagnóstico que se guarda en `error_message`
    pub fn error_message(&self) -> Option<String> {
        match self {
            SendOutcome::Sent { .. } => None,
            SendOutcome::Failed {
                status: Some(code),
                detail,
            } => Some(format!("Gateway error ({}): {}", code, detail)),
            SendOutcome::Failed {
                status: None,
                detail,
            } => Some(format!("Gateway transport error: {}", detail)),
        }
    }
}

#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send_text(
        &self,
        credentials: &GatewayCredentials,
        phone: &str,
        text: &str,
    ) -> SendOutcome;
}

#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    http_client: Client,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("No se pudo construir el cliente HTTP del gateway")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn send_text_url(&self, instance: &str) -> String {
        format!(
            "{}/message/sendText/{}",
            self.base_url,
            urlencoding::encode(instance)
        )
    }
}

#[async_trait]
impl MessageGateway for HttpGateway {
    async fn send_text(
        &self,
        credentials: &GatewayCredentials,
        phone: &str,
        text: &str,
    ) -> SendOutcome {
        let url = self.send_text_url(&credentials.instance);
        log::info!(
            "(send_text) POST {} number={} token={}",
            url,
            phone,
            credentials.masked_key()
        );

        let payload = json!({
            "number": phone,
            "text": text,
        });

        // `.json()` ya pone Content-Type: application/json
        let response = match self
            .http_client
            .post(&url)
            .header("apikey", &credentials.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                log::error!("(send_text) Fallo de transporte hacia el gateway: {}", e);
                return SendOutcome::Failed {
                    status: None,
                    detail: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<no se pudo leer el body: {}>", e),
        };
        log::info!("(send_text) Status={} body='{}'", status, body);

        if status.is_success() {
            SendOutcome::Sent {
                status: status.as_u16(),
            }
        } else {
            SendOutcome::Failed {
                status: Some(status.as_u16()),
                detail: body,
            }
        }
    }
}
