//! services/dispatch_service.rs
//! Procesador de lotes: recorre los contactos uno a uno, envía por el gateway
//! y deja el resultado de cada contacto en `sending_logs`.

use std::sync::Arc;

use crate::{
    config::app_config::DispatchConfig,
    errors::{DispatchError, StoreError},
    models::{
        dispatch_model::{Contact, DispatchAccepted, DispatchRequest, GatewayCredentials},
        job_model::JobStatus,
        sending_log_model::NewSendingLog,
    },
    services::{
        gateway_service::MessageGateway, job_service::JobService,
        phone_normalizer::normalize_phone, sending_log_service::SendingLogService,
        template_renderer::TemplateRenderer,
    },
};

/// Etiqueta de los jobs creados directamente por un envío (sin CSV previo)
pub const DIRECT_DISPATCH_LABEL: &str = "envio_direto.csv";

/// Lo que pasó con un contacto que sí llegó a procesarse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Sent,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub sent: usize,
    pub failed: usize,
    /// Sin teléfono, o sin log inicial
    pub skipped: usize,
}

#[derive(Clone)]
pub struct DispatchService {
    job_service: JobService,
    log_service: SendingLogService,
    gateway: Arc<dyn MessageGateway>,
    renderer: TemplateRenderer,
    config: DispatchConfig,
}

impl DispatchService {
    pub fn new(
        job_service: JobService,
        log_service: SendingLogService,
        gateway: Arc<dyn MessageGateway>,
        config: DispatchConfig,
    ) -> anyhow::Result<Self> {
        let renderer =
            TemplateRenderer::new(&config.name_placeholder, &config.fallback_contact_name)?;
        Ok(Self {
            job_service,
            log_service,
            gateway,
            renderer,
            config,
        })
    }

    /// Valida, crea o reutiliza el job y lanza el lote en segundo plano.
    /// Retorna en cuanto el job existe, sin esperar ningún envío.
    pub async fn start(&self, req: DispatchRequest) -> Result<DispatchAccepted, DispatchError> {
        let credentials = validate_credentials(&req)?;

        // Contactos sin teléfono no invalidan el lote: se omiten al procesar
        if req.contacts.is_empty() {
            return Err(DispatchError::Validation(
                "Contact batch is empty".to_string(),
            ));
        }

        let template = if req.message.trim().is_empty() {
            self.config.default_message.clone()
        } else {
            req.message.clone()
        };

        let job_id = self
            .resolve_job(req.job_id.as_deref(), req.contacts.len())
            .await?;

        log::info!(
            "(start) Job {} aceptado: {} contactos, instancia='{}'",
            job_id,
            req.contacts.len(),
            credentials.instance
        );

        let service = self.clone();
        let job_id_clone = job_id.clone();
        let contacts = req.contacts;
        tokio::spawn(async move {
            if let Err(e) = service
                .run_batch(&job_id_clone, &contacts, &template, &credentials)
                .await
            {
                log::error!(
                    "(start) El lote {} terminó sin poder marcarse completed: {:?}",
                    job_id_clone,
                    e
                );
            }
        });

        Ok(DispatchAccepted {
            job_id,
            accepted: true,
        })
    }

    async fn resolve_job(
        &self,
        job_id: Option<&str>,
        total_contacts: usize,
    ) -> Result<String, DispatchError> {
        match job_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                // Se reutiliza tal cual; su estado es el que dejó quien lo creó
                let job = self.job_service.get_job(id).await?;
                log::info!("(resolve_job) Reutilizando job {} ({})", job.id, job.status);
                Ok(job.id)
            }
            None => {
                let id = self
                    .job_service
                    .create_job(
                        DIRECT_DISPATCH_LABEL,
                        total_contacts as i64,
                        JobStatus::Processing,
                    )
                    .await?;
                log::info!("(resolve_job) Job {} creado en processing", id);
                Ok(id)
            }
        }
    }

    /// Procesa el lote completo, en orden y de a un contacto.
    /// Solo falla si no se puede marcar el job como completed.
    pub async fn run_batch(
        &self,
        job_id: &str,
        contacts: &[Contact],
        template: &str,
        credentials: &GatewayCredentials,
    ) -> Result<BatchReport, StoreError> {
        let pacing = self.config.pacing_interval();
        let mut report = BatchReport::default();

        log::info!(
            "(run_batch) Iniciando job {} con {} contactos",
            job_id,
            contacts.len()
        );

        for contact in contacts {
            if !contact.has_phone() {
                log::info!(
                    "(run_batch) Contacto '{}' sin teléfono, se omite",
                    contact.name
                );
                report.skipped += 1;
                continue;
            }

            match self
                .process_contact(job_id, contact, template, credentials)
                .await
            {
                Ok(ContactOutcome::Sent) => report.sent += 1,
                Ok(ContactOutcome::Failed) => report.failed += 1,
                Err(e) => {
                    log::error!(
                        "(run_batch) No se pudo registrar el contacto '{}': {:?}",
                        contact.name,
                        e
                    );
                    report.skipped += 1;
                }
            }

            // Pausa fija tras cada contacto, haya ido bien o mal
            if !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
        }

        self.job_service
            .advance_status(job_id, JobStatus::Completed)
            .await?;

        log::info!(
            "(run_batch) Job {} completed: sent={} failed={} skipped={}",
            job_id,
            report.sent,
            report.failed,
            report.skipped
        );
        Ok(report)
    }

    /// Un contacto: log en `sending`, envío, y `sent`/`error`.
    /// `Err` solo si no se pudo crear el log inicial.
    async fn process_contact(
        &self,
        job_id: &str,
        contact: &Contact,
        template: &str,
        credentials: &GatewayCredentials,
    ) -> Result<ContactOutcome, StoreError> {
        let message_text = self.renderer.render_for(template, &contact.name);

        let log_id = self
            .log_service
            .create_sending(&NewSendingLog {
                job_id: job_id.to_string(),
                contact_name: contact.name.clone(),
                phone_number: contact.phone.clone(),
                message_text: message_text.clone(),
            })
            .await?;

        let phone = normalize_phone(&contact.phone, &self.config.country_prefix);
        log::info!(
            "(process_contact) Enviando a '{}' ({} -> {})",
            contact.name,
            contact.phone,
            phone
        );

        let outcome = self
            .gateway
            .send_text(credentials, &phone, &message_text)
            .await;

        let (result, contact_outcome) = if outcome.is_success() {
            (self.log_service.mark_sent(&log_id).await, ContactOutcome::Sent)
        } else {
            let msg = outcome.error_message().unwrap_or_default();
            log::warn!(
                "(process_contact) Fallo al enviar a '{}': {}",
                contact.name,
                msg
            );
            (
                self.log_service.mark_error(&log_id, &msg).await,
                ContactOutcome::Failed,
            )
        };

        if let Err(e) = result {
            log::error!(
                "(process_contact) No se pudo cerrar el log {}: {:?}",
                log_id,
                e
            );
            // Último intento de dejar el log en un estado terminal
            let fault = format!("Unexpected fault: {}", e);
            if let Err(e) = self.log_service.mark_error(&log_id, &fault).await {
                log::error!(
                    "(process_contact) El log {} queda en sending: {:?}",
                    log_id,
                    e
                );
            }
            return Ok(ContactOutcome::Failed);
        }

        Ok(contact_outcome)
    }
}

fn validate_credentials(req: &DispatchRequest) -> Result<GatewayCredentials, DispatchError> {
    let api_key = req.api_token.as_deref().map(str::trim).unwrap_or_default();
    let instance = req
        .instance_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();

    if api_key.is_empty() || instance.is_empty() {
        return Err(DispatchError::Validation(
            "apiToken and instanceName are required".to_string(),
        ));
    }

    Ok(GatewayCredentials {
        instance: instance.to_string(),
        api_key: api_key.to_string(),
    })
}
