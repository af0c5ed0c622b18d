//! services/progress_service.rs
//! Consulta de solo lectura para el cliente que hace polling de un job.

use crate::{
    errors::StoreError,
    models::job_model::JobStatus,
    models::sending_log_model::{
        LogStatus, ProgressCounts, ProgressEntry, ProgressSummary, SendingLogRecord,
    },
    services::{job_service::JobService, sending_log_service::SendingLogService},
};

#[derive(Clone, Debug)]
pub struct ProgressService {
    job_service: JobService,
    log_service: SendingLogService,
}

impl ProgressService {
    pub fn new(job_service: JobService, log_service: SendingLogService) -> Self {
        Self {
            job_service,
            log_service,
        }
    }

    /// Logs del job, en orden de creación
    pub async fn fetch_progress(&self, job_id: &str) -> Result<Vec<SendingLogRecord>, StoreError> {
        self.log_service.list_for_job(job_id).await
    }

    pub async fn summarize(&self, job_id: &str) -> Result<ProgressSummary, StoreError> {
        let job = self.job_service.get_job(job_id).await?;
        let logs = self.fetch_progress(job_id).await?;
        let counts = count_statuses(&logs);

        // Entre contactos (durante la pausa) no hay nada en sending; por eso
        // también se exige que el job esté completed.
        let finished = job.status == JobStatus::Completed
            && logs.iter().all(|log| log.status.is_terminal());

        Ok(ProgressSummary {
            job_id: job.id,
            job_status: job.status,
            finished,
            counts,
            entries: logs
                .into_iter()
                .map(|log| ProgressEntry {
                    display_status: log.status.display_status(),
                    log,
                })
                .collect(),
        })
    }
}

pub fn count_statuses(logs: &[SendingLogRecord]) -> ProgressCounts {
    let mut counts = ProgressCounts {
        total: logs.len() as u64,
        ..Default::default()
    };
    for log in logs {
        match log.status {
            LogStatus::Sent => counts.sent += 1,
            LogStatus::Error => counts.error += 1,
            LogStatus::Pending | LogStatus::Sending => counts.pending += 1,
        }
    }
    counts
}
