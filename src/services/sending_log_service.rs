use anyhow::Context;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::sending_log_model::{LogStatus, NewSendingLog, SendingLogRecord};
use crate::services::job_service::now_timestamp;

#[derive(sqlx::FromRow)]
struct SendingLogRow {
    id: String,
    job_id: String,
    contact_name: String,
    phone_number: String,
    message_text: String,
    status: String,
    error_message: Option<String>,
    sent_at: Option<String>,
    created_at: String,
}

impl TryFrom<SendingLogRow> for SendingLogRecord {
    type Error = anyhow::Error;

    fn try_from(row: SendingLogRow) -> Result<Self, Self::Error> {
        Ok(SendingLogRecord {
            id: row.id,
            job_id: row.job_id,
            contact_name: row.contact_name,
            phone_number: row.phone_number,
            message_text: row.message_text,
            status: row.status.parse()?,
            error_message: row.error_message,
            sent_at: row.sent_at.map(|s| s.parse()).transpose()?,
            created_at: row.created_at.parse()?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct SendingLogService {
    db_pool: Pool<Sqlite>,
}

impl SendingLogService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SendingLogService { db_pool }
    }

    /// Inserta el log en `sending`, justo antes de llamar al gateway.
    pub async fn create_sending(&self, entry: &NewSendingLog) -> Result<String, StoreError> {
        let log_id = Uuid::new_v4().to_string();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO sending_logs (
                id, job_id, contact_name, phone_number, message_text,
                status, error_message, sent_at, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, ?7)
            "#,
        )
        .bind(&log_id)
        .bind(&entry.job_id)
        .bind(&entry.contact_name)
        .bind(&entry.phone_number)
        .bind(&entry.message_text)
        .bind(LogStatus::Sending.as_str())
        .bind(&now)
        .execute(&self.db_pool)
        .await
        .context("Error creando sending_log")?;

        Ok(log_id)
    }

    pub async fn mark_sent(&self, log_id: &str) -> Result<(), StoreError> {
        self.finish(log_id, LogStatus::Sent, None).await
    }

    pub async fn mark_error(&self, log_id: &str, error_message: &str) -> Result<(), StoreError> {
        self.finish(log_id, LogStatus::Error, Some(error_message))
            .await
    }

    /// Solo un log en `sending` puede pasar a un estado terminal.
    async fn finish(
        &self,
        log_id: &str,
        status: LogStatus,
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        let sent_at = (status == LogStatus::Sent).then(now_timestamp);

        let result = sqlx::query(
            r#"
            UPDATE sending_logs
            SET status = ?2,
                error_message = ?3,
                sent_at = ?4
            WHERE id = ?1
              AND status = 'sending'
            "#,
        )
        .bind(log_id)
        .bind(status.as_str())
        .bind(error_message)
        .bind(sent_at)
        .execute(&self.db_pool)
        .await
        .context("Error actualizando sending_log")?;

        if result.rows_affected() == 0 {
            let exists: Option<String> =
                sqlx::query_scalar("SELECT id FROM sending_logs WHERE id = ?1")
                    .bind(log_id)
                    .fetch_optional(&self.db_pool)
                    .await
                    .context("Error consultando sending_log")?;
            return Err(match exists {
                Some(_) => StoreError::InvalidTransition {
                    entity: "sending_log",
                    id: log_id.to_string(),
                    to: status.to_string(),
                },
                None => StoreError::NotFound {
                    entity: "sending_log",
                    id: log_id.to_string(),
                },
            });
        }
        Ok(())
    }

    /// Logs del job en orden de creación (ascendente).
    pub async fn list_for_job(&self, job_id: &str) -> Result<Vec<SendingLogRecord>, StoreError> {
        let rows = sqlx::query_as::<_, SendingLogRow>(
            r#"
            SELECT id, job_id, contact_name, phone_number, message_text,
                   status, error_message, sent_at, created_at
            FROM sending_logs
            WHERE job_id = ?1
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.db_pool)
        .await
        .context("Error listando sending_logs")?;

        let logs = rows
            .into_iter()
            .map(SendingLogRecord::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(logs)
    }
}
