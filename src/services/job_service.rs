use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::job_model::{JobRecord, JobStatus, ListJobsResponse};

/// Timestamp con precisión fija: el orden lexicográfico coincide con el cronológico.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: String,
    filename: String,
    total_contacts: i64,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<JobRow> for JobRecord {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(JobRecord {
            id: row.id,
            filename: row.filename,
            total_contacts: row.total_contacts,
            status: row.status.parse()?,
            created_at: row.created_at.parse()?,
            updated_at: row.updated_at.parse()?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct JobService {
    db_pool: Pool<Sqlite>,
}

impl JobService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        JobService { db_pool }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Fallo al correr migraciones de jobs/sending_logs")?;
        Ok(())
    }

    /// Crea el job con el estado inicial indicado y devuelve su id.
    pub async fn create_job(
        &self,
        filename: &str,
        total_contacts: i64,
        status: JobStatus,
    ) -> Result<String, StoreError> {
        let job_id = Uuid::new_v4().to_string();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO jobs (id, filename, total_contacts, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&job_id)
        .bind(filename)
        .bind(total_contacts)
        .bind(status.as_str())
        .bind(&now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar job")?;

        Ok(job_id)
    }

    pub async fn get_job(&self, job_id: &str) -> Result<JobRecord, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, filename, total_contacts, status, created_at, updated_at
            FROM jobs
            WHERE id = ?1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al consultar job")?;

        match row {
            Some(row) => Ok(JobRecord::try_from(row)?),
            None => Err(StoreError::NotFound {
                entity: "job",
                id: job_id.to_string(),
            }),
        }
    }

    /// Avanza el estado del job. Un estado de menor rango que el actual se rechaza.
    pub async fn advance_status(&self, job_id: &str, new_status: JobStatus) -> Result<(), StoreError> {
        let now = now_timestamp();
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = ?2,
                updated_at = ?3
            WHERE id = ?1
              AND (CASE status
                    WHEN 'pending' THEN 0
                    WHEN 'processing' THEN 1
                    ELSE 2
                   END) <= ?4
            "#,
        )
        .bind(job_id)
        .bind(new_status.as_str())
        .bind(&now)
        .bind(new_status.rank())
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar estado del job")?;

        if result.rows_affected() == 0 {
            // Distinguir "no existe" de "transición inválida"
            self.get_job(job_id).await?;
            return Err(StoreError::InvalidTransition {
                entity: "job",
                id: job_id.to_string(),
                to: new_status.to_string(),
            });
        }
        Ok(())
    }

    /// Lista jobs con paginación, más recientes primero
    pub async fn list_jobs(&self, page: u64, page_size: u64) -> Result<ListJobsResponse, StoreError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        let offset = ((page - 1) * page_size) as i64;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.db_pool)
            .await
            .context("Fallo al contar jobs")?;

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, filename, total_contacts, status, created_at, updated_at
            FROM jobs
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar jobs")?;

        let items = rows
            .into_iter()
            .map(JobRecord::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(ListJobsResponse {
            total: total as u64,
            page,
            page_size,
            items,
        })
    }
}
