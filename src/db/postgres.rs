use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use super::{ContractStore, JobStore};
use crate::{
    models::{CheckIn, Contract, Job, JobInstanceDraft, JobSite},
    AppError, AppResult,
};

const JOB_COLUMNS: &str = r#"
    id,
    organization_id,
    contract_id,
    assigned_employee_id,
    scheduled_for,
    scheduled_end,
    duration_minutes,
    tasks,
    status,
    created_at
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContractStore for PgStore {
    async fn find_contract(&self, organization_id: i32, contract_id: i32) -> AppResult<Option<Contract>> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            SELECT
                id,
                organization_id,
                name,
                status,
                start_date,
                end_date,
                schedule_days,
                employee_ids
            FROM "Contracts"
            WHERE organization_id = $1 AND id = $2
            "#,
        )
        .bind(organization_id)
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contract)
    }

    async fn missing_employees(&self, organization_id: i32, employee_ids: &[i32]) -> AppResult<Vec<i32>> {
        if employee_ids.is_empty() {
            return Ok(vec![]);
        }

        let found: HashSet<i32> = sqlx::query_scalar::<_, i32>(
            r#"SELECT id FROM "Employees" WHERE organization_id = $1 AND id = ANY($2)"#,
        )
        .bind(organization_id)
        .bind(employee_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        Ok(employee_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect())
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn committed_jobs(
        &self,
        organization_id: i32,
        employee_ids: &[i32],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Job>> {
        if employee_ids.is_empty() {
            return Ok(vec![]);
        }

        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM "Jobs"
            WHERE organization_id = $1
              AND assigned_employee_id = ANY($2)
              AND status IN ('scheduled', 'in_progress')
              AND scheduled_for < $4
              AND COALESCE(
                    scheduled_end,
                    scheduled_for + make_interval(mins => CASE WHEN duration_minutes > 0 THEN duration_minutes ELSE 60 END)
                  ) > $3
            ORDER BY scheduled_for
            "#
        );

        let jobs = sqlx::query_as::<_, Job>(&sql)
            .bind(organization_id)
            .bind(employee_ids)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(jobs)
    }

    async fn insert_drafts(&self, organization_id: i32, drafts: &[JobInstanceDraft]) -> AppResult<Vec<Job>> {
        let sql = format!(
            r#"
            INSERT INTO "Jobs" (
                id, organization_id, contract_id, customer_id, assigned_employee_id,
                scheduled_for, scheduled_end, duration_minutes, tasks, status, idempotency_key
            )
            VALUES (
                $1, $2, $3, (SELECT customer_id FROM "Contracts" WHERE id = $3), $4,
                $5, $6, $7, $8, 'scheduled', $9
            )
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING {JOB_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let duration_minutes = i32::try_from(draft.duration_minutes())
                .map_err(|_| AppError::Validation("Job duration is too long".to_string()))?;

            let job = sqlx::query_as::<_, Job>(&sql)
                .bind(Uuid::new_v4())
                .bind(organization_id)
                .bind(draft.source_contract_id)
                .bind(draft.assigned_employee_id)
                .bind(draft.scheduled_for)
                .bind(draft.scheduled_end)
                .bind(duration_minutes)
                .bind(&draft.tasks)
                .bind(draft.idempotency_key())
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(job) = job {
                inserted.push(job);
            }
        }

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, organization_id, "Failed to commit generated jobs");
            AppError::Internal(format!("Failed to commit generated jobs: {}", e))
        })?;

        Ok(inserted)
    }

    async fn find_job_site(&self, organization_id: i32, job_id: Uuid) -> AppResult<Option<JobSite>> {
        let site = sqlx::query_as::<_, JobSite>(
            r#"
            SELECT
                j.id,
                j.organization_id,
                j.contract_id,
                j.assigned_employee_id,
                j.scheduled_for,
                j.scheduled_end,
                j.duration_minutes,
                j.tasks,
                j.status,
                j.created_at,
                c.latitude AS site_latitude,
                c.longitude AS site_longitude
            FROM "Jobs" j
            LEFT JOIN "Customers" c ON c.id = j.customer_id
            WHERE j.organization_id = $1 AND j.id = $2
            "#,
        )
        .bind(organization_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(site)
    }

    async fn record_check_in(&self, organization_id: i32, check_in: &CheckIn) -> AppResult<Job> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE "Jobs"
            SET status = 'in_progress'
            WHERE organization_id = $1 AND id = $2 AND status = 'scheduled'
            RETURNING {JOB_COLUMNS}
            "#
        );

        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(organization_id)
            .bind(check_in.job_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!("Job {} is no longer scheduled", check_in.job_id))
            })?;

        sqlx::query(
            r#"
            INSERT INTO "JobCheckIns" (
                id, job_id, employee_id, latitude, longitude,
                distance_meters, verified, checked_in_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(check_in.id)
        .bind(check_in.job_id)
        .bind(check_in.employee_id)
        .bind(check_in.latitude)
        .bind(check_in.longitude)
        .bind(check_in.distance_meters)
        .bind(check_in.verified)
        .bind(check_in.checked_in_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(job)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
