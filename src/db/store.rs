use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    models::{CheckIn, Contract, Job, JobInstanceDraft, JobSite},
    AppResult,
};

/// Read access to contracts and the employee directory, scoped per organization
#[async_trait]
pub trait ContractStore: Send + Sync {
    async fn find_contract(&self, organization_id: i32, contract_id: i32) -> AppResult<Option<Contract>>;

    /// The subset of `employee_ids` that does not exist in the organization
    async fn missing_employees(&self, organization_id: i32, employee_ids: &[i32]) -> AppResult<Vec<i32>>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Scheduled and in-progress jobs of `employee_ids` that start before `to`
    /// and have not ended by `from`
    async fn committed_jobs(
        &self,
        organization_id: i32,
        employee_ids: &[i32],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Job>>;

    /// Insert every draft in a single transaction. Drafts whose idempotency
    /// key is already stored are skipped; only newly inserted jobs are
    /// returned.
    async fn insert_drafts(&self, organization_id: i32, drafts: &[JobInstanceDraft]) -> AppResult<Vec<Job>>;

    async fn find_job_site(&self, organization_id: i32, job_id: Uuid) -> AppResult<Option<JobSite>>;

    /// Store the check-in and move the job from scheduled to in progress
    async fn record_check_in(&self, organization_id: i32, check_in: &CheckIn) -> AppResult<Job>;

    async fn ping(&self) -> AppResult<()>;
}
