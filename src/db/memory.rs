use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use super::{ContractStore, JobStore};
use crate::{
    models::{CheckIn, Contract, Job, JobInstanceDraft, JobSite, JobStatus},
    AppError, AppResult,
};

/// In-process store backing handler tests
#[derive(Default)]
pub struct MemoryStore {
    contracts: Mutex<Vec<Contract>>,
    employees: Mutex<HashSet<(i32, i32)>>,
    jobs: Mutex<Vec<(Job, Option<String>)>>,
    sites: Mutex<HashMap<Uuid, (f64, f64)>>,
    check_ins: Mutex<Vec<CheckIn>>,
}

impl MemoryStore {
    pub fn add_contract(&self, contract: Contract) {
        self.contracts.lock().unwrap().push(contract);
    }

    pub fn add_employee(&self, organization_id: i32, employee_id: i32) {
        self.employees.lock().unwrap().insert((organization_id, employee_id));
    }

    pub fn add_job(&self, job: Job) {
        self.jobs.lock().unwrap().push((job, None));
    }

    pub fn set_site(&self, job_id: Uuid, latitude: f64, longitude: f64) {
        self.sites.lock().unwrap().insert(job_id, (latitude, longitude));
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().iter().map(|(job, _)| job.clone()).collect()
    }

    pub fn check_ins(&self) -> Vec<CheckIn> {
        self.check_ins.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContractStore for MemoryStore {
    async fn find_contract(&self, organization_id: i32, contract_id: i32) -> AppResult<Option<Contract>> {
        Ok(self
            .contracts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.organization_id == organization_id && c.id == contract_id)
            .cloned())
    }

    async fn missing_employees(&self, organization_id: i32, employee_ids: &[i32]) -> AppResult<Vec<i32>> {
        let employees = self.employees.lock().unwrap();
        Ok(employee_ids
            .iter()
            .copied()
            .filter(|id| !employees.contains(&(organization_id, *id)))
            .collect())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn committed_jobs(
        &self,
        organization_id: i32,
        employee_ids: &[i32],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Job>> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .map(|(job, _)| job)
            .filter(|job| {
                job.organization_id == organization_id
                    && job.status.is_committed()
                    && job.assigned_employee_id.is_some_and(|id| employee_ids.contains(&id))
                    && job.scheduled_for < to
                    && job.effective_end() > from
            })
            .cloned()
            .collect())
    }

    async fn insert_drafts(&self, organization_id: i32, drafts: &[JobInstanceDraft]) -> AppResult<Vec<Job>> {
        let mut jobs = self.jobs.lock().unwrap();
        let mut inserted = Vec::new();

        for draft in drafts {
            let key = draft.idempotency_key();
            if jobs.iter().any(|(_, existing)| existing.as_deref() == Some(key.as_str())) {
                continue;
            }
            let job = Job {
                id: Uuid::new_v4(),
                organization_id,
                contract_id: Some(draft.source_contract_id),
                assigned_employee_id: draft.assigned_employee_id,
                scheduled_for: draft.scheduled_for,
                scheduled_end: Some(draft.scheduled_end),
                duration_minutes: Some(draft.duration_minutes() as i32),
                tasks: draft.tasks.clone(),
                status: JobStatus::Scheduled,
                created_at: Utc::now(),
            };
            jobs.push((job.clone(), Some(key)));
            inserted.push(job);
        }

        Ok(inserted)
    }

    async fn find_job_site(&self, organization_id: i32, job_id: Uuid) -> AppResult<Option<JobSite>> {
        let site = self.sites.lock().unwrap().get(&job_id).copied();
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|(job, _)| job.organization_id == organization_id && job.id == job_id)
            .map(|(job, _)| JobSite {
                job: job.clone(),
                site_latitude: site.map(|(lat, _)| lat),
                site_longitude: site.map(|(_, lon)| lon),
            }))
    }

    async fn record_check_in(&self, organization_id: i32, check_in: &CheckIn) -> AppResult<Job> {
        let mut jobs = self.jobs.lock().unwrap();
        let (job, _) = jobs
            .iter_mut()
            .find(|(job, _)| {
                job.organization_id == organization_id
                    && job.id == check_in.job_id
                    && job.status == JobStatus::Scheduled
            })
            .ok_or_else(|| AppError::Conflict(format!("Job {} is no longer scheduled", check_in.job_id)))?;

        job.status = JobStatus::InProgress;
        self.check_ins.lock().unwrap().push(check_in.clone());
        Ok(job.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
