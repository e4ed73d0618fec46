//! Read-side queries over the job table: the available pool, one courier's
//! jobs, and the active subset that drives the one-active-job invariant.

use uuid::Uuid;

use crate::models::job::Job;
use crate::state::AppState;

pub fn available_jobs(state: &AppState) -> Vec<Job> {
    let mut jobs: Vec<Job> = state
        .jobs
        .iter()
        .filter(|entry| entry.value().courier_id.is_none() && !entry.value().status.is_terminal())
        .map(|entry| entry.value().clone())
        .collect();

    jobs.sort_by_key(|job| job.created_at);
    jobs
}

pub fn jobs_for_courier(state: &AppState, courier_id: Uuid) -> Vec<Job> {
    let mut jobs: Vec<Job> = state
        .jobs
        .iter()
        .filter(|entry| entry.value().courier_id == Some(courier_id))
        .map(|entry| entry.value().clone())
        .collect();

    jobs.sort_by_key(|job| job.created_at);
    jobs
}

pub fn active_jobs_for_courier(state: &AppState, courier_id: Uuid) -> Vec<Job> {
    jobs_for_courier(state, courier_id)
        .into_iter()
        .filter(|job| !job.status.is_terminal())
        .collect()
}

pub fn has_active_job(state: &AppState, courier_id: Uuid) -> bool {
    state.jobs.iter().any(|entry| {
        let job = entry.value();
        job.courier_id == Some(courier_id) && !job.status.is_terminal()
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{active_jobs_for_courier, available_jobs, has_active_job};
    use crate::models::job::{Job, JobStatus};
    use crate::state::AppState;

    fn seeded_job(state: &AppState, status: JobStatus, courier_id: Option<Uuid>) -> Job {
        let mut job = Job::new(Uuid::new_v4(), None);
        job.status = status;
        job.courier_id = courier_id;
        state.jobs.insert(job.id, job.clone());
        job
    }

    #[test]
    fn available_pool_excludes_assigned_jobs() {
        let state = AppState::new(16);
        let courier = Uuid::new_v4();

        seeded_job(&state, JobStatus::Available, None);
        seeded_job(&state, JobStatus::Assigned, Some(courier));

        assert_eq!(available_jobs(&state).len(), 1);
    }

    #[test]
    fn active_subset_drops_terminal_statuses() {
        let state = AppState::new(16);
        let courier = Uuid::new_v4();

        seeded_job(&state, JobStatus::Delivered, Some(courier));
        seeded_job(&state, JobStatus::Cancelled, Some(courier));
        seeded_job(&state, JobStatus::Failed, Some(courier));
        seeded_job(&state, JobStatus::Returned, Some(courier));

        assert!(active_jobs_for_courier(&state, courier).is_empty());
        assert!(!has_active_job(&state, courier));

        seeded_job(&state, JobStatus::PickedUp, Some(courier));
        assert_eq!(active_jobs_for_courier(&state, courier).len(), 1);
        assert!(has_active_job(&state, courier));
    }
}
