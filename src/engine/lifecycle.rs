//! The job state machine. Assignment enforces the one-active-job-per-courier
//! invariant before any mutation; confirmation events advance the status
//! along the legal transitions and nothing else.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::directory;
use crate::engine::pod;
use crate::error::AppError;
use crate::models::job::{Job, JobStatus};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceEvent {
    PickupConfirmed,
    DeliveryConfirmed,
}

impl std::fmt::Display for AdvanceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvanceEvent::PickupConfirmed => write!(f, "pickup-confirmed"),
            AdvanceEvent::DeliveryConfirmed => write!(f, "delivery-confirmed"),
        }
    }
}

/// Legal confirmation transitions. Pickup only applies to a freshly
/// assigned job; delivery closes out any non-terminal held job.
pub fn next_status(current: JobStatus, event: AdvanceEvent) -> Option<JobStatus> {
    match (current, event) {
        (JobStatus::Assigned, AdvanceEvent::PickupConfirmed) => Some(JobStatus::PickedUp),
        (
            JobStatus::Assigned
            | JobStatus::PickedUp
            | JobStatus::InTransit
            | JobStatus::OutForDelivery,
            AdvanceEvent::DeliveryConfirmed,
        ) => Some(JobStatus::Delivered),
        _ => None,
    }
}

/// Accepts an available job for a courier. Rejected outright when the
/// courier already holds a non-terminal job; there is no queueing.
///
/// OTP minting and the order-side status update are side effects that must
/// not strand a courier mid-accept: their failure is logged and the
/// assignment stands.
pub async fn assign(state: &AppState, job_id: Uuid, courier_id: Uuid) -> Result<Job, AppError> {
    if !state.couriers.contains_key(&courier_id) {
        return Err(AppError::NotFound(format!("courier {courier_id} not found")));
    }

    if directory::has_active_job(state, courier_id) {
        state
            .metrics
            .assignments_total
            .with_label_values(&["rejected_active_job"])
            .inc();
        return Err(AppError::ActiveJobConflict);
    }

    let job = {
        let mut entry = state
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

        if entry.status != JobStatus::Available {
            state
                .metrics
                .assignments_total
                .with_label_values(&["rejected_unavailable"])
                .inc();
            return Err(AppError::Conflict(format!(
                "job {job_id} is not available"
            )));
        }

        entry.status = JobStatus::Assigned;
        entry.courier_id = Some(courier_id);
        entry.assigned_at = Some(Utc::now());
        entry.clone()
    };

    let pair = pod::generate(state, job_id);
    if let Err(err) = state.orders.mark_assigned(job.order_id, pair.delivery).await {
        warn!(
            job_id = %job_id,
            order_id = %job.order_id,
            error = %err,
            "order-side assignment update failed; job stays assigned"
        );
    }

    state
        .metrics
        .assignments_total
        .with_label_values(&["accepted"])
        .inc();
    state.metrics.jobs_active.inc();
    let _ = state.job_events_tx.send(job.clone());

    info!(job_id = %job_id, courier_id = %courier_id, "job assigned");
    Ok(job)
}

/// Returns an assigned job to the pool. Both OTP codes are deleted so a
/// stale code cannot be replayed against the re-pooled job; the order-side
/// reset is best-effort.
pub async fn unassign(state: &AppState, job_id: Uuid) -> Result<Job, AppError> {
    let job = {
        let mut entry = state
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

        match entry.status {
            JobStatus::Assigned => {}
            JobStatus::Available => {
                return Err(AppError::Conflict(format!("job {job_id} is not assigned")));
            }
            other => {
                return Err(AppError::Conflict(format!(
                    "job {job_id} cannot be unassigned from {other:?}"
                )));
            }
        }

        entry.status = JobStatus::Available;
        entry.courier_id = None;
        entry.assigned_at = None;
        entry.clone()
    };

    let deleted = pod::delete(state, job_id);
    if deleted == 0 {
        warn!(job_id = %job_id, "no pod records to delete on unassign");
    }

    if let Err(err) = state.orders.reset_to_created(job.order_id).await {
        warn!(
            job_id = %job_id,
            order_id = %job.order_id,
            error = %err,
            "order-side reset failed on unassign"
        );
    }

    state.metrics.jobs_active.dec();
    let _ = state.job_events_tx.send(job.clone());

    info!(job_id = %job_id, "job returned to pool");
    Ok(job)
}

/// Advances the job status for a confirmed event. Illegal transitions are
/// conflicts that mutate nothing.
pub fn advance(state: &AppState, job_id: Uuid, event: AdvanceEvent) -> Result<Job, AppError> {
    let job = {
        let mut entry = state
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

        let next = next_status(entry.status, event).ok_or_else(|| {
            AppError::Conflict(format!(
                "cannot apply {event} to job {job_id} in {:?}",
                entry.status
            ))
        })?;

        entry.status = next;
        if next.is_terminal() {
            entry.completed_at = Some(Utc::now());
        }
        entry.clone()
    };

    if job.status.is_terminal() {
        state.metrics.jobs_active.dec();
    }
    let _ = state.job_events_tx.send(job.clone());

    info!(job_id = %job_id, status = ?job.status, "job advanced");
    Ok(job)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::{advance, assign, next_status, unassign, AdvanceEvent};
    use crate::directory;
    use crate::error::AppError;
    use crate::models::courier::Courier;
    use crate::models::job::{Job, JobStatus};
    use crate::models::order::Order;
    use crate::models::pod::PodRole;
    use crate::registry::memory::{InMemoryLots, InMemoryProfiles};
    use crate::registry::OrderDirectory;
    use crate::state::AppState;

    struct FailingOrders;

    #[async_trait]
    impl OrderDirectory for FailingOrders {
        async fn create(&self, _order: Order) -> Result<Order, AppError> {
            Err(AppError::Internal("orders down".to_string()))
        }

        async fn get(&self, order_id: Uuid) -> Result<Order, AppError> {
            Err(AppError::NotFound(format!("order {order_id} not found")))
        }

        async fn mark_assigned(
            &self,
            _order_id: Uuid,
            _delivery_otp: String,
        ) -> Result<Order, AppError> {
            Err(AppError::Internal("orders down".to_string()))
        }

        async fn reset_to_created(&self, _order_id: Uuid) -> Result<Order, AppError> {
            Err(AppError::Internal("orders down".to_string()))
        }

        async fn mark_delivered(&self, _order_id: Uuid) -> Result<Order, AppError> {
            Err(AppError::Internal("orders down".to_string()))
        }
    }

    fn state_with_courier() -> (AppState, Uuid) {
        let state = AppState::new(16);
        let courier_id = Uuid::new_v4();
        state.couriers.insert(
            courier_id,
            Courier {
                id: courier_id,
                name: "Riley".to_string(),
                phone: None,
                created_at: chrono::Utc::now(),
            },
        );
        (state, courier_id)
    }

    fn pooled_job(state: &AppState) -> Uuid {
        let job = Job::new(Uuid::new_v4(), None);
        let id = job.id;
        state.jobs.insert(id, job);
        id
    }

    #[test]
    fn transition_table_covers_confirmations_only() {
        assert_eq!(
            next_status(JobStatus::Assigned, AdvanceEvent::PickupConfirmed),
            Some(JobStatus::PickedUp)
        );
        assert_eq!(
            next_status(JobStatus::PickedUp, AdvanceEvent::DeliveryConfirmed),
            Some(JobStatus::Delivered)
        );
        assert_eq!(
            next_status(JobStatus::OutForDelivery, AdvanceEvent::DeliveryConfirmed),
            Some(JobStatus::Delivered)
        );
        assert_eq!(
            next_status(JobStatus::Available, AdvanceEvent::PickupConfirmed),
            None
        );
        assert_eq!(
            next_status(JobStatus::PickedUp, AdvanceEvent::PickupConfirmed),
            None
        );
        assert_eq!(
            next_status(JobStatus::Delivered, AdvanceEvent::DeliveryConfirmed),
            None
        );
    }

    #[tokio::test]
    async fn assign_mints_both_pod_codes() {
        let (state, courier_id) = state_with_courier();
        let job_id = pooled_job(&state);

        let job = assign(&state, job_id, courier_id).await.unwrap();

        assert_eq!(job.status, JobStatus::Assigned);
        assert_eq!(job.courier_id, Some(courier_id));
        assert!(job.assigned_at.is_some());
        assert!(state.pods.contains_key(&(job_id, PodRole::Pickup)));
        assert!(state.pods.contains_key(&(job_id, PodRole::Delivery)));
    }

    #[tokio::test]
    async fn second_accept_is_rejected_while_first_is_active() {
        let (state, courier_id) = state_with_courier();
        let first = pooled_job(&state);
        let second = pooled_job(&state);

        assign(&state, first, courier_id).await.unwrap();
        let err = assign(&state, second, courier_id).await.unwrap_err();

        assert!(matches!(err, AppError::ActiveJobConflict));
        assert_eq!(
            state.jobs.get(&second).unwrap().status,
            JobStatus::Available
        );
        assert_eq!(directory::active_jobs_for_courier(&state, courier_id).len(), 1);
    }

    #[tokio::test]
    async fn courier_can_accept_again_after_terminal_job() {
        let (state, courier_id) = state_with_courier();
        let first = pooled_job(&state);
        let second = pooled_job(&state);

        assign(&state, first, courier_id).await.unwrap();
        advance(&state, first, AdvanceEvent::DeliveryConfirmed).unwrap();

        assign(&state, second, courier_id).await.unwrap();
        assert_eq!(directory::active_jobs_for_courier(&state, courier_id).len(), 1);
    }

    #[tokio::test]
    async fn assigning_a_non_available_job_fails_without_mutation() {
        let (state, courier_id) = state_with_courier();
        let job_id = pooled_job(&state);
        assign(&state, job_id, courier_id).await.unwrap();

        let other_courier = Uuid::new_v4();
        state.couriers.insert(
            other_courier,
            Courier {
                id: other_courier,
                name: "Sam".to_string(),
                phone: None,
                created_at: chrono::Utc::now(),
            },
        );

        let err = assign(&state, job_id, other_courier).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let job = state.jobs.get(&job_id).unwrap().clone();
        assert_eq!(job.courier_id, Some(courier_id));
        assert_eq!(job.status, JobStatus::Assigned);
    }

    #[tokio::test]
    async fn order_side_failure_does_not_strand_the_accept() {
        let state = AppState::with_directories(
            Arc::new(FailingOrders),
            Arc::new(InMemoryLots::default()),
            Arc::new(InMemoryProfiles::default()),
            16,
        );
        let courier_id = Uuid::new_v4();
        state.couriers.insert(
            courier_id,
            Courier {
                id: courier_id,
                name: "Riley".to_string(),
                phone: None,
                created_at: chrono::Utc::now(),
            },
        );
        let job_id = pooled_job(&state);

        let job = assign(&state, job_id, courier_id).await.unwrap();

        assert_eq!(job.status, JobStatus::Assigned);
        assert!(state.pods.contains_key(&(job_id, PodRole::Pickup)));
    }

    #[tokio::test]
    async fn unassign_repools_and_deletes_codes() {
        let (state, courier_id) = state_with_courier();
        let job_id = pooled_job(&state);
        assign(&state, job_id, courier_id).await.unwrap();

        let job = unassign(&state, job_id).await.unwrap();

        assert_eq!(job.status, JobStatus::Available);
        assert!(job.courier_id.is_none());
        assert!(job.assigned_at.is_none());
        assert!(!state.pods.contains_key(&(job_id, PodRole::Pickup)));
        assert!(!state.pods.contains_key(&(job_id, PodRole::Delivery)));
    }

    #[tokio::test]
    async fn unassigning_an_available_job_is_rejected_cleanly() {
        let (state, _courier_id) = state_with_courier();
        let job_id = pooled_job(&state);

        let err = unassign(&state, job_id).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        let job = state.jobs.get(&job_id).unwrap().clone();
        assert_eq!(job.status, JobStatus::Available);
        assert!(job.courier_id.is_none());
    }

    #[tokio::test]
    async fn unassigning_a_picked_up_job_is_rejected() {
        let (state, courier_id) = state_with_courier();
        let job_id = pooled_job(&state);
        assign(&state, job_id, courier_id).await.unwrap();
        advance(&state, job_id, AdvanceEvent::PickupConfirmed).unwrap();

        let err = unassign(&state, job_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(state.jobs.get(&job_id).unwrap().status, JobStatus::PickedUp);
    }

    #[tokio::test]
    async fn delivery_confirmation_stamps_completion() {
        let (state, courier_id) = state_with_courier();
        let job_id = pooled_job(&state);
        assign(&state, job_id, courier_id).await.unwrap();
        advance(&state, job_id, AdvanceEvent::PickupConfirmed).unwrap();

        let job = advance(&state, job_id, AdvanceEvent::DeliveryConfirmed).unwrap();

        assert_eq!(job.status, JobStatus::Delivered);
        assert!(job.completed_at.is_some());
        assert!(!directory::has_active_job(&state, courier_id));
    }
}
