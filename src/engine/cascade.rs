//! Translates one confirmed POD event into status updates across job,
//! order, and lot. The job hop is the hard dependency; the order and lot
//! hops are best-effort and fail independently, so a courier who has
//! physically completed the handoff is never rolled back by a downstream
//! outage. Each hop's result is reported separately.

use std::time::Instant;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::engine::lifecycle::{self, AdvanceEvent};
use crate::error::AppError;
use crate::models::job::Job;
use crate::models::lot::LotStatus;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepOutcome {
    Updated,
    Skipped,
    Failed(String),
}

impl StepOutcome {
    fn label(&self) -> &'static str {
        match self {
            StepOutcome::Updated => "updated",
            StepOutcome::Skipped => "skipped",
            StepOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CascadeOutcome {
    pub job: Job,
    pub order: StepOutcome,
    pub lot: StepOutcome,
}

/// Pickup is job-local: advance to `PickedUp`, nothing downstream.
pub async fn confirm_pickup(state: &AppState, job_id: Uuid) -> Result<CascadeOutcome, AppError> {
    let start = Instant::now();
    let job = lifecycle::advance(state, job_id, AdvanceEvent::PickupConfirmed)?;

    state
        .metrics
        .cascade_steps_total
        .with_label_values(&["job", "updated"])
        .inc();
    state
        .metrics
        .cascade_latency_seconds
        .with_label_values(&["pickup"])
        .observe(start.elapsed().as_secs_f64());

    Ok(CascadeOutcome {
        job,
        order: StepOutcome::Skipped,
        lot: StepOutcome::Skipped,
    })
}

/// Delivery runs the full chain, strictly in order:
///
/// 1. job to `Delivered`: failure aborts, nothing downstream runs;
/// 2. order to `Delivered`: failure is logged and reported, not propagated;
/// 3. lot to `Delivered`, only if step 2 succeeded and a lot id resolves
///    (from the order response, else `fallback_lot_id`); otherwise skipped.
pub async fn confirm_delivery(
    state: &AppState,
    job_id: Uuid,
    fallback_lot_id: Option<Uuid>,
) -> Result<CascadeOutcome, AppError> {
    let start = Instant::now();
    let job = lifecycle::advance(state, job_id, AdvanceEvent::DeliveryConfirmed)?;
    state
        .metrics
        .cascade_steps_total
        .with_label_values(&["job", "updated"])
        .inc();

    let (order_outcome, lot_id_from_order) = match state.orders.mark_delivered(job.order_id).await {
        Ok(order) => (StepOutcome::Updated, order.lot_id),
        Err(err) => {
            warn!(
                job_id = %job_id,
                order_id = %job.order_id,
                error = %err,
                "delivery verified, but order status update failed"
            );
            (StepOutcome::Failed(err.to_string()), None)
        }
    };
    state
        .metrics
        .cascade_steps_total
        .with_label_values(&["order", order_outcome.label()])
        .inc();

    let lot_outcome = if order_outcome == StepOutcome::Updated {
        match lot_id_from_order.or(fallback_lot_id) {
            Some(lot_id) => {
                match state
                    .lots
                    .set_status_for_courier(lot_id, LotStatus::Delivered)
                    .await
                {
                    Ok(_) => StepOutcome::Updated,
                    Err(err) => {
                        warn!(
                            job_id = %job_id,
                            lot_id = %lot_id,
                            error = %err,
                            "order updated, but lot status change failed"
                        );
                        StepOutcome::Failed(err.to_string())
                    }
                }
            }
            None => StepOutcome::Skipped,
        }
    } else {
        StepOutcome::Skipped
    };
    state
        .metrics
        .cascade_steps_total
        .with_label_values(&["lot", lot_outcome.label()])
        .inc();

    state
        .metrics
        .cascade_latency_seconds
        .with_label_values(&["delivery"])
        .observe(start.elapsed().as_secs_f64());

    Ok(CascadeOutcome {
        job,
        order: order_outcome,
        lot: lot_outcome,
    })
}
