use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use serde::Serialize;
use uuid::Uuid;

use crate::directory;
use crate::engine::{cascade, lifecycle};
use crate::enrichment::JobView;
use crate::error::AppError;
use crate::models::job::Job;
use crate::models::order::Order;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs/available", get(list_available))
        .route("/jobs/courier/:courier_id", get(list_for_courier))
        .route(
            "/jobs/:job_id/assign-courier/:courier_id",
            put(assign_courier),
        )
        .route("/jobs/:job_id/unassign-courier", put(unassign_courier))
        .route("/jobs/:job_id/pickup", put(confirm_pickup))
        .route("/jobs/:job_id/delivered", put(confirm_delivery))
        .route("/jobs/orders/details/:order_id", get(order_details))
}

async fn list_available(State(state): State<Arc<AppState>>) -> Json<Vec<JobView>> {
    let jobs = directory::available_jobs(&state);
    Json(state.enrichment.enrich_jobs(jobs).await)
}

async fn list_for_courier(
    State(state): State<Arc<AppState>>,
    Path(courier_id): Path<Uuid>,
) -> Json<Vec<JobView>> {
    let jobs = directory::jobs_for_courier(&state, courier_id);
    Json(state.enrichment.enrich_jobs(jobs).await)
}

async fn assign_courier(
    State(state): State<Arc<AppState>>,
    Path((job_id, courier_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Job>, AppError> {
    let job = lifecycle::assign(&state, job_id, courier_id).await?;
    Ok(Json(job))
}

async fn unassign_courier(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = lifecycle::unassign(&state, job_id).await?;
    Ok(Json(job))
}

async fn confirm_pickup(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<cascade::CascadeOutcome>, AppError> {
    let outcome = cascade::confirm_pickup(&state, job_id).await?;
    Ok(Json(outcome))
}

async fn confirm_delivery(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<cascade::CascadeOutcome>, AppError> {
    let job = state
        .jobs
        .get(&job_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

    // The job side's locally known lot id, via the session cache; the
    // cascade prefers the fresh order response and falls back to this.
    let fallback_lot_id = state
        .enrichment
        .order(job.order_id)
        .await
        .and_then(|order| order.lot_id);

    let outcome = cascade::confirm_delivery(&state, job_id, fallback_lot_id).await?;
    Ok(Json(outcome))
}

/// Receiver-facing tracking view: the order itself is read fresh (it is a
/// live status), only the name/address decoration goes through the cache.
#[derive(Serialize)]
struct OrderDetails {
    #[serde(flatten)]
    order: Order,
    pickup_address: Option<String>,
    delivery_address: Option<String>,
    receiver_name: Option<String>,
}

async fn order_details(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetails>, AppError> {
    let order = state.orders.get(order_id).await?;

    let (pickup, delivery, receiver) = futures::join!(
        state.enrichment.address(order.pickup_address_id),
        state.enrichment.address(order.delivery_address_id),
        state.enrichment.user(order.receiver_id),
    );

    Ok(Json(OrderDetails {
        pickup_address: pickup.map(|a| a.display()),
        delivery_address: delivery.map(|a| a.display()),
        receiver_name: receiver.map(|u| u.name),
        order,
    }))
}
