use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::job::Job;
use crate::models::order::{Order, OrderStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/delivered", put(mark_delivered))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub lot_id: Uuid,
    pub pickup_address_id: Uuid,
    pub delivery_address_id: Uuid,
    pub receiver_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub order: Order,
    pub job: Job,
}

/// Placing an order reserves the lot and spawns its 1:1 delivery job in
/// the available pool.
async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    // The lot must exist to be reserved.
    state.lots.get(payload.lot_id).await?;

    let order = Order {
        id: Uuid::new_v4(),
        lot_id: Some(payload.lot_id),
        pickup_address_id: payload.pickup_address_id,
        delivery_address_id: payload.delivery_address_id,
        receiver_id: payload.receiver_id,
        status: OrderStatus::Created,
        delivery_otp: None,
        created_at: Utc::now(),
    };
    let order = state.orders.create(order).await?;

    let job = Job::new(order.id, payload.notes);
    state.jobs.insert(job.id, job.clone());

    Ok(Json(CreateOrderResponse { order, job }))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state.orders.get(id).await?;
    Ok(Json(order))
}

async fn mark_delivered(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state.orders.mark_delivered(id).await?;
    Ok(Json(order))
}
