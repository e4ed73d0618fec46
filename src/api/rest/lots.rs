use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::lot::{FoodItem, Lot, LotStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lots", post(create_lot))
        .route("/lots/:id", get(get_lot))
        .route("/lots/:id/status/ForCourier", patch(update_status_for_courier))
}

#[derive(Deserialize)]
pub struct CreateLotRequest {
    pub description: String,
    pub donor_id: Uuid,
    pub address_id: Uuid,
    #[serde(default)]
    pub items: Vec<FoodItem>,
}

async fn create_lot(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateLotRequest>,
) -> Result<Json<Lot>, AppError> {
    if payload.description.trim().is_empty() {
        return Err(AppError::BadRequest(
            "description cannot be empty".to_string(),
        ));
    }

    let lot = Lot {
        id: Uuid::new_v4(),
        description: payload.description,
        status: LotStatus::Active,
        items: payload.items,
        donor_id: payload.donor_id,
        address_id: payload.address_id,
        created_at: Utc::now(),
    };

    let lot = state.lots.create(lot).await?;
    Ok(Json(lot))
}

async fn get_lot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lot>, AppError> {
    let lot = state.lots.get(id).await?;
    Ok(Json(lot))
}

#[derive(Deserialize)]
struct StatusParams {
    status: String,
}

async fn update_status_for_courier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<StatusParams>,
) -> Result<Json<Lot>, AppError> {
    let status: LotStatus = params.status.parse().map_err(AppError::BadRequest)?;
    let lot = state.lots.set_status_for_courier(id, status).await?;
    Ok(Json(lot))
}
