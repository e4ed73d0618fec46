use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::profile::{Address, UserProfile};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/addresses", post(create_address))
        .route("/addresses/:id", get(get_address))
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user))
}

#[derive(Deserialize)]
pub struct CreateAddressRequest {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
}

async fn create_address(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAddressRequest>,
) -> Result<Json<Address>, AppError> {
    if payload.line1.trim().is_empty() {
        return Err(AppError::BadRequest("line1 cannot be empty".to_string()));
    }

    let address = Address {
        id: Uuid::new_v4(),
        line1: payload.line1,
        city: payload.city,
        postal_code: payload.postal_code,
    };

    let address = state.profiles.upsert_address(address).await?;
    Ok(Json(address))
}

async fn get_address(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Address>, AppError> {
    let address = state.profiles.address(id).await?;
    Ok(Json(address))
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub phone: Option<String>,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let user = UserProfile {
        id: Uuid::new_v4(),
        name: payload.name,
        phone: payload.phone,
    };

    let user = state.profiles.upsert_user(user).await?;
    Ok(Json(user))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state.profiles.user(id).await?;
    Ok(Json(user))
}
