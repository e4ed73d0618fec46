use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::pod;
use crate::error::AppError;
use crate::models::job::JobStatus;
use crate::models::pod::PodRole;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/evidence/pods/generate-otp", post(generate_otp))
        .route("/evidence/pods/job/:job_id", delete(delete_pods))
        .route("/evidence/pods/verify/:job_id/:role", get(verify_code))
}

#[derive(Deserialize)]
struct GenerateOtpParams {
    #[serde(rename = "jobId")]
    job_id: Uuid,
}

async fn generate_otp(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateOtpParams>,
) -> Result<Json<pod::OtpPair>, AppError> {
    let job = state
        .jobs
        .get(&params.job_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("job {} not found", params.job_id)))?;

    // Codes only make sense for a held job; an available one has no
    // courier to carry them.
    if job.status == JobStatus::Available || job.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "job {} is not held by a courier",
            params.job_id
        )));
    }

    Ok(Json(pod::generate(&state, params.job_id)))
}

#[derive(Serialize)]
struct DeleteResponse {
    deleted: usize,
}

async fn delete_pods(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Json<DeleteResponse> {
    Json(DeleteResponse {
        deleted: pod::delete(&state, job_id),
    })
}

#[derive(Deserialize)]
struct VerifyParams {
    code: String,
}

async fn verify_code(
    State(state): State<Arc<AppState>>,
    Path((job_id, role)): Path<(Uuid, String)>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<bool>, AppError> {
    let role: PodRole = role.parse().map_err(AppError::BadRequest)?;
    Ok(Json(pod::verify(&state, job_id, role, &params.code)))
}
