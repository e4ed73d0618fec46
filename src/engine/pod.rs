//! Proof-of-delivery codes. Each job carries two independent channels,
//! minted together at assignment time. Verification compares only; it is
//! the caller's job to run the cascade afterwards.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::models::pod::{PodRecord, PodRole};
use crate::state::AppState;

pub const OTP_LENGTH: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct OtpPair {
    pub job_id: Uuid,
    pub pickup: String,
    pub delivery: String,
}

fn mint_code() -> String {
    // The v4 uuid is the crate's entropy source; six decimal digits,
    // zero-padded.
    let raw = Uuid::new_v4().as_u128() % 10u128.pow(OTP_LENGTH as u32);
    format!("{raw:06}")
}

/// Mints both codes for a job. Calling again overwrites the previous pair,
/// which also clears any consumed flags.
pub fn generate(state: &AppState, job_id: Uuid) -> OtpPair {
    let pair = OtpPair {
        job_id,
        pickup: mint_code(),
        delivery: mint_code(),
    };

    for (role, code) in [
        (PodRole::Pickup, pair.pickup.clone()),
        (PodRole::Delivery, pair.delivery.clone()),
    ] {
        state.pods.insert(
            (job_id, role),
            PodRecord {
                job_id,
                role,
                code,
                consumed: false,
                created_at: Utc::now(),
            },
        );
    }

    pair
}

/// Compares a submitted code against the stored one for the job and role.
/// Wrong code, wrong role, missing record, and replay of a consumed code
/// all come back `false`; the first successful match consumes the code.
pub fn verify(state: &AppState, job_id: Uuid, role: PodRole, code: &str) -> bool {
    let submitted = code.trim();

    let verified = match state.pods.get_mut(&(job_id, role)) {
        Some(mut record) => {
            if record.consumed || record.code != submitted {
                false
            } else {
                record.consumed = true;
                true
            }
        }
        None => false,
    };

    let role_label = match role {
        PodRole::Pickup => "pickup",
        PodRole::Delivery => "delivery",
    };
    let outcome = if verified { "verified" } else { "rejected" };
    state
        .metrics
        .pod_verifications_total
        .with_label_values(&[role_label, outcome])
        .inc();

    verified
}

/// Removes both codes for a job; returns how many records existed.
pub fn delete(state: &AppState, job_id: Uuid) -> usize {
    [PodRole::Pickup, PodRole::Delivery]
        .into_iter()
        .filter(|role| state.pods.remove(&(job_id, *role)).is_some())
        .count()
}
