use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One OTP channel of a job. `Pickup` is shown by the donor at the pickup
/// address, `Delivery` by the receiver at the drop-off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PodRole {
    Pickup,
    Delivery,
}

impl std::str::FromStr for PodRole {
    type Err = String;

    // The wire uses the party names (`donor`/`receiver`); accept both.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pickup" | "donor" => Ok(PodRole::Pickup),
            "delivery" | "receiver" => Ok(PodRole::Delivery),
            other => Err(format!("unknown pod role: {other}")),
        }
    }
}

/// An OTP credential scoped to one job and one role. Consumed on its first
/// successful verification; deleted outright when the job is re-pooled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodRecord {
    pub job_id: Uuid,
    pub role: PodRole,
    pub code: String,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
}
