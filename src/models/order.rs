use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
}

/// The logistics record linking a reserved lot, a receiver, and (once
/// assigned) a job. Status mirrors but lags the job's; only the lifecycle
/// and cascade paths mutate it, never a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub lot_id: Option<Uuid>,
    pub pickup_address_id: Uuid,
    pub delivery_address_id: Uuid,
    pub receiver_id: Uuid,
    pub status: OrderStatus,
    /// Receiver-facing delivery code, attached once a courier accepts.
    pub delivery_otp: Option<String>,
    pub created_at: DateTime<Utc>,
}
