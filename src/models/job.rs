use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Statuses are a closed set with one canonical wire casing. Mixed-case
/// strings coming over the wire are normalized in `from_str`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Available,
    Assigned,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
    Failed,
    Returned,
}

impl JobStatus {
    /// Terminal for the active-job computation; the record itself is kept.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Delivered | JobStatus::Cancelled | JobStatus::Failed | JobStatus::Returned
        )
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(JobStatus::Available),
            "ASSIGNED" => Ok(JobStatus::Assigned),
            "PICKED_UP" => Ok(JobStatus::PickedUp),
            "IN_TRANSIT" => Ok(JobStatus::InTransit),
            "OUT_FOR_DELIVERY" => Ok(JobStatus::OutForDelivery),
            "DELIVERED" => Ok(JobStatus::Delivered),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            "FAILED" => Ok(JobStatus::Failed),
            "RETURNED" => Ok(JobStatus::Returned),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

/// A courier's unit of work for one order: pickup plus delivery.
/// Created when the order is placed, never deleted; cancellation
/// returns it to the pool instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub order_id: Uuid,
    pub courier_id: Option<Uuid>,
    pub status: JobStatus,
    pub assigned_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(order_id: Uuid, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            courier_id: None,
            status: JobStatus::Available,
            assigned_at: None,
            completed_at: None,
            notes,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::JobStatus;

    #[test]
    fn mixed_case_wire_strings_normalize() {
        assert_eq!(JobStatus::from_str("picked_up").unwrap(), JobStatus::PickedUp);
        assert_eq!(JobStatus::from_str("PICKED_UP").unwrap(), JobStatus::PickedUp);
        assert_eq!(JobStatus::from_str(" available ").unwrap(), JobStatus::Available);
        assert!(JobStatus::from_str("teleported").is_err());
    }

    #[test]
    fn terminal_set_matches_active_job_definition() {
        for status in [
            JobStatus::Delivered,
            JobStatus::Cancelled,
            JobStatus::Failed,
            JobStatus::Returned,
        ] {
            assert!(status.is_terminal());
        }
        for status in [
            JobStatus::Available,
            JobStatus::Assigned,
            JobStatus::PickedUp,
            JobStatus::InTransit,
            JobStatus::OutForDelivery,
        ] {
            assert!(!status.is_terminal());
        }
    }
}
