use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Pending,
    Active,
    ExpiringSoon,
    Delivered,
    Inactive,
}

impl std::str::FromStr for LotStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(LotStatus::Pending),
            "ACTIVE" => Ok(LotStatus::Active),
            "EXPIRING_SOON" => Ok(LotStatus::ExpiringSoon),
            "DELIVERED" => Ok(LotStatus::Delivered),
            "INACTIVE" => Ok(LotStatus::Inactive),
            other => Err(format!("unknown lot status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub quantity: u32,
}

/// A donated food batch. Delivery completion flips it to `Delivered`
/// through the cascade; donor-side edits happen elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lot {
    pub id: Uuid,
    pub description: String,
    pub status: LotStatus,
    pub items: Vec<FoodItem>,
    pub donor_id: Uuid,
    pub address_id: Uuid,
    pub created_at: DateTime<Utc>,
}
