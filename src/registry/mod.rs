//! Seams to the order, lot, and profile directories. Those records are
//! stored and served independently of the job table, so everything the
//! engine does to them goes through these traits; the in-memory
//! implementations in [`memory`] are the default wiring.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::lot::{Lot, LotStatus};
use crate::models::order::Order;
use crate::models::profile::{Address, UserProfile};

#[async_trait]
pub trait OrderDirectory: Send + Sync {
    async fn create(&self, order: Order) -> Result<Order, AppError>;

    async fn get(&self, order_id: Uuid) -> Result<Order, AppError>;

    /// Assignment side effect: status `Assigned` plus the receiver-facing
    /// delivery code.
    async fn mark_assigned(&self, order_id: Uuid, delivery_otp: String) -> Result<Order, AppError>;

    /// Unassignment side effect: back to `Created`, delivery code cleared.
    async fn reset_to_created(&self, order_id: Uuid) -> Result<Order, AppError>;

    /// Returns the updated order so callers can pick up the lot id.
    async fn mark_delivered(&self, order_id: Uuid) -> Result<Order, AppError>;
}

#[async_trait]
pub trait LotDirectory: Send + Sync {
    async fn create(&self, lot: Lot) -> Result<Lot, AppError>;

    async fn get(&self, lot_id: Uuid) -> Result<Lot, AppError>;

    async fn set_status_for_courier(
        &self,
        lot_id: Uuid,
        status: LotStatus,
    ) -> Result<Lot, AppError>;
}

#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn address(&self, address_id: Uuid) -> Result<Address, AppError>;

    async fn user(&self, user_id: Uuid) -> Result<UserProfile, AppError>;

    async fn upsert_address(&self, address: Address) -> Result<Address, AppError>;

    async fn upsert_user(&self, user: UserProfile) -> Result<UserProfile, AppError>;
}
