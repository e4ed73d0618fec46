use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::lot::{Lot, LotStatus};
use crate::models::order::{Order, OrderStatus};
use crate::models::profile::{Address, UserProfile};
use crate::registry::{LotDirectory, OrderDirectory, ProfileDirectory};

#[derive(Default)]
pub struct InMemoryOrders {
    orders: DashMap<Uuid, Order>,
}

#[async_trait]
impl OrderDirectory for InMemoryOrders {
    async fn create(&self, order: Order) -> Result<Order, AppError> {
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, order_id: Uuid) -> Result<Order, AppError> {
        self.orders
            .get(&order_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))
    }

    async fn mark_assigned(&self, order_id: Uuid, delivery_otp: String) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        order.status = OrderStatus::Assigned;
        order.delivery_otp = Some(delivery_otp);
        Ok(order.clone())
    }

    async fn reset_to_created(&self, order_id: Uuid) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        order.status = OrderStatus::Created;
        order.delivery_otp = None;
        Ok(order.clone())
    }

    async fn mark_delivered(&self, order_id: Uuid) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        order.status = OrderStatus::Delivered;
        Ok(order.clone())
    }
}

#[derive(Default)]
pub struct InMemoryLots {
    lots: DashMap<Uuid, Lot>,
}

#[async_trait]
impl LotDirectory for InMemoryLots {
    async fn create(&self, lot: Lot) -> Result<Lot, AppError> {
        self.lots.insert(lot.id, lot.clone());
        Ok(lot)
    }

    async fn get(&self, lot_id: Uuid) -> Result<Lot, AppError> {
        self.lots
            .get(&lot_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("lot {lot_id} not found")))
    }

    async fn set_status_for_courier(
        &self,
        lot_id: Uuid,
        status: LotStatus,
    ) -> Result<Lot, AppError> {
        let mut lot = self
            .lots
            .get_mut(&lot_id)
            .ok_or_else(|| AppError::NotFound(format!("lot {lot_id} not found")))?;

        lot.status = status;
        Ok(lot.clone())
    }
}

#[derive(Default)]
pub struct InMemoryProfiles {
    addresses: DashMap<Uuid, Address>,
    users: DashMap<Uuid, UserProfile>,
}

#[async_trait]
impl ProfileDirectory for InMemoryProfiles {
    async fn address(&self, address_id: Uuid) -> Result<Address, AppError> {
        self.addresses
            .get(&address_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("address {address_id} not found")))
    }

    async fn user(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        self.users
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))
    }

    async fn upsert_address(&self, address: Address) -> Result<Address, AppError> {
        self.addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn upsert_user(&self, user: UserProfile) -> Result<UserProfile, AppError> {
        self.users.insert(user.id, user.clone());
        Ok(user)
    }
}
