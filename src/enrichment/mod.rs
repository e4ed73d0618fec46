//! Session-scoped memoization of address, user, order, and lot lookups,
//! used to decorate raw jobs with human-readable fields without refetching
//! on every poll. Failed lookups are not negative-cached; the caller gets
//! `None` and the next call retries.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::models::job::Job;
use crate::models::lot::Lot;
use crate::models::order::Order;
use crate::models::profile::{Address, UserProfile};
use crate::registry::{LotDirectory, OrderDirectory, ProfileDirectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LookupKind {
    Address,
    User,
    Order,
    Lot,
}

#[derive(Clone)]
enum CachedRecord {
    Address(Address),
    User(UserProfile),
    Order(Order),
    Lot(Lot),
}

/// A job decorated for the dashboards. Lookup failures degrade to
/// placeholder labels; they never block the listing.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub pickup_address: String,
    pub delivery_address: String,
    pub receiver_name: String,
    pub donor_name: String,
    pub lot_description: Option<String>,
}

pub struct EnrichmentCache {
    entries: DashMap<(LookupKind, Uuid), CachedRecord>,
    orders: Arc<dyn OrderDirectory>,
    lots: Arc<dyn LotDirectory>,
    profiles: Arc<dyn ProfileDirectory>,
}

impl EnrichmentCache {
    pub fn new(
        orders: Arc<dyn OrderDirectory>,
        lots: Arc<dyn LotDirectory>,
        profiles: Arc<dyn ProfileDirectory>,
    ) -> Self {
        Self {
            entries: DashMap::new(),
            orders,
            lots,
            profiles,
        }
    }

    pub async fn address(&self, id: Uuid) -> Option<Address> {
        if let Some(CachedRecord::Address(hit)) = self.cached(LookupKind::Address, id) {
            return Some(hit);
        }

        match self.profiles.address(id).await {
            Ok(address) => {
                self.store(LookupKind::Address, id, CachedRecord::Address(address.clone()));
                Some(address)
            }
            Err(err) => {
                debug!(address_id = %id, error = %err, "address lookup failed");
                None
            }
        }
    }

    pub async fn user(&self, id: Uuid) -> Option<UserProfile> {
        if let Some(CachedRecord::User(hit)) = self.cached(LookupKind::User, id) {
            return Some(hit);
        }

        match self.profiles.user(id).await {
            Ok(user) => {
                self.store(LookupKind::User, id, CachedRecord::User(user.clone()));
                Some(user)
            }
            Err(err) => {
                debug!(user_id = %id, error = %err, "user lookup failed");
                None
            }
        }
    }

    pub async fn order(&self, id: Uuid) -> Option<Order> {
        if let Some(CachedRecord::Order(hit)) = self.cached(LookupKind::Order, id) {
            return Some(hit);
        }

        match self.orders.get(id).await {
            Ok(order) => {
                self.store(LookupKind::Order, id, CachedRecord::Order(order.clone()));
                Some(order)
            }
            Err(err) => {
                debug!(order_id = %id, error = %err, "order lookup failed");
                None
            }
        }
    }

    pub async fn lot(&self, id: Uuid) -> Option<Lot> {
        if let Some(CachedRecord::Lot(hit)) = self.cached(LookupKind::Lot, id) {
            return Some(hit);
        }

        match self.lots.get(id).await {
            Ok(lot) => {
                self.store(LookupKind::Lot, id, CachedRecord::Lot(lot.clone()));
                Some(lot)
            }
            Err(err) => {
                debug!(lot_id = %id, error = %err, "lot lookup failed");
                None
            }
        }
    }

    /// Decorates a batch of jobs. Each job's order resolves first, then its
    /// addresses and parties concurrently; one job's failures never block
    /// the others.
    pub async fn enrich_jobs(&self, jobs: Vec<Job>) -> Vec<JobView> {
        join_all(jobs.into_iter().map(|job| self.enrich_job(job))).await
    }

    async fn enrich_job(&self, job: Job) -> JobView {
        let Some(order) = self.order(job.order_id).await else {
            let order_id = job.order_id;
            return JobView {
                job,
                pickup_address: "Address unavailable".to_string(),
                delivery_address: "Address unavailable".to_string(),
                receiver_name: format!("Recipient for {order_id}"),
                donor_name: format!("Donor for {order_id}"),
                lot_description: None,
            };
        };

        let (pickup, delivery, receiver) = futures::join!(
            self.address(order.pickup_address_id),
            self.address(order.delivery_address_id),
            self.user(order.receiver_id),
        );

        let lot = match order.lot_id {
            Some(lot_id) => self.lot(lot_id).await,
            None => None,
        };
        let donor = match &lot {
            Some(lot) => self.user(lot.donor_id).await,
            None => None,
        };

        JobView {
            job,
            pickup_address: pickup
                .map(|a| a.display())
                .unwrap_or_else(|| "Address unavailable".to_string()),
            delivery_address: delivery
                .map(|a| a.display())
                .unwrap_or_else(|| "Address unavailable".to_string()),
            receiver_name: receiver
                .map(|u| u.name)
                .unwrap_or_else(|| format!("Recipient for {}", order.id)),
            donor_name: donor
                .map(|u| u.name)
                .unwrap_or_else(|| format!("Donor for {}", order.id)),
            lot_description: lot.map(|l| l.description),
        }
    }

    fn cached(&self, kind: LookupKind, id: Uuid) -> Option<CachedRecord> {
        self.entries.get(&(kind, id)).map(|entry| entry.value().clone())
    }

    fn store(&self, kind: LookupKind, id: Uuid, record: CachedRecord) {
        self.entries.insert((kind, id), record);
    }
}
