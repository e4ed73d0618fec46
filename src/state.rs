use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::enrichment::EnrichmentCache;
use crate::models::courier::Courier;
use crate::models::job::Job;
use crate::models::pod::{PodRecord, PodRole};
use crate::observability::metrics::Metrics;
use crate::registry::memory::{InMemoryLots, InMemoryOrders, InMemoryProfiles};
use crate::registry::{LotDirectory, OrderDirectory, ProfileDirectory};

pub struct AppState {
    pub jobs: DashMap<Uuid, Job>,
    pub couriers: DashMap<Uuid, Courier>,
    pub pods: DashMap<(Uuid, PodRole), PodRecord>,
    pub orders: Arc<dyn OrderDirectory>,
    pub lots: Arc<dyn LotDirectory>,
    pub profiles: Arc<dyn ProfileDirectory>,
    pub enrichment: EnrichmentCache,
    pub job_events_tx: broadcast::Sender<Job>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        Self::with_directories(
            Arc::new(InMemoryOrders::default()),
            Arc::new(InMemoryLots::default()),
            Arc::new(InMemoryProfiles::default()),
            event_buffer_size,
        )
    }

    /// Tests swap in failing directory doubles here to exercise the
    /// cascade's partial-failure paths.
    pub fn with_directories(
        orders: Arc<dyn OrderDirectory>,
        lots: Arc<dyn LotDirectory>,
        profiles: Arc<dyn ProfileDirectory>,
        event_buffer_size: usize,
    ) -> Self {
        let (job_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            jobs: DashMap::new(),
            couriers: DashMap::new(),
            pods: DashMap::new(),
            orders: orders.clone(),
            lots: lots.clone(),
            profiles: profiles.clone(),
            enrichment: EnrichmentCache::new(orders, lots, profiles),
            job_events_tx,
            metrics: Metrics::new(),
        }
    }
}
