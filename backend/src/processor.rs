use std::sync::Arc;
use futures::future::try_join_all;
use tracing::{debug, info};
use shared::models::{Restaurant, VoteRecord};
use crate::store::{StoreError, VoteStore};

pub struct VoteProcessor {
    store: Arc<dyn VoteStore>,
}

impl VoteProcessor {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    pub async fn cast_vote(&self, restaurant: Restaurant) -> Result<VoteRecord, StoreError> {
        let votes = self.store.increment_vote(restaurant).await?;
        info!("🗳️ Vote cast for {}, now at {}", restaurant, votes);
        Ok(VoteRecord::new(restaurant, votes))
    }

    pub async fn read_votes(&self, restaurant: Restaurant) -> Result<VoteRecord, StoreError> {
        let votes = self.store.read_vote(restaurant).await?;
        Ok(VoteRecord::new(restaurant, votes))
    }

    pub async fn tally(&self) -> Result<Vec<VoteRecord>, StoreError> {
        let records = try_join_all(Restaurant::ALL.into_iter().map(|r| self.read_votes(r))).await?;
        debug!("Tallied {} restaurants", records.len());
        Ok(records)
    }
}
