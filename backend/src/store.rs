use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use shared::models::Restaurant;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Vote store unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to read votes: {0}")]
    Read(String),
    #[error("Failed to write votes: {0}")]
    Write(String),
}

#[rocket::async_trait]
pub trait VoteStore: Send + Sync {
    async fn read_vote(&self, restaurant: Restaurant) -> Result<u64, StoreError>;

    async fn write_vote(&self, restaurant: Restaurant, votes: u64) -> Result<(), StoreError>;

    // Not atomic: concurrent callers can read the same count and lose a vote.
    async fn increment_vote(&self, restaurant: Restaurant) -> Result<u64, StoreError> {
        let votes = self.read_vote(restaurant).await?;
        let votes = next_count(restaurant, votes)?;
        self.write_vote(restaurant, votes).await?;
        Ok(votes)
    }
}

pub(crate) fn next_count(restaurant: Restaurant, votes: u64) -> Result<u64, StoreError> {
    votes
        .checked_add(1)
        .ok_or_else(|| StoreError::Write(format!("vote counter for {} overflowed", restaurant)))
}

#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    votes: Mutex<HashMap<Restaurant, u64>>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_votes(votes: impl IntoIterator<Item = (Restaurant, u64)>) -> Self {
        Self {
            votes: Mutex::new(votes.into_iter().collect()),
        }
    }

    pub fn seeded() -> Self {
        Self::with_votes([
            (Restaurant::Outback, 15),
            (Restaurant::BucaDiBeppo, 8),
            (Restaurant::Ihop, 12),
            (Restaurant::Chipotle, 23),
        ])
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Restaurant, u64>>, StoreError> {
        self.votes.lock().map_err(|e| {
            error!("Failed to acquire vote store lock: {}", e);
            StoreError::Unavailable("vote store lock poisoned".into())
        })
    }
}

#[rocket::async_trait]
impl VoteStore for MemoryVoteStore {
    async fn read_vote(&self, restaurant: Restaurant) -> Result<u64, StoreError> {
        Ok(self.lock()?.get(&restaurant).copied().unwrap_or(0))
    }

    async fn write_vote(&self, restaurant: Restaurant, votes: u64) -> Result<(), StoreError> {
        self.lock()?.insert(restaurant, votes);
        Ok(())
    }

    async fn increment_vote(&self, restaurant: Restaurant) -> Result<u64, StoreError> {
        let mut votes = self.lock()?;
        let count = votes.entry(restaurant).or_insert(0);
        *count = next_count(restaurant, *count)?;
        Ok(*count)
    }
}
