use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use crate::error::UnknownRestaurant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Restaurant {
    Outback,
    BucaDiBeppo,
    Ihop,
    Chipotle,
}

impl Restaurant {
    pub const ALL: [Restaurant; 4] = [
        Restaurant::Outback,
        Restaurant::BucaDiBeppo,
        Restaurant::Ihop,
        Restaurant::Chipotle,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Restaurant::Outback => "outback",
            Restaurant::BucaDiBeppo => "bucadibeppo",
            Restaurant::Ihop => "ihop",
            Restaurant::Chipotle => "chipotle",
        }
    }
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Restaurant {
    type Err = UnknownRestaurant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Restaurant::ALL
            .into_iter()
            .find(|r| r.key() == s)
            .ok_or_else(|| UnknownRestaurant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub restaurant: Restaurant,
    pub votes: u64,
}

impl VoteRecord {
    pub fn new(restaurant: Restaurant, votes: u64) -> Self {
        Self { restaurant, votes }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub name: Restaurant,
    pub value: u64,
}

impl From<VoteRecord> for VoteEntry {
    fn from(record: VoteRecord) -> Self {
        Self {
            name: record.restaurant,
            value: record.votes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub restaurant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub restaurant: Restaurant,
    pub votes: u64,
}

impl From<VoteRecord> for VoteReceipt {
    fn from(record: VoteRecord) -> Self {
        Self {
            restaurant: record.restaurant,
            votes: record.votes,
        }
    }
}
