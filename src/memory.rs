//! Per-username echo of the exchanges seen by this process.
//!
//! Policy: no eviction, no size bound, nothing persisted. A restart clears
//! every sequence. The durable record lives in [`crate::db`]; this map is only
//! echoed back in chat responses and may diverge from it.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub message: String,
    pub response: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionMemory {
    exchanges: Arc<DashMap<String, Vec<Exchange>>>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the end of `username`'s sequence and returns the sequence
    /// as it stands right after the append.
    pub fn append(&self, username: &str, message: &str, response: &str) -> Vec<Exchange> {
        let mut exchanges = self.exchanges.entry(username.to_owned()).or_default();
        exchanges.push(Exchange {
            message: message.to_owned(),
            response: response.to_owned(),
        });
        exchanges.value().clone()
    }

    pub fn get(&self, username: &str) -> Vec<Exchange> {
        self.exchanges
            .get(username)
            .map(|exchanges| exchanges.value().clone())
            .unwrap_or_default()
    }
}
