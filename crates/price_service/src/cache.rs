//! Bounded FIFO prediction cache
//!
//! Eviction follows insertion order only; a lookup does not refresh an
//! entry's position.

use crate::types::PredictionResult;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
pub struct PredictionCache {
    capacity: usize,
    entries: HashMap<u64, PredictionResult>,
    order: VecDeque<u64>,
}

impl PredictionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: u64) -> Option<&PredictionResult> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: u64) -> bool {
        self.entries.contains_key(&key)
    }

    /// Store `result`, evicting the oldest entry when full.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: u64, result: PredictionResult) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = result;
            return;
        }
        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key);
        self.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
