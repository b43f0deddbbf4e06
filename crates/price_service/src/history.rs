//! Bounded log of recent predictions

use crate::types::HistoryEntry;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

const EXCERPT_CHARS: usize = 50;

/// First 50 characters of `title`, with `...` appended when truncated.
pub fn title_excerpt(title: &str) -> String {
    match title.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &title[..cut]),
        None => title.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, title: &str, price: f64, confidence: f64, timestamp: DateTime<Utc>) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            title_excerpt: title_excerpt(title),
            price,
            confidence,
            timestamp,
        });
    }

    /// The most recent `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
