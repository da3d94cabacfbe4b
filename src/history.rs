//! Rolling log of recent detections.
//!
//! Keeps the last N detections reported to the operator, oldest evicted
//! first. The session clears it when a scan starts and when the scan mode
//! changes, so entries always belong to the current mode.

use std::collections::VecDeque;

use serde::Serialize;

use crate::detect::Detection;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub detection: Detection,
    /// Timestamp of the result the detection came from, epoch ms.
    pub timestamp: u64,
}

#[derive(Clone, Debug)]
pub struct ScanHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl ScanHistory {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, detection: Detection, timestamp: u64) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            detection,
            timestamp,
        });
    }

    pub fn extend_from(&mut self, detections: &[Detection], timestamp: u64) {
        for detection in detections {
            self.push(detection.clone(), timestamp);
        }
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
