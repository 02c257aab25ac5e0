use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::error::SinkError;
use super::traits::Destination;

/// Concurrent in-memory destination using DashMap
///
/// Items are grouped by producing branch. Within one branch the arrival
/// order is preserved; across branches there is no ordering.
pub struct CollectingSink<T> {
    items: DashMap<usize, Vec<T>>,
    finished: AtomicBool,
}

impl<T> CollectingSink<T> {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            finished: AtomicBool::new(false),
        }
    }

    /// Whether `finish` has been called
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Total number of items received from all branches
    pub fn len(&self) -> usize {
        self.items.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> CollectingSink<T> {
    /// Items received from one branch, in arrival order
    pub fn items_for(&self, branch: usize) -> Vec<T> {
        self.items
            .get(&branch)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    /// All items, grouped by ascending branch index
    pub fn items(&self) -> Vec<T> {
        let mut branches: Vec<usize> = self.items.iter().map(|entry| *entry.key()).collect();
        branches.sort_unstable();

        branches
            .into_iter()
            .flat_map(|branch| self.items_for(branch))
            .collect()
    }
}

impl<T> Default for CollectingSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Destination<T> for CollectingSink<T> {
    async fn send(&self, branch: usize, item: T) -> Result<(), SinkError> {
        if self.is_finished() {
            return Err(SinkError::Finished);
        }

        // DashMap holds a per-shard lock for the duration of the push
        self.items.entry(branch).or_default().push(item);
        Ok(())
    }

    async fn finish(&self) -> Result<(), SinkError> {
        self.finished.store(true, Ordering::Release);
        Ok(())
    }
}
