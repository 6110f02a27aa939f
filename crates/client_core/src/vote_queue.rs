//! Per-link serialization of votes so that two quick clicks on the same link
//! apply their local updates and requests in order.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use shared::domain::LinkId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Lane = Arc<AsyncMutex<()>>;

#[derive(Default)]
pub(crate) struct VoteQueue {
    lanes: Mutex<HashMap<LinkId, Lane>>,
}

pub(crate) struct VoteTicket<'a> {
    queue: &'a VoteQueue,
    id: LinkId,
    _guard: OwnedMutexGuard<()>,
}

impl VoteQueue {
    /// Waits until no other vote on `id` is in flight.
    pub(crate) async fn acquire(&self, id: &LinkId) -> VoteTicket<'_> {
        let lane = {
            let mut lanes = self.lanes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            lanes.entry(id.clone()).or_default().clone()
        };
        let guard = lane.lock_owned().await;
        VoteTicket {
            queue: self,
            id: id.clone(),
            _guard: guard,
        }
    }

    #[cfg(test)]
    pub(crate) fn active_lanes(&self) -> usize {
        self.lanes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Drop for VoteTicket<'_> {
    fn drop(&mut self) {
        let mut lanes = self
            .queue
            .lanes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Only the map and this ticket's guard hold the lane: nobody is waiting.
        if lanes
            .get(&self.id)
            .is_some_and(|lane| Arc::strong_count(lane) <= 2)
        {
            lanes.remove(&self.id);
        }
    }
}

#[cfg(test)]
#[path = "tests/vote_queue_tests.rs"]
mod tests;
