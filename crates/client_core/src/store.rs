use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        RwLock,
    },
};

use serde_json::Value;
use shared::domain::{apply_vote_to_link, related_link_id, LinkId, PostId, VoteDirection};
use tracing::debug;

use crate::{AuthState, LinkStore};

/// Process-local application state: the login flag and the related links
/// loaded per post.
#[derive(Default)]
pub struct MemoryStore {
    logged_in: AtomicBool,
    related_links: RwLock<HashMap<PostId, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new(logged_in: bool) -> Self {
        Self {
            logged_in: AtomicBool::new(logged_in),
            related_links: RwLock::default(),
        }
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.logged_in.store(logged_in, Ordering::SeqCst);
    }

    pub fn related_links(&self, post_id: &PostId) -> Vec<Value> {
        self.related_links
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(post_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl AuthState for MemoryStore {
    fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }
}

impl LinkStore for MemoryStore {
    fn apply_vote(&self, id: &LinkId, post_id: &PostId, direction: VoteDirection) {
        let mut all = self
            .related_links
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(link) = all.get_mut(post_id).and_then(|links| {
            links
                .iter_mut()
                .find(|link| related_link_id(link).as_deref() == Some(id.as_str()))
        }) else {
            debug!(link_id = %id, post_id = %post_id, "store: vote for unknown link ignored");
            return;
        };
        apply_vote_to_link(link, direction);
    }

    fn set_related_links(&self, post_id: &PostId, links: &[Value]) {
        self.related_links
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(post_id.clone(), links.to_vec());
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
