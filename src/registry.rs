//! Active sessions, one per channel.

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard};

use crate::queue::Queue;

/// The open queues of this process, keyed by channel id.
#[derive(Debug, Default)]
pub struct Sessions {
    by_channel: HashMap<String, Queue>,
}

impl Sessions {
    pub fn get(&self, channel_id: &str) -> Option<&Queue> {
        self.by_channel.get(channel_id)
    }

    pub fn get_mut(&mut self, channel_id: &str) -> Option<&mut Queue> {
        self.by_channel.get_mut(channel_id)
    }

    /// Installs `queue` as the active session of its channel, returning any
    /// session it displaced.
    pub fn insert(&mut self, queue: Queue) -> Option<Queue> {
        self.by_channel.insert(queue.channel_id.clone(), queue)
    }

    pub fn remove(&mut self, channel_id: &str) -> Option<Queue> {
        self.by_channel.remove(channel_id)
    }

    pub fn len(&self) -> usize {
        self.by_channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_channel.is_empty()
    }
}

/// Serializes every command behind a single lock.
///
/// The guard is held across the persistence round trip of a command, so two
/// commands can never both observe "nobody conversing" or both admit the same
/// student.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: Mutex<Sessions>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.inner.lock().await
    }
}
