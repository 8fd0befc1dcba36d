#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use office_hours_queue::{
    ChatTransport, EntryOptions, Inbound, Member, OfficeHours, Queue, QueueEntry, QueueStatus,
    QueueStore, Reply, StoreError, StudentStatus, TransportError,
};

pub const CHANNEL: &str = "cs101";

/// What the fake store has persisted, plus a log of every call made to it.
#[derive(Debug, Default)]
pub struct StoreState {
    pub queues: Vec<(i32, String, String, QueueStatus)>,
    pub entries: Vec<(i32, i32, String, EntryOptions, StudentStatus)>,
    pub calls: Vec<&'static str>,
    pub fail_next: bool,
}

/// In-memory `QueueStore` that records calls and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub state: Mutex<StoreState>,
}

impl RecordingStore {
    pub fn fail_next_call(&self) {
        self.state.lock().unwrap().fail_next = true;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn entry_status(&self, user_id: &str) -> Option<StudentStatus> {
        self.state
            .lock()
            .unwrap()
            .entries
            .iter()
            .rev()
            .find(|e| e.2 == user_id)
            .map(|e| e.4)
    }

    pub fn queue_status(&self, queue_id: i32) -> Option<QueueStatus> {
        self.state
            .lock()
            .unwrap()
            .queues
            .iter()
            .find(|q| q.0 == queue_id)
            .map(|q| q.3)
    }

    fn begin(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, StoreState>, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if std::mem::take(&mut state.fail_next) {
            return Err(StoreError::Backend("connection reset".into()));
        }
        Ok(state)
    }
}

#[async_trait]
impl QueueStore for RecordingStore {
    async fn create_queue(&self, owner_id: &str, channel_id: &str) -> Result<Queue, StoreError> {
        let mut state = self.begin("create_queue")?;
        let id = state.queues.len() as i32 + 1;
        state
            .queues
            .push((id, owner_id.into(), channel_id.into(), QueueStatus::Open));
        let mut queue = Queue::new(owner_id, channel_id);
        queue.update_id(id);
        Ok(queue)
    }

    async fn update_queue_status(
        &self,
        queue_id: i32,
        status: QueueStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.begin("update_queue_status")?;
        let queue = state
            .queues
            .iter_mut()
            .find(|q| q.0 == queue_id)
            .ok_or(StoreError::NotFound {
                table: "office_hours_queue",
                id: queue_id,
            })?;
        queue.3 = status;
        Ok(())
    }

    async fn create_queue_entry(
        &self,
        user_id: &str,
        queue_id: i32,
        options: EntryOptions,
    ) -> Result<QueueEntry, StoreError> {
        let mut state = self.begin("create_queue_entry")?;
        let id = state.entries.len() as i32 + 1;
        state.entries.push((
            id,
            queue_id,
            user_id.into(),
            options.clone(),
            StudentStatus::Waiting,
        ));
        let mut entry = QueueEntry::new(user_id, options);
        entry.id = Some(id);
        Ok(entry)
    }

    async fn update_queue_entry_status(
        &self,
        entry_id: i32,
        status: StudentStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.begin("update_queue_entry_status")?;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.0 == entry_id)
            .ok_or(StoreError::NotFound {
                table: "office_hours_queue_entry",
                id: entry_id,
            })?;
        entry.4 = status;
        Ok(())
    }

    async fn list_queues_by_owner(
        &self,
        owner_id: &str,
        channel_id: &str,
    ) -> Result<Vec<Queue>, StoreError> {
        let state = self.begin("list_queues_by_owner")?;
        Ok(state
            .queues
            .iter()
            .filter(|q| q.1 == owner_id && q.2 == channel_id)
            .map(|q| {
                let mut queue = Queue::new(&q.1, &q.2);
                queue.update_id(q.0);
                queue.update_status(q.3);
                queue
            })
            .collect())
    }

    async fn list_queue_entries(&self, queue_id: i32) -> Result<Vec<QueueEntry>, StoreError> {
        let state = self.begin("list_queue_entries")?;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.1 == queue_id)
            .map(|e| {
                let mut entry = QueueEntry::new(&e.2, e.3.clone());
                entry.id = Some(e.0);
                entry.set_resolved_state(e.4);
                entry
            })
            .collect())
    }
}

/// A chat channel with a fixed member list that records posted replies.
#[derive(Debug, Default)]
pub struct FakeChannel {
    pub members: HashMap<String, String>,
    pub sent: Mutex<Vec<(String, Reply)>>,
    pub lookups_fail: AtomicBool,
    pub sends_fail: AtomicBool,
}

impl FakeChannel {
    pub fn with_members(names: &[&str]) -> Self {
        Self {
            members: names
                .iter()
                .map(|n| (n.to_string(), capitalize(n)))
                .collect(),
            ..Default::default()
        }
    }

    /// Makes every member lookup fail from now on.
    pub fn fail_lookups(&self) {
        self.lookups_fail.store(true, Ordering::SeqCst);
    }

    /// Makes every delivery fail from now on.
    pub fn fail_sends(&self) {
        self.sends_fail.store(true, Ordering::SeqCst);
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.text.clone())
            .collect()
    }
}

#[async_trait]
impl ChatTransport for FakeChannel {
    async fn resolve_member(&self, _channel_id: &str, user_id: &str) -> Result<Member, TransportError> {
        if self.lookups_fail.load(Ordering::SeqCst) {
            return Err(TransportError("directory unavailable".into()));
        }
        self.members
            .get(user_id)
            .map(|name| Member::new(user_id, name.clone()))
            .ok_or_else(|| TransportError(format!("unknown member {user_id}")))
    }

    async fn list_channel_members(&self, _channel_id: &str) -> Result<Vec<Member>, TransportError> {
        if self.lookups_fail.load(Ordering::SeqCst) {
            return Err(TransportError("directory unavailable".into()));
        }
        Ok(self
            .members
            .iter()
            .map(|(id, name)| Member::new(id.clone(), name.clone()))
            .collect())
    }

    async fn send_message(&self, channel_id: &str, reply: &Reply) -> Result<(), TransportError> {
        if self.sends_fail.load(Ordering::SeqCst) {
            return Err(TransportError("rate limited".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), reply.clone()));
        Ok(())
    }

    fn mention(&self, member: &Member) -> String {
        format!("@{}", member.name)
    }
}

pub type Bot = OfficeHours<RecordingStore, FakeChannel>;

pub const MEMBERS: [&str; 4] = ["prof", "alice", "bob", "carol"];

pub fn bot() -> Bot {
    OfficeHours::new(RecordingStore::default(), FakeChannel::with_members(&MEMBERS))
}

/// Stored status of every entry of session `queue_id`, by user id.
pub fn stored_entries(bot: &Bot, queue_id: i32) -> Vec<(String, StudentStatus)> {
    bot.store()
        .state
        .lock()
        .unwrap()
        .entries
        .iter()
        .filter(|e| e.1 == queue_id)
        .map(|e| (e.2.clone(), e.4))
        .collect()
}

pub fn say(user_id: &str, text: &str) -> Inbound {
    say_in(CHANNEL, user_id, text)
}

pub fn say_in(channel_id: &str, user_id: &str, text: &str) -> Inbound {
    Inbound {
        sender: Member::new(user_id, capitalize(user_id)),
        channel_id: channel_id.to_string(),
        text: text.to_string(),
    }
}

/// Snapshot of the active queue in `channel_id`.
pub async fn active_queue(bot: &Bot, channel_id: &str) -> Option<Queue> {
    bot.sessions().lock().await.get(channel_id).cloned()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
