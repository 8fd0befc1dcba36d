//! The ordered collection of help requests for one office-hours session.
//!
//! [`Queue`] is plain in-memory state. It never talks to storage and it does not
//! enforce admission policy: the controller checks membership before calling
//! [`Queue::enqueue`] and checks for a conversing student before promoting one.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use time::macros::format_description;
use time::OffsetDateTime;

use crate::entity::queue;
use crate::entry::{QueueEntry, StudentStatus};
use crate::error::{QueueError, StoreError, TransportError};
use crate::store::from_db_timestamp;

/// Whether a session is accepting students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueueStatus {
    #[default]
    Open,
    Closed,
}

impl QueueStatus {
    /// Column representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(StoreError::Decode(format!("unknown queue status `{other}`"))),
        }
    }
}

/// One office-hours session and its students in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue {
    /// Database id, set through [`Queue::update_id`] once the row exists.
    pub id: Option<i32>,
    pub owner_id: String,
    pub channel_id: String,
    pub status: QueueStatus,
    pub opened_at: Option<OffsetDateTime>,
    entries: Vec<QueueEntry>,
}

impl Queue {
    /// Creates an empty, open, unsaved queue.
    pub fn new(owner_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            id: None,
            owner_id: owner_id.into(),
            channel_id: channel_id.into(),
            status: QueueStatus::Open,
            opened_at: None,
            entries: Vec::new(),
        }
    }

    /// Builds a queue from its stored row, without entries.
    pub fn from_model(model: queue::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: Some(model.id),
            status: model.status.parse()?,
            opened_at: Some(from_db_timestamp(model.opened_at)?),
            owner_id: model.owner_id,
            channel_id: model.channel_id,
            entries: Vec::new(),
        })
    }

    /// Current entries, earliest arrival first.
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Appends `entry` at the back. Uniqueness of `user_id` is the caller's concern.
    pub fn enqueue(&mut self, entry: QueueEntry) {
        self.entries.push(entry);
    }

    /// Whether `user_id` currently has an entry.
    pub fn check_queue(&self, user_id: &str) -> bool {
        self.entries.iter().any(|e| e.user_id == user_id)
    }

    /// Zero-based arrival position of `user_id`.
    pub fn get_queue_position(&self, user_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.user_id == user_id)
    }

    /// Removes and returns the entry of `user_id`, keeping the others in order.
    pub fn dequeue_student(&mut self, user_id: &str) -> Option<QueueEntry> {
        let index = self.get_queue_position(user_id)?;
        Some(self.entries.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Earliest-arrived entry that is still waiting.
    pub fn find_first_waiting(&self) -> Option<&QueueEntry> {
        self.entries
            .iter()
            .find(|e| e.resolved == StudentStatus::Waiting)
    }

    /// The entry currently being helped.
    pub fn find_first_conversing(&self) -> Option<&QueueEntry> {
        self.entries
            .iter()
            .find(|e| e.resolved == StudentStatus::Conversing)
    }

    pub(crate) fn entry_mut(&mut self, user_id: &str) -> Option<&mut QueueEntry> {
        self.entries.iter_mut().find(|e| e.user_id == user_id)
    }

    /// Renders the queue using `names` (user id to display name).
    ///
    /// Questions of private entries are left out. Fails if an entry's user has
    /// no name in `names`.
    pub fn get_names_in_queue(&self, names: &HashMap<String, String>) -> Result<String, QueueError> {
        if self.entries.is_empty() {
            return Ok("No students are in the queue.".to_string());
        }

        let mut out = String::from("Students in queue:");
        for (index, entry) in self.entries.iter().enumerate() {
            let name = names.get(&entry.user_id).ok_or_else(|| {
                QueueError::IdentityResolutionFailed {
                    subject: entry.user_id.clone(),
                    source: TransportError("not a member of this channel".to_string()),
                }
            })?;

            out.push_str(&format!("\n{}. {name}", index + 1));
            if entry.resolved == StudentStatus::Conversing {
                out.push_str(" (with instructor)");
            }
            match (&entry.question, entry.private_entry) {
                (_, true) => out.push_str(" (private)"),
                (Some(question), false) if !question.is_empty() => {
                    out.push_str(&format!(": {question}"))
                }
                _ => {}
            }
        }
        Ok(out)
    }

    pub fn update_status(&mut self, status: QueueStatus) {
        self.status = status;
    }

    /// Records the id assigned when the queue row was created.
    pub fn update_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    /// One-line summary of the session itself, used when listing past sessions.
    pub fn properties_to_string(&self) -> String {
        let id = self
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unsaved".to_string());
        let opened = self
            .opened_at
            .and_then(|t| {
                t.format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
                    .ok()
            })
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "Office hours #{id} in {}: {} (opened {opened})",
            self.channel_id, self.status
        )
    }
}
