//! A single student's help request and its lifecycle.

use std::fmt;
use std::str::FromStr;

use crate::entity::queue_entry;
use crate::error::{Precondition, StoreError};

/// Lifecycle of a help request.
///
/// ```text
/// Waiting --> Conversing --> Resolved
/// ```
///
/// A `Waiting` entry may also leave the queue without any status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StudentStatus {
    #[default]
    Waiting,
    Conversing,
    Resolved,
}

impl StudentStatus {
    /// Column representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Conversing => "conversing",
            Self::Resolved => "resolved",
        }
    }

    /// Validates a transition and returns the new status.
    ///
    /// Only `Waiting -> Conversing` and `Conversing -> Resolved` are legal.
    pub fn transition_to(self, next: StudentStatus) -> Result<StudentStatus, Precondition> {
        match (self, next) {
            (Self::Waiting, Self::Conversing) | (Self::Conversing, Self::Resolved) => Ok(next),
            (from, to) => Err(Precondition::IllegalTransition { from, to }),
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "conversing" => Ok(Self::Conversing),
            "resolved" => Ok(Self::Resolved),
            other => Err(StoreError::Decode(format!("unknown student status `{other}`"))),
        }
    }
}

/// Optional fields supplied when a student joins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryOptions {
    pub question: Option<String>,
    pub private_entry: bool,
}

/// One student's place in a [`Queue`](crate::Queue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Database id, `None` until the entry row has been inserted.
    pub id: Option<i32>,
    pub user_id: String,
    pub question: Option<String>,
    pub private_entry: bool,
    pub resolved: StudentStatus,
}

impl QueueEntry {
    /// Creates an unsaved entry in the `Waiting` state.
    pub fn new(user_id: impl Into<String>, options: EntryOptions) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            question: options.question,
            private_entry: options.private_entry,
            resolved: StudentStatus::Waiting,
        }
    }

    /// Builds an entry from its stored row.
    pub fn from_model(model: queue_entry::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: Some(model.id),
            resolved: model.resolved.parse()?,
            user_id: model.user_id,
            question: model.question,
            private_entry: model.private_entry,
        })
    }

    /// Overwrites the status without checking the transition.
    pub fn set_resolved_state(&mut self, status: StudentStatus) {
        self.resolved = status;
    }

    /// Moves to `next` if the lifecycle allows it.
    pub fn advance(&mut self, next: StudentStatus) -> Result<(), Precondition> {
        self.resolved = self.resolved.transition_to(next)?;
        Ok(())
    }
}

impl fmt::Display for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {} ({})", self.user_id, self.resolved)?;
        if let Some(question) = &self.question {
            write!(f, ": {question}")?;
        }
        Ok(())
    }
}
