//! Error types for the office-hours queue.

use thiserror::Error;

use crate::entry::StudentStatus;

/// Errors raised by a [`QueueStore`](crate::QueueStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected or failed to run a statement.
    #[error("backend error: {0}")]
    Backend(String),

    /// A value could not be converted into its column representation.
    #[error("encode error: {0}")]
    Encode(String),

    /// A stored column held a value the domain types cannot represent.
    #[error("decode error: {0}")]
    Decode(String),

    /// An update targeted a row that does not exist.
    #[error("no {table} row with id {id}")]
    NotFound { table: &'static str, id: i32 },
}

/// Errors raised by a [`ChatTransport`](crate::ChatTransport) implementation.
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// A command was issued while the session or entry state did not allow it.
///
/// The `Display` text is the message shown to whoever issued the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("Currently no office hours being held. Please check the schedule to confirm the next office hours session!")]
    NoActiveSession,

    #[error("Office hour already in progress. End active office hour with the command \"end office hour\"")]
    SessionAlreadyActive,

    #[error("You are already in queue.")]
    AlreadyEnqueued,

    #[error("You are currently not in line for office hours!")]
    NotEnqueued,

    #[error("You are being helped right now. Ask the instructor to finish with 'mark student complete' instead of leaving.")]
    StillConversing,

    #[error("Unable to mark student as completed - there are no students conversing with an instructor.")]
    NobodyConversing,

    #[error("Have you finished helping the other student? Please resolve the conversation with the current student via 'mark student complete'. Currently needs resolving: {current}")]
    AlreadyConversing { current: String },

    #[error("There are currently no students in line!")]
    QueueEmpty,

    #[error("There are no students in queue looking for help right now.")]
    NobodyWaiting,

    #[error("A student cannot move from {from} to {to}.")]
    IllegalTransition {
        from: StudentStatus,
        to: StudentStatus,
    },
}

impl Precondition {
    /// Whether the message concerns the caller's own queue membership.
    pub fn addresses_caller(&self) -> bool {
        matches!(
            self,
            Self::AlreadyEnqueued | Self::NotEnqueued | Self::StillConversing
        )
    }
}

/// The result error of every controller command.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Recoverable: reported back to the caller, nothing was mutated.
    #[error(transparent)]
    Precondition(#[from] Precondition),

    /// The store failed while `context` was being persisted.
    #[error("failed to {context}: {source}")]
    PersistenceFailed {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// A display name or member list could not be fetched. `subject` names
    /// the user or channel that was being looked up.
    #[error("failed to resolve {subject}: {source}")]
    IdentityResolutionFailed {
        subject: String,
        #[source]
        source: TransportError,
    },

    /// A reply could not be delivered.
    #[error("failed to deliver reply: {0}")]
    DeliveryFailed(#[source] TransportError),

    /// An in-memory record that should carry a database id does not.
    #[error("{0} has not been persisted yet")]
    NotPersisted(&'static str),
}

impl QueueError {
    /// Returns the precondition that was violated, if this is a recoverable error.
    pub fn precondition(&self) -> Option<&Precondition> {
        match self {
            Self::Precondition(p) => Some(p),
            _ => None,
        }
    }
}
