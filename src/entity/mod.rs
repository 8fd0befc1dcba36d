//! Database entity models for office-hours-queue.
//!
//! These are the Sea-ORM entity definitions backing [`SeaOrmStore`](crate::SeaOrmStore).
//! They are the durable projection of the in-memory [`Queue`](crate::Queue) and
//! [`QueueEntry`](crate::QueueEntry) types: a queue row records who opened a session
//! and where, and each entry row records one student's request together with its
//! latest status. Entry rows are never deleted, so resolved requests remain as history.

/// Office-hours session rows.
pub mod queue;

/// Help-request rows belonging to a session.
pub mod queue_entry;
