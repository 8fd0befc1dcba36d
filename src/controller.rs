//! Turns chat commands into queue transitions.
//!
//! Every mutating command follows the same three steps: check the preconditions
//! against the channel's active [`Queue`], persist the change through the
//! [`QueueStore`], and only then apply it in memory. A store failure therefore
//! leaves the in-memory queue exactly as it was before the command.

use std::collections::HashMap;

use crate::command::Command;
use crate::entry::{EntryOptions, StudentStatus};
use crate::error::{Precondition, QueueError, StoreError};
use crate::queue::{Queue, QueueStatus};
use crate::registry::{SessionRegistry, Sessions};
use crate::store::QueueStore;
use crate::transport::{ChatTransport, Inbound, Member, Reply};

/// The office-hours bot: a session registry plus its two collaborators.
///
/// # Usage
///
/// ```no_run
/// use office_hours_queue::{ChatTransport, Inbound, OfficeHours, QueueStore};
///
/// # async fn example<S: QueueStore, T: ChatTransport>(store: S, transport: T, inbound: Inbound)
/// #     -> Result<(), office_hours_queue::QueueError> {
/// let bot = OfficeHours::new(store, transport);
///
/// // Parses the text, applies the command and posts the replies.
/// bot.respond(&inbound).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OfficeHours<S, T> {
    store: S,
    transport: T,
    sessions: SessionRegistry,
}

impl<S: QueueStore, T: ChatTransport> OfficeHours<S, T> {
    /// Creates a bot with no active sessions.
    pub fn new(store: S, transport: T) -> Self {
        Self::with_registry(store, transport, SessionRegistry::new())
    }

    /// Creates a bot that serves the sessions already held in `sessions`.
    pub fn with_registry(store: S, transport: T, sessions: SessionRegistry) -> Self {
        Self {
            store,
            transport,
            sessions,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Handles one inbound message and delivers the replies.
    ///
    /// Precondition violations become a reply to the sender. Every other error
    /// is returned after being logged where it happened.
    pub async fn respond(&self, inbound: &Inbound) -> Result<(), QueueError> {
        let replies = match self.handle(inbound).await {
            Ok(replies) => replies,
            Err(QueueError::Precondition(violation)) => {
                vec![self.precondition_reply(inbound, &violation)]
            }
            Err(e) => return Err(e),
        };

        for reply in &replies {
            self.transport
                .send_message(&inbound.channel_id, reply)
                .await
                .map_err(|e| {
                    tracing::error!(channel_id = %inbound.channel_id, error = %e, "failed to deliver reply");
                    QueueError::DeliveryFailed(e)
                })?;
        }
        Ok(())
    }

    /// Applies the command in `inbound`, if any, and returns the replies to post.
    ///
    /// Text that is not a command yields no replies. All commands are
    /// serialized through the session registry lock.
    pub async fn handle(&self, inbound: &Inbound) -> Result<Vec<Reply>, QueueError> {
        let Some(command) = Command::parse(&inbound.text) else {
            return Ok(Vec::new());
        };

        tracing::debug!(
            command = command.name(),
            channel_id = %inbound.channel_id,
            user_id = %inbound.sender.id,
            "handling command"
        );

        let mut sessions = self.sessions.lock().await;
        match command {
            Command::OpenSession => self.open_session(&mut sessions, inbound).await,
            Command::CloseSession => self.close_session(&mut sessions, inbound).await,
            Command::LeaveQueue => self.leave_queue(&mut sessions, inbound),
            Command::QueryPosition => self.query_position(&sessions, inbound),
            Command::ListOwnedSessions => self.list_owned_sessions(inbound).await,
            Command::ListActiveMembers => self.list_active_members(&sessions, inbound).await,
            Command::MarkCurrentComplete => {
                self.mark_current_complete(&mut sessions, inbound).await
            }
            Command::CallNext => self.call_next(&mut sessions, inbound).await,
            Command::JoinQueue(options) => self.join_queue(&mut sessions, inbound, options).await,
        }
    }

    async fn open_session(
        &self,
        sessions: &mut Sessions,
        inbound: &Inbound,
    ) -> Result<Vec<Reply>, QueueError> {
        if sessions.get(&inbound.channel_id).is_some() {
            return Err(Precondition::SessionAlreadyActive.into());
        }

        let mut queue = Queue::new(&inbound.sender.id, &inbound.channel_id);
        let record = self
            .store
            .create_queue(&queue.owner_id, &queue.channel_id)
            .await
            .map_err(persistence_failed("create the queue"))?;
        queue.update_id(record.id.ok_or(QueueError::NotPersisted("queue"))?);
        queue.opened_at = record.opened_at;

        tracing::info!(
            queue_id = ?queue.id,
            channel_id = %queue.channel_id,
            owner_id = %queue.owner_id,
            "office hours opened"
        );
        sessions.insert(queue);

        Ok(vec![Reply::text(
            "Office hours have started! Use the bot command \"join office hours\" to get in line.",
        )])
    }

    async fn close_session(
        &self,
        sessions: &mut Sessions,
        inbound: &Inbound,
    ) -> Result<Vec<Reply>, QueueError> {
        let queue = active(sessions.get(&inbound.channel_id))?;
        let queue_id = queue.id.ok_or(QueueError::NotPersisted("queue"))?;

        self.store
            .update_queue_status(queue_id, QueueStatus::Closed)
            .await
            .map_err(persistence_failed("close the queue"))?;

        if let Some(mut queue) = sessions.remove(&inbound.channel_id) {
            queue.update_status(QueueStatus::Closed);
            tracing::info!(
                queue_id,
                channel_id = %queue.channel_id,
                abandoned = queue.len(),
                "office hours closed"
            );
        }

        Ok(vec![Reply::text("Office hour successfully ended.")])
    }

    // Leaving only evicts the in-memory entry; the stored row stays `waiting`.
    fn leave_queue(
        &self,
        sessions: &mut Sessions,
        inbound: &Inbound,
    ) -> Result<Vec<Reply>, QueueError> {
        let queue = active(sessions.get_mut(&inbound.channel_id))?;
        match queue.entries().iter().find(|e| e.user_id == inbound.sender.id) {
            None => return Err(Precondition::NotEnqueued.into()),
            Some(e) if e.resolved != StudentStatus::Waiting => {
                return Err(Precondition::StillConversing.into())
            }
            Some(_) => {}
        }
        let entry = queue
            .dequeue_student(&inbound.sender.id)
            .ok_or(Precondition::NotEnqueued)?;

        tracing::info!(
            queue_id = ?queue.id,
            entry_id = ?entry.id,
            user_id = %entry.user_id,
            "student left the queue"
        );

        Ok(vec![self.to_sender(
            inbound,
            "You have successfully been removed from the queue.",
        )])
    }

    fn query_position(&self, sessions: &Sessions, inbound: &Inbound) -> Result<Vec<Reply>, QueueError> {
        let queue = active(sessions.get(&inbound.channel_id))?;
        let position = queue
            .get_queue_position(&inbound.sender.id)
            .ok_or(Precondition::NotEnqueued)?;

        Ok(vec![self.to_sender(
            inbound,
            &format!("You are currently in position {}.", position + 1),
        )])
    }

    async fn list_owned_sessions(&self, inbound: &Inbound) -> Result<Vec<Reply>, QueueError> {
        let queues = self
            .store
            .list_queues_by_owner(&inbound.sender.id, &inbound.channel_id)
            .await
            .map_err(persistence_failed("list the owner's queues"))?;

        if queues.is_empty() {
            return Ok(vec![Reply::text(
                "You have not held any office hours in this channel.",
            )]);
        }

        let mut replies = Vec::with_capacity(queues.len());
        for queue in queues {
            let Some(queue_id) = queue.id else {
                continue;
            };
            let entries = self
                .store
                .list_queue_entries(queue_id)
                .await
                .map_err(persistence_failed("list the queue's entries"))?;
            let resolved = entries
                .iter()
                .filter(|e| e.resolved == StudentStatus::Resolved)
                .count();
            replies.push(Reply::text(format!(
                "{}; {} requests, {resolved} resolved",
                queue.properties_to_string(),
                entries.len()
            )));
        }
        Ok(replies)
    }

    async fn list_active_members(
        &self,
        sessions: &Sessions,
        inbound: &Inbound,
    ) -> Result<Vec<Reply>, QueueError> {
        let queue = active(sessions.get(&inbound.channel_id))?;

        let members = self
            .transport
            .list_channel_members(&inbound.channel_id)
            .await
            .map_err(|source| {
                tracing::error!(channel_id = %inbound.channel_id, error = %source, "failed to list channel members");
                QueueError::IdentityResolutionFailed {
                    subject: format!("members of channel {}", inbound.channel_id),
                    source,
                }
            })?;
        let names: HashMap<String, String> = members.into_iter().map(|m| (m.id, m.name)).collect();

        let listing = queue.get_names_in_queue(&names).inspect_err(|e| {
            tracing::error!(channel_id = %inbound.channel_id, error = %e, "failed to render queue");
        })?;
        Ok(vec![Reply::text(listing)])
    }

    async fn mark_current_complete(
        &self,
        sessions: &mut Sessions,
        inbound: &Inbound,
    ) -> Result<Vec<Reply>, QueueError> {
        let queue = active(sessions.get_mut(&inbound.channel_id))?;
        let current = queue
            .find_first_conversing()
            .ok_or(Precondition::NobodyConversing)?;
        let status = current.resolved.transition_to(StudentStatus::Resolved)?;
        let entry_id = current.id.ok_or(QueueError::NotPersisted("queue entry"))?;
        let user_id = current.user_id.clone();

        self.store
            .update_queue_entry_status(entry_id, status)
            .await
            .map_err(persistence_failed("mark the student resolved"))?;

        if let Some(entry) = queue.entry_mut(&user_id) {
            entry.set_resolved_state(status);
        }
        queue.dequeue_student(&user_id);
        tracing::info!(queue_id = ?queue.id, entry_id, user_id = %user_id, "student resolved");

        let student = self.resolve_member(&inbound.channel_id, &user_id).await?;
        Ok(vec![Reply::text(format!(
            "Conversation with {} is finished and they have been removed from the queue.",
            student.name
        ))])
    }

    async fn call_next(
        &self,
        sessions: &mut Sessions,
        inbound: &Inbound,
    ) -> Result<Vec<Reply>, QueueError> {
        let queue = active(sessions.get_mut(&inbound.channel_id))?;
        if let Some(current) = queue.find_first_conversing() {
            return Err(Precondition::AlreadyConversing {
                current: current.to_string(),
            }
            .into());
        }
        if queue.is_empty() {
            return Err(Precondition::QueueEmpty.into());
        }
        let next = queue
            .find_first_waiting()
            .ok_or(Precondition::NobodyWaiting)?;
        let status = next.resolved.transition_to(StudentStatus::Conversing)?;
        let entry_id = next.id.ok_or(QueueError::NotPersisted("queue entry"))?;
        let user_id = next.user_id.clone();

        self.store
            .update_queue_entry_status(entry_id, status)
            .await
            .map_err(persistence_failed("mark the student conversing"))?;

        if let Some(entry) = queue.entry_mut(&user_id) {
            entry.set_resolved_state(status);
        }
        tracing::info!(queue_id = ?queue.id, entry_id, user_id = %user_id, "student called");

        let student = self.resolve_member(&inbound.channel_id, &user_id).await?;
        let instructor = inbound.sender.clone();
        Ok(vec![
            Reply::text(format!("Next student to be helped is {}", student.name)),
            Reply::mentioning(
                format!(
                    "Hello {}! It is your turn to get help during this office hours. Please chat or call {} to get the conversation started.",
                    self.transport.mention(&student),
                    self.transport.mention(&instructor)
                ),
                vec![student, instructor],
            ),
        ])
    }

    async fn join_queue(
        &self,
        sessions: &mut Sessions,
        inbound: &Inbound,
        options: EntryOptions,
    ) -> Result<Vec<Reply>, QueueError> {
        let queue = active(sessions.get_mut(&inbound.channel_id))?;
        if queue.check_queue(&inbound.sender.id) {
            return Err(Precondition::AlreadyEnqueued.into());
        }
        let queue_id = queue.id.ok_or(QueueError::NotPersisted("queue"))?;

        let entry = self
            .store
            .create_queue_entry(&inbound.sender.id, queue_id, options)
            .await
            .map_err(persistence_failed("add the student to the queue"))?;

        tracing::info!(
            queue_id,
            entry_id = ?entry.id,
            user_id = %entry.user_id,
            private = entry.private_entry,
            "student joined the queue"
        );
        queue.enqueue(entry);
        let position = queue
            .get_queue_position(&inbound.sender.id)
            .map_or(queue.len(), |p| p + 1);

        Ok(vec![self.to_sender(
            inbound,
            &format!(
                "You have entered the office hours queue, the instructor will get to you! You are in position {position}."
            ),
        )])
    }

    async fn resolve_member(&self, channel_id: &str, user_id: &str) -> Result<Member, QueueError> {
        self.transport
            .resolve_member(channel_id, user_id)
            .await
            .map_err(|source| {
                tracing::error!(channel_id, user_id, error = %source, "failed to resolve member");
                QueueError::IdentityResolutionFailed {
                    subject: user_id.to_string(),
                    source,
                }
            })
    }

    // "Hello @sender! <text>" with the sender mentioned.
    fn to_sender(&self, inbound: &Inbound, text: &str) -> Reply {
        Reply::mentioning(
            format!("Hello {}! {text}", self.transport.mention(&inbound.sender)),
            vec![inbound.sender.clone()],
        )
    }

    fn precondition_reply(&self, inbound: &Inbound, violation: &Precondition) -> Reply {
        tracing::debug!(
            channel_id = %inbound.channel_id,
            user_id = %inbound.sender.id,
            %violation,
            "command rejected"
        );
        if violation.addresses_caller() {
            self.to_sender(inbound, &violation.to_string())
        } else {
            Reply::text(violation.to_string())
        }
    }
}

fn active<Q>(queue: Option<Q>) -> Result<Q, Precondition> {
    queue.ok_or(Precondition::NoActiveSession)
}

fn persistence_failed(context: &'static str) -> impl FnOnce(StoreError) -> QueueError {
    move |source| {
        tracing::error!(error = %source, "failed to {context}");
        QueueError::PersistenceFailed { context, source }
    }
}
