//! The chat-side collaborator: who is talking, what they said, and where replies go.

use async_trait::async_trait;

use crate::error::TransportError;

/// A participant of a chat channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    pub id: String,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A message addressed to the bot, with the bot's own mention already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub sender: Member,
    pub channel_id: String,
    pub text: String,
}

/// A message the bot wants to post, together with the members it mentions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub text: String,
    pub mentions: Vec<Member>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    pub fn mentioning(text: impl Into<String>, mentions: Vec<Member>) -> Self {
        Self {
            text: text.into(),
            mentions,
        }
    }
}

/// Identity lookups and message delivery for one chat platform.
///
/// Lookups are best effort; failures are surfaced to the caller, never replaced
/// by placeholder names.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Looks up a single member of `channel_id`.
    async fn resolve_member(&self, channel_id: &str, user_id: &str) -> Result<Member, TransportError>;

    /// Lists every member of `channel_id`.
    async fn list_channel_members(&self, channel_id: &str) -> Result<Vec<Member>, TransportError>;

    /// Posts `reply` to `channel_id`.
    async fn send_message(&self, channel_id: &str, reply: &Reply) -> Result<(), TransportError>;

    /// Inline mention markup for `member`.
    fn mention(&self, member: &Member) -> String {
        format!("<at>{}</at>", member.name)
    }
}
