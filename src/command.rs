//! Text commands understood by the bot.

use crate::entry::EntryOptions;

const OPEN_SESSION: &str = "start office hour";
const CLOSE_SESSION: &str = "end office hour";
const LEAVE_QUEUE: &str = "leave office hours";
const QUERY_POSITION: &str = "get queue position";
const LIST_OWNED_SESSIONS: &str = "my office hours";
const LIST_ACTIVE_MEMBERS: &str = "view active queue";
const MARK_CURRENT_COMPLETE: &str = "mark student complete";
const CALL_NEXT: &str = "get next student";
const PRIVATE_JOIN: &str = "private join office hours";
const JOIN: &str = "join office hours";

/// A recognised command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenSession,
    CloseSession,
    LeaveQueue,
    QueryPosition,
    ListOwnedSessions,
    ListActiveMembers,
    MarkCurrentComplete,
    CallNext,
    /// Join the queue; the trailing text becomes the question.
    JoinQueue(EntryOptions),
}

impl Command {
    /// Parses a message body, or returns `None` if it is not a command.
    ///
    /// Line breaks are dropped and surrounding whitespace trimmed before matching.
    /// Keywords match ASCII case-insensitively; the question keeps its letter case.
    pub fn parse(text: &str) -> Option<Self> {
        let text = normalize(text);

        let exact = [
            (OPEN_SESSION, Self::OpenSession),
            (CLOSE_SESSION, Self::CloseSession),
            (LEAVE_QUEUE, Self::LeaveQueue),
            (QUERY_POSITION, Self::QueryPosition),
            (LIST_OWNED_SESSIONS, Self::ListOwnedSessions),
            (LIST_ACTIVE_MEMBERS, Self::ListActiveMembers),
            (MARK_CURRENT_COMPLETE, Self::MarkCurrentComplete),
            (CALL_NEXT, Self::CallNext),
        ];
        if let Some((_, command)) = exact
            .into_iter()
            .find(|(keyword, _)| text.eq_ignore_ascii_case(keyword))
        {
            return Some(command);
        }

        for (prefix, private_entry) in [(PRIVATE_JOIN, true), (JOIN, false)] {
            if let Some(rest) = strip_keyword(&text, prefix) {
                let question = rest.trim();
                return Some(Self::JoinQueue(EntryOptions {
                    question: (!question.is_empty()).then(|| question.to_string()),
                    private_entry,
                }));
            }
        }

        None
    }

    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenSession => "open-session",
            Self::CloseSession => "close-session",
            Self::LeaveQueue => "leave-queue",
            Self::QueryPosition => "query-position",
            Self::ListOwnedSessions => "list-owned-sessions",
            Self::ListActiveMembers => "list-active-members",
            Self::MarkCurrentComplete => "mark-current-complete",
            Self::CallNext => "call-next",
            Self::JoinQueue(options) if options.private_entry => "private-join-queue",
            Self::JoinQueue(_) => "join-queue",
        }
    }
}

fn normalize(text: &str) -> String {
    text.replace(['\n', '\r'], "").trim().to_string()
}

// ASCII case-insensitive prefix match that requires a word boundary after the keyword.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &text[keyword.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}
