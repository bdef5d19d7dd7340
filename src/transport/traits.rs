use crate::error::RemoteError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Outcome of a single remote call: `Ok`, or a tagged `RemoteError`.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by every `MessagingService` call.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationKind {
    PublicChannel,
    PrivateChannel,
    Group,
    Direct,
}

impl ConversationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::PublicChannel => "channel",
            Self::PrivateChannel => "private",
            Self::Group => "group",
            Self::Direct => "dm",
        }
    }
}

/// A channel, group or direct-message thread the identity belongs to.
///
/// `id` is the service-assigned identifier and the join key against search
/// results. For direct messages `name` is the peer's user name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub kind: ConversationKind,
}

impl Conversation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ConversationKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Search modifier that scopes a query to this conversation.
    pub fn search_term(&self) -> String {
        match self.kind {
            ConversationKind::Direct => format!("in:@{}", self.name),
            _ => format!("in:#{}", self.name),
        }
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.kind.label(), self.id)
    }
}

/// The authenticated user whose messages are purged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

/// Raw directory entry as listed by the service, before membership filtering
/// and peer resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
    pub kind: ConversationKind,
    pub is_member: bool,
    /// Peer user id, set for direct messages only.
    pub peer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryPage {
    pub entries: Vec<DirectoryEntry>,
    /// Empty when the listing is complete.
    pub next_cursor: String,
}

/// A message located by search. Not persisted.
///
/// `timestamp` is the service's decimal seconds string; together with
/// `conversation_id` it is the deletion key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCandidate {
    pub timestamp: String,
    pub conversation_id: String,
    pub conversation_name: String,
    pub author_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub matches: Vec<MessageCandidate>,
    /// Server-reported index of the last page (1-based).
    pub last_page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub page: u32,
    pub count: u32,
}

/// The hosted messaging service the wiper drives.
///
/// Every call performs at most one round-trip and reports rate limiting as
/// `RemoteError::RateLimited` so callers can retry without inspecting
/// transport details.
pub trait MessagingService: Send + Sync {
    fn name(&self) -> &str;

    fn user_info<'a>(&'a self, user_id: &'a str) -> RemoteFuture<'a, Identity>;

    fn list_conversations<'a>(&'a self, cursor: &'a str) -> RemoteFuture<'a, DirectoryPage>;

    /// Search ascending by timestamp.
    fn search_messages<'a>(&'a self, query: &'a SearchQuery) -> RemoteFuture<'a, SearchPage>;

    fn delete_message<'a>(&'a self, conversation_id: &'a str, timestamp: &'a str)
    -> RemoteFuture<'a, ()>;
}
