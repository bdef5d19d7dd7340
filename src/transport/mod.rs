pub mod slack;
pub mod traits;

pub use slack::SlackClient;
pub use traits::{
    Conversation, ConversationKind, DirectoryEntry, DirectoryPage, Identity, MessageCandidate,
    MessagingService, RemoteFuture, RemoteResult, SearchPage, SearchQuery,
};
