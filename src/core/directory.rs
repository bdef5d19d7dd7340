use std::sync::Arc;

use tracing::{Instrument, Span};

use super::retry::RetryExecutor;
use crate::transport::{
    Conversation, ConversationKind, DirectoryEntry, MessagingService, RemoteResult,
};

/// Lists every conversation the identity belongs to.
pub struct ConversationDirectory {
    service: Arc<dyn MessagingService>,
    retry: Arc<RetryExecutor>,
    span: Span,
}

impl ConversationDirectory {
    pub fn new(service: Arc<dyn MessagingService>, retry: Arc<RetryExecutor>, span: Span) -> Self {
        Self {
            service,
            retry,
            span,
        }
    }

    /// Pages through the listing until the cursor runs out. Direct messages
    /// take the peer's user name; their id stays the conversation id.
    ///
    /// Any failed page or peer lookup aborts the whole listing.
    pub async fn list(&self) -> RemoteResult<Vec<Conversation>> {
        async {
            let mut cursor = String::new();
            let mut conversations = Vec::with_capacity(20);

            loop {
                let page = self
                    .retry
                    .execute("conversations.list", || {
                        self.service.list_conversations(&cursor)
                    })
                    .await?;

                for entry in page.entries {
                    if !entry.is_member {
                        continue;
                    }
                    let conversation = self.resolve(entry).await?;
                    tracing::debug!(
                        id = conversation.id.as_str(),
                        name = conversation.name.as_str(),
                        kind = conversation.kind.label(),
                        "Listed conversation"
                    );
                    conversations.push(conversation);
                }

                if page.next_cursor.is_empty() {
                    break;
                }
                cursor = page.next_cursor;
            }

            tracing::info!(count = conversations.len(), "Conversation listing complete");
            Ok(conversations)
        }
        .instrument(self.span.clone())
        .await
    }

    async fn resolve(&self, entry: DirectoryEntry) -> RemoteResult<Conversation> {
        let name = match (entry.kind, entry.peer.as_deref()) {
            (ConversationKind::Direct, Some(peer)) => {
                self.retry
                    .execute("users.info", || self.service.user_info(peer))
                    .await?
                    .name
            }
            (ConversationKind::Direct, None) if entry.name.is_empty() => entry.id.clone(),
            _ => entry.name,
        };
        Ok(Conversation::new(entry.id, name, entry.kind))
    }
}
