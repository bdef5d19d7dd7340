use serde::Deserialize;

use crate::transport::traits::{
    ConversationKind, DirectoryEntry, DirectoryPage, Identity, MessageCandidate, SearchPage,
};

// ── users.info ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserInfoResponse {
    pub user: SlackUser,
}

#[derive(Debug, Deserialize)]
pub struct SlackUser {
    pub id: String,
    pub name: String,
}

impl From<SlackUser> for Identity {
    fn from(user: SlackUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

// ── conversations.list ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConversationsListResponse {
    #[serde(default)]
    pub channels: Vec<SlackConversation>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct SlackConversation {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub is_mpim: bool,
    #[serde(default)]
    pub is_private: bool,
    /// Peer user id on IM entries.
    #[serde(default)]
    pub user: Option<String>,
}

impl SlackConversation {
    pub fn kind(&self) -> ConversationKind {
        if self.is_im {
            ConversationKind::Direct
        } else if self.is_mpim {
            ConversationKind::Group
        } else if self.is_private {
            ConversationKind::PrivateChannel
        } else {
            ConversationKind::PublicChannel
        }
    }
}

impl From<SlackConversation> for DirectoryEntry {
    fn from(conv: SlackConversation) -> Self {
        let kind = conv.kind();
        Self {
            // Slack never flags IMs with is_member; having the IM means membership.
            is_member: conv.is_member || conv.is_im,
            name: conv.name.unwrap_or_default(),
            peer: conv.user,
            id: conv.id,
            kind,
        }
    }
}

impl From<ConversationsListResponse> for DirectoryPage {
    fn from(resp: ConversationsListResponse) -> Self {
        Self {
            entries: resp.channels.into_iter().map(DirectoryEntry::from).collect(),
            next_cursor: resp
                .response_metadata
                .map(|m| m.next_cursor)
                .unwrap_or_default(),
        }
    }
}

// ── search.messages ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub messages: SearchMessages,
}

#[derive(Debug, Deserialize)]
pub struct SearchMessages {
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchMatch {
    pub ts: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: Option<String>,
    pub channel: MatchChannel,
}

#[derive(Debug, Deserialize)]
pub struct MatchChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl From<SearchMatch> for MessageCandidate {
    fn from(m: SearchMatch) -> Self {
        Self {
            timestamp: m.ts,
            conversation_id: m.channel.id,
            conversation_name: m.channel.name,
            author_id: m.user.unwrap_or_default(),
            text: m.text,
        }
    }
}

impl From<SearchResponse> for SearchPage {
    fn from(resp: SearchResponse) -> Self {
        let messages = resp.messages;
        let last_page = messages
            .pagination
            .as_ref()
            .map(|p| p.page_count)
            .filter(|count| *count > 0)
            .or_else(|| messages.paging.as_ref().map(|p| p.pages))
            .unwrap_or(0);
        Self {
            matches: messages
                .matches
                .into_iter()
                .map(MessageCandidate::from)
                .collect(),
            last_page,
        }
    }
}
