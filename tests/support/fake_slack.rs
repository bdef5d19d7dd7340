#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use slackwiper::app::{AllowlistDecider, PurgeSettings, RunOutcome, run_purge};
use slackwiper::core::{Cutoff, RecordingSleeper, Strategy};
use slackwiper::error::RemoteError;
use slackwiper::transport::{
    ConversationKind, DirectoryEntry, DirectoryPage, Identity, MessageCandidate,
    MessagingService, RemoteFuture, SearchPage, SearchQuery,
};

pub const ME: &str = "U1";
pub const OTHER: &str = "U2";

/// 2022-06-01T00:00:00Z
pub const JUNE_2022: i64 = 1_654_041_600;
/// 2023-06-01T00:00:00Z
pub const JUNE_2023: i64 = 1_685_577_600;

/// In-memory workspace.
///
/// Search ignores query modifiers and returns every stored message in
/// ascending timestamp order, so conversation and author scoping are left
/// entirely to the client. Deleted messages disappear from later pages.
pub struct FakeSlack {
    users: HashMap<String, String>,
    directory: Vec<DirectoryEntry>,
    messages: Mutex<Vec<MessageCandidate>>,
    search_rate_limits: AtomicU32,
    rate_limit_wait: Duration,
    search_failure: Option<String>,
    searches: Mutex<Vec<SearchQuery>>,
    deletes: Mutex<Vec<(String, String)>>,
}

impl FakeSlack {
    pub fn new() -> Self {
        Self {
            users: HashMap::from([
                (ME.to_string(), "me".to_string()),
                (OTHER.to_string(), "alice".to_string()),
            ]),
            directory: Vec::new(),
            messages: Mutex::new(Vec::new()),
            search_rate_limits: AtomicU32::new(0),
            rate_limit_wait: Duration::from_secs(1),
            search_failure: None,
            searches: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_channel(mut self, id: &str, name: &str) -> Self {
        self.directory.push(DirectoryEntry {
            id: id.into(),
            name: name.into(),
            kind: ConversationKind::PublicChannel,
            is_member: true,
            peer: None,
        });
        self
    }

    pub fn with_foreign_channel(mut self, id: &str, name: &str) -> Self {
        self.directory.push(DirectoryEntry {
            id: id.into(),
            name: name.into(),
            kind: ConversationKind::PublicChannel,
            is_member: false,
            peer: None,
        });
        self
    }

    pub fn with_dm(mut self, id: &str, peer: &str) -> Self {
        self.directory.push(DirectoryEntry {
            id: id.into(),
            name: String::new(),
            kind: ConversationKind::Direct,
            is_member: true,
            peer: Some(peer.into()),
        });
        self
    }

    /// Stores a message at `epoch_secs` with a sub-second suffix `seq` so
    /// timestamps stay unique.
    pub fn with_message(self, conversation_id: &str, author: &str, epoch_secs: i64, seq: u32) -> Self {
        let name = self
            .directory
            .iter()
            .find(|entry| entry.id == conversation_id)
            .map(|entry| entry.name.clone())
            .unwrap_or_default();
        {
            let mut messages = self.messages.lock().unwrap();
            messages.push(MessageCandidate {
                timestamp: format!("{epoch_secs}.{seq:06}"),
                conversation_id: conversation_id.into(),
                conversation_name: name,
                author_id: author.into(),
                text: format!("message {seq}"),
            });
            messages.sort_by(|a, b| {
                let a: f64 = a.timestamp.parse().unwrap();
                let b: f64 = b.timestamp.parse().unwrap();
                a.total_cmp(&b)
            });
        }
        self
    }

    pub fn rate_limit_searches(mut self, times: u32, wait: Duration) -> Self {
        self.search_rate_limits = AtomicU32::new(times);
        self.rate_limit_wait = wait;
        self
    }

    pub fn fail_searches(mut self, cause: &str) -> Self {
        self.search_failure = Some(cause.into());
        self
    }

    pub fn searches(&self) -> Vec<SearchQuery> {
        self.searches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn deletes(&self) -> Vec<(String, String)> {
        self.deletes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn remaining(&self) -> Vec<MessageCandidate> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn page(&self, query: &SearchQuery) -> SearchPage {
        let messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        let count = query.count.max(1) as usize;
        let start = (query.page.saturating_sub(1) as usize) * count;
        let last_page = messages.len().div_ceil(count).max(1);
        SearchPage {
            matches: messages.iter().skip(start).take(count).cloned().collect(),
            last_page: u32::try_from(last_page).unwrap(),
        }
    }
}

impl MessagingService for FakeSlack {
    fn name(&self) -> &str {
        "fake"
    }

    fn user_info<'a>(&'a self, user_id: &'a str) -> RemoteFuture<'a, Identity> {
        Box::pin(async move {
            self.users
                .get(user_id)
                .map(|name| Identity {
                    id: user_id.to_string(),
                    name: name.clone(),
                })
                .ok_or_else(|| RemoteError::fatal("users.info", "user_not_found"))
        })
    }

    fn list_conversations<'a>(&'a self, _cursor: &'a str) -> RemoteFuture<'a, DirectoryPage> {
        Box::pin(async move {
            Ok(DirectoryPage {
                entries: self.directory.clone(),
                next_cursor: String::new(),
            })
        })
    }

    fn search_messages<'a>(&'a self, query: &'a SearchQuery) -> RemoteFuture<'a, SearchPage> {
        Box::pin(async move {
            self.searches
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(query.clone());
            if let Some(cause) = &self.search_failure {
                return Err(RemoteError::fatal("search.messages", cause.clone()));
            }
            let limited = self
                .search_rate_limits
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if limited {
                return Err(RemoteError::RateLimited {
                    wait: self.rate_limit_wait,
                });
            }
            Ok(self.page(query))
        })
    }

    fn delete_message<'a>(
        &'a self,
        conversation_id: &'a str,
        timestamp: &'a str,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.deletes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((conversation_id.to_string(), timestamp.to_string()));
            let mut messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
            let before = messages.len();
            messages.retain(|m| !(m.conversation_id == conversation_id && m.timestamp == timestamp));
            if messages.len() == before {
                return Err(RemoteError::fatal("chat.delete", "message_not_found"));
            }
            Ok(())
        })
    }
}

pub fn settings(cutoff: Cutoff, dry_run: bool, strategy: Strategy) -> PurgeSettings {
    PurgeSettings {
        user_id: ME.into(),
        cutoff,
        dry_run,
        strategy,
        sweeps: 1,
        sweep_pause: Duration::from_secs(10),
        page_size: 100,
        max_attempts: 10,
        pacing: Duration::from_millis(600),
    }
}

/// Runs a purge selecting `channels` by name.
pub async fn purge(
    slack: &Arc<FakeSlack>,
    sleeper: &Arc<RecordingSleeper>,
    settings: &PurgeSettings,
    channels: &str,
) -> RunOutcome {
    let mut decider = AllowlistDecider::from_csv(channels);
    run_purge(slack.clone(), sleeper.clone(), settings, &mut decider)
        .await
        .unwrap()
}

pub fn cutoff_2023() -> Cutoff {
    Cutoff::from_epoch_secs(1_672_531_200)
}

pub fn both_strategies() -> [Strategy; 2] {
    [Strategy::Scoped, Strategy::Global]
}
