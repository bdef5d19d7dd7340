//! Message purge engine.
//!
//! Both strategies page through search results in ascending timestamp order
//! and hand every page to the shared [`sweeper`] loop, which applies the
//! cutoff cliff, conversation and authorship scoping, and deletion.
//!
//! The cutoff is a global cliff: the first result at or past the boundary
//! ends the whole scan, across every selected conversation.

mod global;
mod scoped;
mod sweeper;


use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::Span;

pub use global::GlobalFilterEngine;
pub use scoped::ScopedSearchEngine;

use super::cutoff::Cutoff;
use super::retry::RetryExecutor;
use crate::error::PurgeError;
use crate::transport::{Conversation, Identity, MessagingService};

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PACING: Duration = Duration::from_millis(600);

/// How search results are located.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// Server-side query scoped to the identity and the selected conversations.
    #[default]
    Scoped,
    /// Query scoped to the identity only; conversations filtered locally.
    Global,
}

/// One purge invocation.
#[derive(Debug, Clone, Copy)]
pub struct PurgeRequest<'a> {
    pub conversations: &'a [Conversation],
    pub cutoff: Cutoff,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    /// Successful deletions. Always zero in dry-run.
    pub messages_removed: u64,
    /// Messages that qualified for deletion, deleted or not.
    pub messages_eligible: u64,
    pub pages_scanned: u32,
    pub halted_at_cutoff: bool,
}

impl PurgeOutcome {
    pub fn absorb(&mut self, other: &Self) {
        self.messages_removed += other.messages_removed;
        self.messages_eligible += other.messages_eligible;
        self.pages_scanned += other.pages_scanned;
        self.halted_at_cutoff |= other.halted_at_cutoff;
    }
}

pub type PurgeFuture<'a> = Pin<Box<dyn Future<Output = Result<PurgeOutcome, PurgeError>> + Send + 'a>>;

/// A purge strategy. Stateless between calls.
pub trait PurgeEngine: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn purge<'a>(&'a self, request: PurgeRequest<'a>) -> PurgeFuture<'a>;
}

/// Collaborators shared by every strategy.
pub struct EngineContext {
    pub service: Arc<dyn MessagingService>,
    pub retry: Arc<RetryExecutor>,
    pub identity: Identity,
    pub page_size: u32,
    pub pacing: Duration,
    pub span: Span,
}

impl EngineContext {
    pub fn new(
        service: Arc<dyn MessagingService>,
        retry: Arc<RetryExecutor>,
        identity: Identity,
        span: Span,
    ) -> Self {
        Self {
            service,
            retry,
            identity,
            page_size: DEFAULT_PAGE_SIZE,
            pacing: DEFAULT_PACING,
            span,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    fn author_filter(&self) -> String {
        format!("from:<@{}>", self.identity.id)
    }
}

/// Factory: build the engine for `strategy`.
pub fn create_engine(strategy: Strategy, context: EngineContext) -> Box<dyn PurgeEngine> {
    match strategy {
        Strategy::Scoped => Box::new(ScopedSearchEngine::new(context)),
        Strategy::Global => Box::new(GlobalFilterEngine::new(context)),
    }
}
