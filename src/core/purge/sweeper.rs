use std::collections::HashSet;

use super::{EngineContext, PurgeOutcome, PurgeRequest};
use crate::core::cutoff::{Cutoff, describe_timestamp, parse_timestamp};
use crate::error::PurgeError;
use crate::transport::{MessageCandidate, SearchPage, SearchQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PageVerdict {
    Continue,
    Halt,
}

/// State of a single scan: the selected id set, the cutoff, and running totals.
pub(super) struct Sweep<'a> {
    ctx: &'a EngineContext,
    selected: HashSet<&'a str>,
    cutoff: Cutoff,
    dry_run: bool,
    outcome: PurgeOutcome,
}

impl<'a> Sweep<'a> {
    pub(super) fn new(ctx: &'a EngineContext, request: PurgeRequest<'a>) -> Self {
        Self {
            ctx,
            selected: request
                .conversations
                .iter()
                .map(|c| c.id.as_str())
                .collect(),
            cutoff: request.cutoff,
            dry_run: request.dry_run,
            outcome: PurgeOutcome::default(),
        }
    }

    pub(super) fn finish(self) -> PurgeOutcome {
        self.outcome
    }

    /// Fetches one page through the retry executor, pacing every page after
    /// the first.
    pub(super) async fn fetch(&mut self, query: &str, page: u32) -> Result<SearchPage, PurgeError> {
        if page > 1 {
            self.ctx.retry.sleeper().sleep(self.ctx.pacing).await;
        }
        let search = SearchQuery {
            query: query.to_string(),
            page,
            count: self.ctx.page_size,
        };
        let result = self
            .ctx
            .retry
            .execute("search.messages", || self.ctx.service.search_messages(&search))
            .await
            .map_err(|source| PurgeError::Search {
                page,
                partial: self.outcome,
                source,
            })?;
        self.outcome.pages_scanned += 1;
        Ok(result)
    }

    /// Walks one page in ascending order. Returns `Halt` at the first message
    /// at or past the cutoff.
    pub(super) async fn process(
        &mut self,
        matches: Vec<MessageCandidate>,
    ) -> Result<PageVerdict, PurgeError> {
        for message in matches {
            let ts = parse_timestamp(&message.timestamp).ok_or_else(|| {
                PurgeError::MalformedTimestamp {
                    ts: message.timestamp.clone(),
                    channel: message.conversation_name.clone(),
                    partial: self.outcome,
                }
            })?;

            if self.cutoff.is_reached(ts) {
                tracing::info!(
                    ts = message.timestamp.as_str(),
                    cutoff = %self.cutoff,
                    "Reached cutoff, stopping scan"
                );
                self.outcome.halted_at_cutoff = true;
                return Ok(PageVerdict::Halt);
            }

            if !self.selected.contains(message.conversation_id.as_str()) {
                tracing::trace!(
                    channel = message.conversation_id.as_str(),
                    "Skipping message outside selected conversations"
                );
                continue;
            }

            if message.author_id != self.ctx.identity.id {
                tracing::trace!(
                    author = message.author_id.as_str(),
                    "Skipping message by another author"
                );
                continue;
            }

            self.outcome.messages_eligible += 1;
            self.remove(&message, ts).await;
        }
        Ok(PageVerdict::Continue)
    }

    async fn remove(&mut self, message: &MessageCandidate, ts: f64) {
        let when = describe_timestamp(ts);
        if self.dry_run {
            tracing::info!(
                "Would remove: [{when}]: {} > {}",
                message.conversation_name,
                message.text
            );
            return;
        }

        tracing::info!(
            "Removing: [{when}]: {} > {}",
            message.conversation_name,
            message.text
        );
        let deleted = self
            .ctx
            .retry
            .execute("chat.delete", || {
                self.ctx
                    .service
                    .delete_message(&message.conversation_id, &message.timestamp)
            })
            .await;
        match deleted {
            Ok(()) => self.outcome.messages_removed += 1,
            Err(e) => tracing::error!(
                ts = message.timestamp.as_str(),
                channel = message.conversation_name.as_str(),
                "Can't remove message: {e}"
            ),
        }
        self.ctx.retry.sleeper().sleep(self.ctx.pacing).await;
    }
}
