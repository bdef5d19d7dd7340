use tracing::Instrument;

use super::sweeper::{PageVerdict, Sweep};
use super::{EngineContext, PurgeEngine, PurgeFuture, PurgeRequest, Strategy};
use crate::error::PurgeError;

/// Searches `from:<identity> in:<c1> in:<c2> ...` and pages up to the
/// server-reported last page.
pub struct ScopedSearchEngine {
    ctx: EngineContext,
}

impl ScopedSearchEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    fn query(&self, request: &PurgeRequest<'_>) -> String {
        let scopes: Vec<String> = request
            .conversations
            .iter()
            .map(crate::transport::Conversation::search_term)
            .collect();
        format!("{} {}", self.ctx.author_filter(), scopes.join(" "))
    }
}

impl PurgeEngine for ScopedSearchEngine {
    fn strategy(&self) -> Strategy {
        Strategy::Scoped
    }

    fn purge<'a>(&'a self, request: PurgeRequest<'a>) -> PurgeFuture<'a> {
        Box::pin(
            async move {
                if request.conversations.is_empty() {
                    return Err(PurgeError::NoConversations);
                }
                let query = self.query(&request);
                tracing::debug!(query = query.as_str(), "Search query");

                let mut sweep = Sweep::new(&self.ctx, request);
                let mut page = 1;
                loop {
                    let result = sweep.fetch(&query, page).await?;
                    if page > result.last_page {
                        if !result.matches.is_empty() {
                            tracing::debug!(
                                page,
                                last_page = result.last_page,
                                dropped = result.matches.len(),
                                "Ignoring matches past the reported last page"
                            );
                        }
                        tracing::info!(page, "No more messages to process");
                        break;
                    }
                    tracing::info!("Processing page {page} of {}", result.last_page);
                    if sweep.process(result.matches).await? == PageVerdict::Halt {
                        break;
                    }
                    page += 1;
                }
                Ok(sweep.finish())
            }
            .instrument(self.ctx.span.clone()),
        )
    }
}
