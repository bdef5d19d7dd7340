use tracing::Instrument;

use super::sweeper::{PageVerdict, Sweep};
use super::{EngineContext, PurgeEngine, PurgeFuture, PurgeRequest, Strategy};
use crate::error::PurgeError;

/// Searches everything the identity authored and filters each result to the
/// selected conversation ids. Stops at the first empty page.
pub struct GlobalFilterEngine {
    ctx: EngineContext,
}

impl GlobalFilterEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }
}

impl PurgeEngine for GlobalFilterEngine {
    fn strategy(&self) -> Strategy {
        Strategy::Global
    }

    fn purge<'a>(&'a self, request: PurgeRequest<'a>) -> PurgeFuture<'a> {
        Box::pin(
            async move {
                if request.conversations.is_empty() {
                    return Err(PurgeError::NoConversations);
                }
                let query = self.ctx.author_filter();
                tracing::debug!(query = query.as_str(), "Search query");

                let mut sweep = Sweep::new(&self.ctx, request);
                let mut page = 1;
                loop {
                    let result = sweep.fetch(&query, page).await?;
                    if result.matches.is_empty() {
                        tracing::info!(page, "No more messages to process");
                        break;
                    }
                    tracing::info!(page, matches = result.matches.len(), "Processing page");
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
