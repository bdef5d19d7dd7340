use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, Span};

use super::clock::Sleeper;
use super::purge::{PurgeEngine, PurgeOutcome, PurgeRequest};
use crate::error::PurgeError;

pub const DEFAULT_SWEEP_PAUSE: Duration = Duration::from_secs(10);

/// Totals across all sweeps of one run.
#[derive(Debug)]
pub struct SweepReport {
    pub outcome: PurgeOutcome,
    pub sweeps_completed: u32,
    /// Set when a sweep failed; later sweeps were not attempted.
    pub error: Option<PurgeError>,
}

/// Re-runs the engine `sweeps` times to catch messages the search index
/// surfaced late, pausing between passes.
pub struct SweepRunner {
    engine: Box<dyn PurgeEngine>,
    sleeper: Arc<dyn Sleeper>,
    sweeps: u32,
    pause: Duration,
    span: Span,
}

impl SweepRunner {
    pub fn new(engine: Box<dyn PurgeEngine>, sleeper: Arc<dyn Sleeper>, span: Span) -> Self {
        Self {
            engine,
            sleeper,
            sweeps: 1,
            pause: DEFAULT_SWEEP_PAUSE,
            span,
        }
    }

    #[must_use]
    pub fn with_sweeps(mut self, sweeps: u32) -> Self {
        self.sweeps = sweeps.max(1);
        self
    }

    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub async fn run(&self, request: PurgeRequest<'_>) -> SweepReport {
        async {
            let mut report = SweepReport {
                outcome: PurgeOutcome::default(),
                sweeps_completed: 0,
                error: None,
            };

            for sweep in 1..=self.sweeps {
                if sweep > 1 {
                    tracing::info!(
                        pause_secs = self.pause.as_secs(),
                        "Waiting for the search index before the next sweep"
                    );
                    self.sleeper.sleep(self.pause).await;
                }

                tracing::info!(
                    sweep,
                    sweeps = self.sweeps,
                    strategy = %self.engine.strategy(),
                    dry_run = request.dry_run,
                    "Starting sweep"
                );
                match self.engine.purge(request).await {
                    Ok(outcome) => {
                        tracing::info!(
                            sweep,
                            removed = outcome.messages_removed,
                            eligible = outcome.messages_eligible,
                            "Sweep finished"
                        );
                        report.outcome.absorb(&outcome);
                        report.sweeps_completed += 1;
                    }
                    Err(e) => {
                        report.outcome.absorb(&e.partial_outcome());
                        report.error = Some(e);
                        break;
                    }
                }
            }

            report
        }
        .instrument(self.span.clone())
        .await
    }
}
