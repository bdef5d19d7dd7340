use std::sync::Arc;
use std::time::Duration;

use tracing::Span;

use super::report::{PurgeSummary, RunOutcome, render_conversations, render_summary};
use super::selection::{
    AllowlistDecider, ConversationDecider, PromptDecider, select_conversations,
};
use crate::cli::{Cli, Commands, PurgeArgs};
use crate::config::Config;
use crate::core::{
    ConversationDirectory, Cutoff, EngineContext, PurgeRequest, RetryExecutor, Sleeper, Strategy,
    SweepRunner, TokioSleeper, create_engine,
};
use crate::error::{ConfigError, Result};
use crate::transport::{MessagingService, SlackClient};

/// Everything a purge run needs once configuration is settled.
#[derive(Debug, Clone)]
pub struct PurgeSettings {
    pub user_id: String,
    pub cutoff: Cutoff,
    pub dry_run: bool,
    pub strategy: Strategy,
    pub sweeps: u32,
    pub sweep_pause: Duration,
    pub page_size: u32,
    pub max_attempts: u32,
    pub pacing: Duration,
}

impl PurgeSettings {
    pub fn from_config(config: &Config, cutoff: Cutoff) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            user_id: config.user_id()?.to_string(),
            cutoff,
            dry_run: config.purge.dry_run,
            strategy: config.purge.strategy,
            sweeps: config.purge.sweeps,
            sweep_pause: config.purge.sweep_pause(),
            page_size: config.purge.page_size,
            max_attempts: config.reliability.max_attempts,
            pacing: config.reliability.pacing(),
        })
    }
}

/// Resolve configuration and run the requested command.
pub async fn dispatch(cli: Cli) -> Result<RunOutcome> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env_overrides();
    cli.purge.apply_to(&mut config);

    match cli.command {
        Some(Commands::List) => list(&config).await,
        None => purge(&config, &cli.purge).await,
    }
}

async fn list(config: &Config) -> Result<RunOutcome> {
    let service: Arc<dyn MessagingService> =
        Arc::new(SlackClient::with_base_url(config.token()?, &config.slack.api_url));
    let retry = Arc::new(RetryExecutor::new(
        config.reliability.max_attempts,
        Arc::new(TokioSleeper),
    ));
    let directory = ConversationDirectory::new(service, retry, tracing::info_span!("list"));
    let conversations = directory.list().await?;
    println!("{}", render_conversations(&conversations));
    Ok(RunOutcome::Listed {
        conversations: conversations.len(),
    })
}

async fn purge(config: &Config, args: &PurgeArgs) -> Result<RunOutcome> {
    // Every configuration problem surfaces before the first remote call.
    let cutoff_input = args.cutoff.as_deref().ok_or_else(|| ConfigError::Missing {
        what: "cutoff date",
        hint: "pass --cutoff YYYY/MM/DD".into(),
    })?;
    let cutoff = Cutoff::parse(cutoff_input)?;
    let settings = PurgeSettings::from_config(config, cutoff)?;
    let mut decider: Box<dyn ConversationDecider> = match &args.channels {
        Some(csv) => Box::new(AllowlistDecider::from_csv(csv)),
        None => Box::new(PromptDecider::for_terminal()?),
    };

    let service = Arc::new(SlackClient::with_base_url(
        config.token()?,
        &config.slack.api_url,
    ));
    let mut outcome =
        run_purge(service, Arc::new(TokioSleeper), &settings, decider.as_mut()).await?;

    if let RunOutcome::Purged(summary) = &mut outcome {
        println!("{}", render_summary(summary));
        if let Some(err) = summary.error.take() {
            return Err(err.into());
        }
    }
    Ok(outcome)
}

/// Identity lookup, listing, selection and sweeps against `service`.
///
/// Identity and listing failures are fatal. A failed sweep is reported in
/// the summary's `error` alongside what was removed before it.
pub async fn run_purge(
    service: Arc<dyn MessagingService>,
    sleeper: Arc<dyn Sleeper>,
    settings: &PurgeSettings,
    decider: &mut dyn ConversationDecider,
) -> Result<RunOutcome> {
    let retry = Arc::new(RetryExecutor::new(settings.max_attempts, sleeper.clone()));

    let identity = retry
        .execute("users.info", || service.user_info(&settings.user_id))
        .await?;
    let span = tracing::info_span!("wipe", user = %identity.id);
    span.in_scope(|| {
        tracing::info!(
            name = identity.name.as_str(),
            cutoff = %settings.cutoff,
            dry_run = settings.dry_run,
            "Resolved identity"
        );
    });

    let directory = ConversationDirectory::new(service.clone(), retry.clone(), span.clone());
    let conversations = directory.list().await?;
    let selected = select_conversations(&conversations, decider)?;

    if selected.is_empty() {
        span.in_scope(|| tracing::warn!("No channels selected, quitting"));
        return Ok(RunOutcome::NothingSelected);
    }
    log_selection(&span, &selected);

    let context = EngineContext::new(service, retry, identity, span.clone())
        .with_page_size(settings.page_size)
        .with_pacing(settings.pacing);
    let runner = SweepRunner::new(create_engine(settings.strategy, context), sleeper, span)
        .with_sweeps(settings.sweeps)
        .with_pause(settings.sweep_pause);

    let report = runner
        .run(PurgeRequest {
            conversations: &selected,
            cutoff: settings.cutoff,
            dry_run: settings.dry_run,
        })
        .await;

    Ok(RunOutcome::Purged(PurgeSummary {
        outcome: report.outcome,
        conversations: selected.len(),
        cutoff: settings.cutoff,
        dry_run: settings.dry_run,
        sweeps_completed: report.sweeps_completed,
        error: report.error,
    }))
}

fn log_selection(span: &Span, selected: &[crate::transport::Conversation]) {
    span.in_scope(|| {
        tracing::info!(count = selected.len(), "Processing conversations");
        for conversation in selected {
            tracing::debug!("  {conversation}");
        }
    });
}
