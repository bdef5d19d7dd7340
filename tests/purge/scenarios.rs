use std::sync::Arc;
use std::time::Duration;

use super::fake_slack::{
    FakeSlack, JUNE_2022, JUNE_2023, ME, both_strategies, cutoff_2023, purge, settings,
};
use slackwiper::app::{EXIT_NOTHING_SELECTED, PurgeSummary, RunOutcome, run_purge};
use slackwiper::app::{AllowlistDecider, report::render_summary};
use slackwiper::core::{Cutoff, RecordingSleeper, Strategy};
use slackwiper::error::{RemoteError, WipeError};

fn summary(outcome: RunOutcome) -> PurgeSummary {
    match outcome {
        RunOutcome::Purged(summary) => summary,
        other => panic!("expected a purge, got {other:?}"),
    }
}

fn general_with_two_messages() -> FakeSlack {
    FakeSlack::new()
        .with_channel("C1", "general")
        .with_message("C1", ME, JUNE_2022, 1)
        .with_message("C1", ME, JUNE_2023, 2)
}

#[tokio::test]
async fn live_run_removes_the_old_message_only() {
    for strategy in both_strategies() {
        let slack = Arc::new(general_with_two_messages());
        let sleeper = Arc::new(RecordingSleeper::new());
        let cutoff = Cutoff::parse("2023/01/01").unwrap();

        let outcome = purge(&slack, &sleeper, &settings(cutoff, false, strategy), "general").await;
        assert_eq!(outcome.exit_code(), 0);
        let summary = summary(outcome);

        assert_eq!(summary.outcome.messages_removed, 1, "{strategy}");
        assert_eq!(slack.deletes(), [("C1".to_string(), "1654041600.000001".to_string())]);
        let text = console::strip_ansi_codes(&render_summary(&summary)).to_string();
        assert!(text.contains("Removed 1 messages from 1 channels/DMs"), "{text}");
    }
}

#[tokio::test]
async fn dry_run_reports_what_would_be_removed() {
    let slack = Arc::new(general_with_two_messages());
    let sleeper = Arc::new(RecordingSleeper::new());
    let cutoff = Cutoff::parse("2023-01-01").unwrap();

    let summary = summary(
        purge(&slack, &sleeper, &settings(cutoff, true, Strategy::Scoped), "general").await,
    );

    assert_eq!(summary.outcome.messages_removed, 0);
    assert_eq!(summary.outcome.messages_eligible, 1);
    assert!(slack.deletes().is_empty());
    let text = console::strip_ansi_codes(&render_summary(&summary)).to_string();
    assert!(text.contains("1 messages older than 2023/01/01 would be removed"), "{text}");
}

#[tokio::test]
async fn empty_selection_quits_before_searching() {
    let slack = Arc::new(general_with_two_messages());
    let sleeper = Arc::new(RecordingSleeper::new());

    let outcome = purge(
        &slack,
        &sleeper,
        &settings(cutoff_2023(), false, Strategy::Scoped),
        "nonexistent",
    )
    .await;

    assert!(matches!(outcome, RunOutcome::NothingSelected));
    assert_eq!(outcome.exit_code(), EXIT_NOTHING_SELECTED);
    assert!(slack.searches().is_empty());
    assert!(slack.deletes().is_empty());
}

#[tokio::test]
async fn unknown_identity_is_fatal() {
    let slack = Arc::new(general_with_two_messages());
    let sleeper = Arc::new(RecordingSleeper::new());
    let mut settings = settings(cutoff_2023(), false, Strategy::Scoped);
    settings.user_id = "U404".into();
    settings.max_attempts = 2;
    let mut decider = AllowlistDecider::from_csv("general");

    let err = run_purge(slack.clone(), sleeper, &settings, &mut decider)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WipeError::Remote(RemoteError::Fatal { ref cause, .. }) if cause == "user_not_found"
    ));
    assert!(slack.searches().is_empty());
}

#[tokio::test]
async fn repeated_sweeps_catch_messages_shifted_by_deletion() {
    for strategy in both_strategies() {
        let mut slack = FakeSlack::new().with_channel("C1", "general");
        for seq in 1..=5 {
            slack = slack.with_message("C1", ME, JUNE_2022, seq);
        }
        let slack = Arc::new(slack);
        let sleeper = Arc::new(RecordingSleeper::new());
        let mut settings = settings(cutoff_2023(), false, strategy);
        settings.page_size = 2;
        settings.sweeps = 2;

        let summary = summary(purge(&slack, &sleeper, &settings, "general").await);

        // Deleting page 1 shifts later results forward, so the first sweep misses two.
        assert_eq!(summary.outcome.messages_removed, 5, "{strategy}");
        assert_eq!(summary.sweeps_completed, 2);
        assert!(slack.remaining().is_empty());
        let pauses = sleeper
            .calls()
            .into_iter()
            .filter(|d| *d == Duration::from_secs(10))
            .count();
        assert_eq!(pauses, 1);
    }
}
