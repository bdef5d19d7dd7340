use std::sync::Arc;
use std::time::Duration;

use super::fake_slack::{FakeSlack, JUNE_2022, JUNE_2023, ME, cutoff_2023, purge, settings};
use slackwiper::app::{EXIT_FATAL, RunOutcome};
use slackwiper::core::{PurgeOutcome, RecordingSleeper, RetryExecutor, Strategy};
use slackwiper::error::{PurgeError, RemoteError};

fn old_and_new() -> FakeSlack {
    FakeSlack::new()
        .with_channel("C1", "general")
        .with_message("C1", ME, JUNE_2022, 1)
        .with_message("C1", ME, JUNE_2023, 2)
}

#[tokio::test]
async fn rate_limited_search_waits_and_recovers() {
    let wait = Duration::from_secs(2);
    let slack = Arc::new(old_and_new().rate_limit_searches(3, wait));
    let sleeper = Arc::new(RecordingSleeper::new());

    let outcome = purge(
        &slack,
        &sleeper,
        &settings(cutoff_2023(), true, Strategy::Scoped),
        "general",
    )
    .await;

    let RunOutcome::Purged(summary) = outcome else {
        panic!("expected a purge");
    };
    assert!(summary.error.is_none());
    assert_eq!(summary.outcome.messages_eligible, 1);
    assert_eq!(slack.searches().len(), 4);
    assert_eq!(sleeper.calls(), vec![wait; 3]);
    assert!(sleeper.total() >= wait * 3);
}

#[tokio::test]
async fn persistent_rate_limiting_exhausts_the_budget() {
    let wait = Duration::from_secs(1);
    let slack = Arc::new(old_and_new().rate_limit_searches(u32::MAX, wait));
    let sleeper = Arc::new(RecordingSleeper::new());
    let mut settings = settings(cutoff_2023(), false, Strategy::Global);
    settings.max_attempts = 5;

    let outcome = purge(&slack, &sleeper, &settings, "general").await;

    assert_eq!(outcome.exit_code(), EXIT_FATAL);
    let RunOutcome::Purged(summary) = outcome else {
        panic!("expected a purge");
    };
    assert!(matches!(
        summary.error,
        Some(PurgeError::Search {
            page: 1,
            partial: PurgeOutcome {
                messages_removed: 0,
                ..
            },
            source: RemoteError::RateLimited { .. },
        })
    ));
    assert_eq!(slack.searches().len(), 5);
    // No sleep after the final attempt.
    assert_eq!(sleeper.calls(), vec![wait; 4]);
    assert!(slack.deletes().is_empty());
}

#[tokio::test]
async fn fatal_search_errors_use_exactly_the_attempt_budget() {
    let slack = Arc::new(old_and_new().fail_searches("invalid_auth"));
    let sleeper = Arc::new(RecordingSleeper::new());
    let mut settings = settings(cutoff_2023(), false, Strategy::Scoped);
    settings.max_attempts = 4;

    let outcome = purge(&slack, &sleeper, &settings, "general").await;

    let RunOutcome::Purged(summary) = outcome else {
        panic!("expected a purge");
    };
    let Some(PurgeError::Search { source, .. }) = summary.error else {
        panic!("expected a search failure");
    };
    assert_eq!(source, RemoteError::fatal("search.messages", "invalid_auth"));
    assert_eq!(slack.searches().len(), 4);
    assert!(sleeper.calls().is_empty());
}

#[tokio::test]
async fn executor_never_exceeds_max_attempts() {
    for max_attempts in [1, 3, 10] {
        let sleeper = Arc::new(RecordingSleeper::new());
        let retry = RetryExecutor::new(max_attempts, sleeper.clone());
        let mut calls = 0;

        let result: Result<(), _> = retry
            .execute("chat.delete", || {
                calls += 1;
                async {
                    Err(RemoteError::RateLimited {
                        wait: Duration::from_millis(250),
                    })
                }
            })
            .await;

        assert!(result.unwrap_err().is_rate_limited());
        assert_eq!(calls, max_attempts);
        assert_eq!(sleeper.calls().len(), max_attempts as usize - 1);
    }
}
