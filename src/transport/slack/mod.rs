mod types;


use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use self::types::{ConversationsListResponse, SearchResponse, UserInfoResponse};
use super::traits::{
    DirectoryPage, Identity, MessagingService, RemoteFuture, RemoteResult, SearchPage, SearchQuery,
};
use crate::error::RemoteError;

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Conversation kinds requested from `conversations.list`.
const CONVERSATION_TYPES: &str = "public_channel,private_channel,mpim,im";
const LIST_PAGE_LIMIT: &str = "200";
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Slack Web API client authenticated with a user token.
pub struct SlackClient {
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl SlackClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> RemoteResult<T> {
        let response = self
            .client
            .get(self.endpoint(method))
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .map_err(|e| RemoteError::fatal(method, format!("request error: {e}")))?;
        Self::decode(method, response).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> RemoteResult<T> {
        let response = self
            .client
            .post(self.endpoint(method))
            .bearer_auth(&self.token)
            .form(params)
            .send()
            .await
            .map_err(|e| RemoteError::fatal(method, format!("request error: {e}")))?;
        Self::decode(method, response).await
    }

    async fn decode<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> RemoteResult<T> {
        let status = response.status();
        let retry_after = parse_retry_after(response.headers());

        if status.as_u16() == 429 {
            return Err(RemoteError::RateLimited {
                wait: retry_after.unwrap_or(DEFAULT_RETRY_AFTER),
            });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));

        if !status.is_success() {
            return Err(RemoteError::fatal(
                method,
                format!("HTTP {status}: {}", truncate(&body)),
            ));
        }

        // Slack returns 200 for most app-level errors; check JSON "ok" field
        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| RemoteError::fatal(method, format!("invalid JSON: {e}")))?;
        if parsed.get("ok") != Some(&Value::Bool(true)) {
            let err = parsed
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            if err == "ratelimited" {
                return Err(RemoteError::RateLimited {
                    wait: retry_after.unwrap_or(DEFAULT_RETRY_AFTER),
                });
            }
            return Err(RemoteError::fatal(method, err));
        }

        serde_json::from_value(parsed)
            .map_err(|e| RemoteError::fatal(method, format!("unexpected response shape: {e}")))
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let seconds = headers
        .get("Retry-After")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())?;
    if seconds.is_nan() {
        return None;
    }
    if seconds <= 0.0 {
        return Some(Duration::ZERO);
    }
    // Values too large for a Duration (or infinite) wait the maximum.
    Some(
        Duration::try_from_secs_f64(seconds)
            .map_or(MAX_RETRY_AFTER, |wait| wait.min(MAX_RETRY_AFTER)),
    )
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{cut}...")
}

impl MessagingService for SlackClient {
    fn name(&self) -> &str {
        "slack"
    }

    fn user_info<'a>(&'a self, user_id: &'a str) -> RemoteFuture<'a, Identity> {
        Box::pin(async move {
            let resp: UserInfoResponse = self.get("users.info", &[("user", user_id)]).await?;
            Ok(resp.user.into())
        })
    }

    fn list_conversations<'a>(&'a self, cursor: &'a str) -> RemoteFuture<'a, DirectoryPage> {
        Box::pin(async move {
            let mut params = vec![("types", CONVERSATION_TYPES), ("limit", LIST_PAGE_LIMIT)];
            if !cursor.is_empty() {
                params.push(("cursor", cursor));
            }
            let resp: ConversationsListResponse = self.get("conversations.list", &params).await?;
            Ok(resp.into())
        })
    }

    fn search_messages<'a>(&'a self, query: &'a SearchQuery) -> RemoteFuture<'a, SearchPage> {
        Box::pin(async move {
            let page = query.page.to_string();
            let count = query.count.to_string();
            let resp: SearchResponse = self
                .get(
                    "search.messages",
                    &[
                        ("query", query.query.as_str()),
                        ("sort", "timestamp"),
                        ("sort_dir", "asc"),
                        ("count", count.as_str()),
                        ("page", page.as_str()),
                    ],
                )
                .await?;
            Ok(resp.into())
        })
    }

    fn delete_message<'a>(
        &'a self,
        conversation_id: &'a str,
        timestamp: &'a str,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let _: Value = self
                .post_form("chat.delete", &[("channel", conversation_id), ("ts", timestamp)])
                .await?;
            Ok(())
        })
    }
}
