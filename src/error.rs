use std::time::Duration;
use thiserror::Error;

use crate::core::purge::PurgeOutcome;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `slackwiper`.
///
/// Each stage of a run defines its own error variant. The dispatcher maps
/// these to process exit codes; the binary edge uses `anyhow` for context.
#[derive(Debug, Error)]
pub enum WipeError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Remote service ──────────────────────────────────────────────────
    #[error("remote: {0}")]
    Remote(#[from] RemoteError),

    // ── Purge engine ────────────────────────────────────────────────────
    #[error("purge: {0}")]
    Purge(#[from] PurgeError),

    // ── Conversation selection ──────────────────────────────────────────
    #[error("selection: {0}")]
    Selection(#[from] SelectionError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("missing {what}: {hint}")]
    Missing { what: &'static str, hint: String },

    #[error("invalid cutoff date '{input}': expected YYYY/MM/DD")]
    Cutoff { input: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Remote call outcomes ───────────────────────────────────────────────────

/// Failure half of a remote call outcome.
///
/// A remote call yields `Ok`, `RateLimited { wait }` or `Fatal { .. }`; the
/// retry executor dispatches on this exhaustively.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("rate-limited (retry after {}ms)", wait.as_millis())]
    RateLimited { wait: Duration },

    #[error("{operation} failed: {cause}")]
    Fatal { operation: String, cause: String },
}

impl RemoteError {
    pub fn fatal(operation: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Fatal {
            operation: operation.into(),
            cause: cause.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

// ─── Purge errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("no conversations to purge")]
    NoConversations,

    #[error(
        "failed to process page {page} ({} removed so far): {source}",
        .partial.messages_removed
    )]
    Search {
        page: u32,
        /// Totals of the sweep up to the failed page.
        partial: PurgeOutcome,
        #[source]
        source: RemoteError,
    },

    #[error("malformed message timestamp '{ts}' in {channel}")]
    MalformedTimestamp {
        ts: String,
        channel: String,
        partial: PurgeOutcome,
    },
}

impl PurgeError {
    /// What the sweep had scanned, found and removed before it failed.
    pub fn partial_outcome(&self) -> PurgeOutcome {
        match self {
            Self::Search { partial, .. } | Self::MalformedTimestamp { partial, .. } => *partial,
            Self::NoConversations => PurgeOutcome::default(),
        }
    }
}

// ─── Selection errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no terminal attached; pass --channel to choose conversations")]
    NoTerminal,

    #[error("prompt failed: {0}")]
    Prompt(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, WipeError>;
