use crate::core::{Cutoff, PurgeOutcome};
use crate::error::PurgeError;
use crate::transport::Conversation;
use crate::ui::style as ui;

pub const EXIT_FATAL: u8 = 1;
pub const EXIT_NOTHING_SELECTED: u8 = 2;

/// Result of one process invocation.
#[derive(Debug)]
pub enum RunOutcome {
    Purged(PurgeSummary),
    /// The selection policy chose no conversations; nothing was scanned.
    NothingSelected,
    Listed { conversations: usize },
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Purged(summary) if summary.error.is_some() => EXIT_FATAL,
            Self::Purged(_) | Self::Listed { .. } => 0,
            Self::NothingSelected => EXIT_NOTHING_SELECTED,
        }
    }
}

#[derive(Debug)]
pub struct PurgeSummary {
    pub outcome: PurgeOutcome,
    pub conversations: usize,
    pub cutoff: Cutoff,
    pub dry_run: bool,
    pub sweeps_completed: u32,
    pub error: Option<PurgeError>,
}

pub fn render_summary(summary: &PurgeSummary) -> String {
    let mut lines = Vec::new();
    if summary.dry_run {
        lines.push(format!(
            "{} {} messages older than {} would be removed from {} channels/DMs",
            ui::notice("dry-run:"),
            ui::count(summary.outcome.messages_eligible),
            summary.cutoff,
            ui::count(summary.conversations)
        ));
        lines.push(ui::muted("  pass --dry-run=false to delete them"));
    } else {
        lines.push(format!(
            "{} Removed {} messages from {} channels/DMs",
            ui::check(),
            ui::count(summary.outcome.messages_removed),
            ui::count(summary.conversations)
        ));
        let failed = summary
            .outcome
            .messages_eligible
            .saturating_sub(summary.outcome.messages_removed);
        if failed > 0 {
            lines.push(ui::notice(format!("  {failed} messages could not be removed")));
        }
    }
    lines.push(ui::muted(format!(
        "  {} sweep(s), {} page(s) scanned",
        summary.sweeps_completed, summary.outcome.pages_scanned
    )));
    lines.join("\n")
}

pub fn render_conversations(conversations: &[Conversation]) -> String {
    let mut lines = vec![ui::heading(format!("{} conversations", conversations.len()))];
    for conversation in conversations {
        lines.push(format!(
            "  {} {} {}",
            ui::kind(conversation.kind),
            conversation.name,
            ui::muted(&conversation.id)
        ));
    }
    lines.join("\n")
}
