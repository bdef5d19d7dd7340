use console::style;
use std::fmt::Display;

use crate::transport::ConversationKind;

/// Green bold checkmark for completed live runs.
pub fn check() -> String {
    style("✓").green().bold().to_string()
}

pub fn heading<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Ids, hints and totals that are secondary to the main line.
pub fn muted<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Dry-run banners and partial-failure notes.
pub fn notice<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

pub fn count<D: Display>(n: D) -> String {
    style(n).green().to_string()
}

/// Kind label padded to one column, colored by who can read the conversation.
pub fn kind(kind: ConversationKind) -> String {
    let label = style(format!("{:<8}", kind.label()));
    match kind {
        ConversationKind::PublicChannel => label.cyan(),
        ConversationKind::PrivateChannel | ConversationKind::Group => label.magenta(),
        ConversationKind::Direct => label.blue(),
    }
    .to_string()
}
