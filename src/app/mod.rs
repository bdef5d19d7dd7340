pub mod dispatch;
pub mod report;
pub mod selection;

pub use dispatch::{PurgeSettings, dispatch, run_purge};
pub use report::{EXIT_FATAL, EXIT_NOTHING_SELECTED, PurgeSummary, RunOutcome};
pub use selection::{
    AllowlistDecider, ConversationDecider, Decision, PromptDecider, select_conversations,
};
