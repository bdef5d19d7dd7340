use std::collections::HashSet;

use console::Term;
use dialoguer::Select;

use crate::error::SelectionError;
use crate::transport::Conversation;

const CHOICES: [&str; 3] = ["no", "yes", "skip the rest"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
    /// Decline this and every remaining conversation.
    SkipRest,
}

/// Decides, one conversation at a time, what gets purged.
pub trait ConversationDecider {
    fn decide(&mut self, name: &str) -> Result<Decision, SelectionError>;
}

/// Selects conversations whose name is in a fixed allowlist (exact match).
#[derive(Debug, Clone, Default)]
pub struct AllowlistDecider {
    names: HashSet<String>,
}

impl AllowlistDecider {
    /// Parses a comma-separated list such as `"general, random"`.
    pub fn from_csv(csv: &str) -> Self {
        Self {
            names: csv
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ConversationDecider for AllowlistDecider {
    fn decide(&mut self, name: &str) -> Result<Decision, SelectionError> {
        Ok(if self.names.contains(name) {
            Decision::Yes
        } else {
            Decision::No
        })
    }
}

/// Asks on the terminal for every conversation.
pub struct PromptDecider {
    term: Term,
}

impl PromptDecider {
    pub fn for_terminal() -> Result<Self, SelectionError> {
        let term = Term::stderr();
        if !term.is_term() {
            return Err(SelectionError::NoTerminal);
        }
        Ok(Self { term })
    }
}

impl ConversationDecider for PromptDecider {
    fn decide(&mut self, name: &str) -> Result<Decision, SelectionError> {
        let choice = Select::new()
            .with_prompt(format!("Proceed with '{name}'?"))
            .items(&CHOICES)
            .default(0)
            .interact_on(&self.term)
            .map_err(|e| SelectionError::Prompt(e.to_string()))?;
        Ok(match choice {
            1 => Decision::Yes,
            2 => Decision::SkipRest,
            _ => Decision::No,
        })
    }
}

/// Applies `decider` to `conversations` in listing order. Stops asking after
/// `SkipRest`.
pub fn select_conversations(
    conversations: &[Conversation],
    decider: &mut dyn ConversationDecider,
) -> Result<Vec<Conversation>, SelectionError> {
    let mut selected = Vec::new();
    for conversation in conversations {
        match decider.decide(&conversation.name)? {
            Decision::Yes => selected.push(conversation.clone()),
            Decision::No => {}
            Decision::SkipRest => break,
        }
    }
    Ok(selected)
}
