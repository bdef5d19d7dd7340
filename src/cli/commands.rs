use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::Config;
use crate::core::Strategy;

/// `slackwiper` - remove your own Slack messages older than a cutoff date.
#[derive(Parser, Debug)]
#[command(name = "slackwiper")]
#[command(version)]
#[command(about = "Remove your own Slack messages, keeping everything after a cutoff date.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub purge: PurgeArgs,

    /// Config file (default: ~/.slackwiper/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the conversations you belong to, without deleting anything
    List,
}

#[derive(Args, Debug, Default)]
pub struct PurgeArgs {
    /// Slack user id whose messages are removed
    #[arg(short, long)]
    pub user: Option<String>,

    /// Keep messages from this date on (YYYY/MM/DD)
    #[arg(short = 't', long, value_name = "DATE")]
    pub cutoff: Option<String>,

    /// Comma-separated conversation names (omit to choose interactively)
    #[arg(short, long = "channel", value_name = "NAMES")]
    pub channels: Option<String>,

    /// Only report what would be removed (pass `--dry-run=false` to delete)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub dry_run: Option<bool>,

    /// Number of passes over the selected conversations
    #[arg(short = 'r', long)]
    pub sweeps: Option<u32>,

    /// How messages are located: scoped or global
    #[arg(long)]
    pub strategy: Option<Strategy>,
}

impl PurgeArgs {
    /// Flags win over the config file and the environment.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(user) = &self.user {
            config.slack.user_id = Some(user.clone());
        }
        if let Some(dry_run) = self.dry_run {
            config.purge.dry_run = dry_run;
        }
        if let Some(sweeps) = self.sweeps {
            config.purge.sweeps = sweeps;
        }
        if let Some(strategy) = self.strategy {
            config.purge.strategy = strategy;
        }
    }
}
