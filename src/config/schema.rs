use crate::core::purge::{DEFAULT_PAGE_SIZE, Strategy};
use crate::error::ConfigError;
use crate::transport::slack::DEFAULT_API_URL;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TOKEN_ENV: &str = "SLACK_TOKEN";
pub const USER_ENV: &str = "SLACKWIPER_USER";
pub const API_URL_ENV: &str = "SLACKWIPER_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path the config was read from, if any - not serialized
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub slack: SlackConfig,

    #[serde(default)]
    pub purge: PurgeConfig,

    #[serde(default)]
    pub reliability: ReliabilityConfig,
}

// ── Slack session ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// User token (`xoxp-...`). Usually supplied through `SLACK_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Id of the user whose messages are removed.
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
            user_id: None,
        }
    }
}

// ── Purge behaviour ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeConfig {
    #[serde(default)]
    pub strategy: Strategy,
    /// Search results per page (Slack caps this at 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Nothing is deleted unless this is explicitly turned off.
    #[serde(default = "default_true")]
    pub dry_run: bool,
    /// Full passes per run; later passes catch late-indexed messages.
    #[serde(default = "default_sweeps")]
    pub sweeps: u32,
    #[serde(default = "default_sweep_pause_secs")]
    pub sweep_pause_secs: u64,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

fn default_sweeps() -> u32 {
    1
}

fn default_sweep_pause_secs() -> u64 {
    10
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            page_size: default_page_size(),
            dry_run: true,
            sweeps: default_sweeps(),
            sweep_pause_secs: default_sweep_pause_secs(),
        }
    }
}

impl PurgeConfig {
    pub fn sweep_pause(&self) -> Duration {
        Duration::from_secs(self.sweep_pause_secs)
    }
}

// ── Reliability / pacing ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    /// Attempts per remote call before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay between search pages and after each deletion.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

fn default_max_attempts() -> u32 {
    crate::core::retry::DEFAULT_MAX_ATTEMPTS
}

fn default_pacing_ms() -> u64 {
    600
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            pacing_ms: default_pacing_ms(),
        }
    }
}

impl ReliabilityConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl Config {
    /// `~/.slackwiper/config.toml`, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        UserDirs::new().map(|u| u.home_dir().join(".slackwiper").join("config.toml"))
    }

    /// Reads `explicit` (must exist) or the default path (may be absent).
    /// Never writes anything.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (
                Some(PathBuf::from(
                    shellexpand::tilde(&path.to_string_lossy()).as_ref(),
                )),
                true,
            ),
            None => (Self::default_path(), false),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            if required {
                return Err(ConfigError::Load(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        config.config_path = Some(path);
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.slack.token = Some(token);
        }
        if let Some(user) = lookup(USER_ENV).filter(|v| !v.is_empty()) {
            self.slack.user_id = Some(user);
        }
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.slack.api_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token()?;
        self.user_id()?;
        if self.reliability.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "reliability.max_attempts must be >= 1".into(),
            ));
        }
        if self.purge.sweeps == 0 {
            return Err(ConfigError::Validation("purge.sweeps must be >= 1".into()));
        }
        if !(1..=DEFAULT_PAGE_SIZE).contains(&self.purge.page_size) {
            return Err(ConfigError::Validation(format!(
                "purge.page_size must be between 1 and {DEFAULT_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    pub fn token(&self) -> Result<&str, ConfigError> {
        self.slack
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                what: "Slack token",
                hint: format!("set the {TOKEN_ENV} environment variable"),
            })
    }

    pub fn user_id(&self) -> Result<&str, ConfigError> {
        self.slack
            .user_id
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                what: "user id",
                hint: format!("pass --user or set {USER_ENV}"),
            })
    }
}
