pub mod schema;

pub use schema::{Config, PurgeConfig, ReliabilityConfig, SlackConfig};
