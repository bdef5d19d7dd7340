pub mod clock;
pub mod cutoff;
pub mod directory;
pub mod purge;
pub mod retry;
pub mod sweep;

pub use clock::{RecordingSleeper, Sleeper, TokioSleeper};
pub use cutoff::Cutoff;
pub use directory::ConversationDirectory;
pub use purge::{
    EngineContext, PurgeEngine, PurgeOutcome, PurgeRequest, Strategy, create_engine,
};
pub use retry::RetryExecutor;
pub use sweep::{SweepReport, SweepRunner};
