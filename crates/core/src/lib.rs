pub mod busy;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod pacing;
pub mod playback;
pub mod segment;
pub mod store;

pub use busy::BusySignal;
pub use config::{
    Config, FileLoggingConfig, HistoryOrder, LoggingConfig, MessagesConfig, PlaybackConfig, ServerConfig,
    ThemeVariant, UiConfig,
};
pub use error::{Error, Result};
pub use message::{RawPayload, Role, Utterance};
pub use pacing::PacingPolicy;
pub use playback::{PlaybackScheduler, PlaybackState, RevealMode, RevealOutcome};
pub use segment::{DEFAULT_SENTINEL, split_segments};
pub use store::MessageStore;
