pub mod history;
pub mod send;
pub mod session;

pub use history::HistoryLoader;
pub use send::{SendController, TurnHandle, TurnOutcome};
pub use session::ChatSession;
