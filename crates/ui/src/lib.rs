pub mod app;
pub mod event_handler;
pub mod layout;
pub mod state;
pub mod theme;
pub mod transcript;

pub use app::App;
pub use event_handler::{EventHandler, KeyAction};
pub use layout::ChatLayout;
pub use state::{AppState, InputState, ScrollState};
pub use theme::Theme;
pub use transcript::TranscriptRenderer;
