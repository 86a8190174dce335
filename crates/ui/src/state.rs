mod input;
mod scroll;

pub use input::InputState;
pub use scroll::ScrollState;

use crate::theme::Theme;
use murmur_core::MessagesConfig;

/// Everything the view needs besides the conversation log itself
#[derive(Debug, Clone)]
pub struct AppState {
    pub session_id: String,
    pub input: InputState,
    pub scroll: ScrollState,
    pub theme: Theme,
    /// Mirror of the session busy signal
    pub busy: bool,
    /// History replay still in flight; input is held until it lands
    pub history_loading: bool,
    pub should_exit: bool,
    /// Fixed labels and hints
    pub messages: MessagesConfig,
    /// Transcript height from the last draw, used as the PgUp/PgDn step
    pub page_height: usize,
}

impl AppState {
    pub fn new(session_id: impl Into<String>, messages: MessagesConfig, theme: Theme) -> Self {
        Self {
            session_id: session_id.into(),
            input: InputState::new(messages.max_input_chars),
            scroll: ScrollState::default(),
            theme,
            busy: false,
            history_loading: false,
            should_exit: false,
            messages,
            page_height: 10,
        }
    }

    /// Composer accepts edits only while no reply or history is pending.
    pub fn input_enabled(&self) -> bool {
        !self.busy && !self.history_loading
    }

    pub fn send_label(&self) -> &str {
        if self.busy { &self.messages.sending_label } else { &self.messages.send_label }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn request_exit(&mut self) {
        self.should_exit = true;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new("default", MessagesConfig::default(), Theme::default())
    }
}
