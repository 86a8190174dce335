mod event_loop;

pub use event_loop::run;

use crate::event_handler::{EventHandler, KeyAction};
use crate::layout::{ChatLayout, composer_lines};
use crate::state::AppState;
use crate::theme::{self, Theme};
use crate::transcript::TranscriptRenderer;

use crossterm::event::Event;
use murmur_core::Config;
use murmur_session::ChatSession;
use ratatui::Frame;
use ratatui::layout::{Alignment, Position};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Terminal chat application
///
/// Owns the view state and a shared handle to the [`ChatSession`]; the
/// conversation log is read from the session store on every draw.
pub struct App {
    session: Arc<ChatSession>,
    state: AppState,
    theme_path: Option<PathBuf>,
    store_rx: watch::Receiver<usize>,
    busy_rx: watch::Receiver<bool>,
    history_rx: watch::Receiver<bool>,
    seen_messages: usize,
}

impl App {
    pub fn new(session: Arc<ChatSession>, config: &Config) -> Self {
        let theme_path = config.ui.theme_file.clone().or_else(theme::default_theme_path);
        let variant = theme_path.as_deref().and_then(theme::load_variant).unwrap_or(config.ui.theme);

        let state = AppState::new(session.session_id(), config.messages.clone(), Theme::for_variant(variant));
        let store_rx = session.store().subscribe();
        let busy_rx = session.busy().subscribe();
        let history_rx = session.subscribe_history();

        Self { session, state, theme_path, store_rx, busy_rx, history_rx, seen_messages: 0 }
    }

    pub fn session(&self) -> &Arc<ChatSession> {
        &self.session
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Apply one terminal event.
    pub fn handle_event(&mut self, event: Event) {
        if let Some(action) = EventHandler::handle_event(event, &mut self.state) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Submit => self.submit(),
            KeyAction::Quit => self.state.request_exit(),
            KeyAction::ToggleTheme => self.toggle_theme(),
            KeyAction::ScrollUp => self.state.scroll.page_up(self.state.page_height),
            KeyAction::ScrollDown => self.state.scroll.page_down(self.state.page_height),
        }
    }

    fn submit(&mut self) {
        if self.session.submit(&mut self.state.input.buffer).is_some() {
            self.state.input.clamp_cursor();
            self.state.scroll.to_bottom();
        }
        self.sync();
    }

    fn toggle_theme(&mut self) {
        self.state.toggle_theme();
        let variant = self.state.theme.variant;
        tracing::debug!(theme = variant.as_str(), "theme toggled");

        if let Some(path) = &self.theme_path
            && let Err(e) = theme::save_variant(path, variant)
        {
            tracing::warn!(path = %path.display(), error = %e, "failed to persist theme");
        }
    }

    /// Pull busy state, history progress and message count from the
    /// session; new messages scroll the view back to the newest line.
    pub fn sync(&mut self) {
        self.state.busy = *self.busy_rx.borrow_and_update();
        self.state.history_loading = *self.history_rx.borrow_and_update();
        let count = *self.store_rx.borrow_and_update();
        if count != self.seen_messages {
            self.seen_messages = count;
            self.state.scroll.to_bottom();
        }
    }

    /// Cancel pending reveals and stop the session.
    pub fn shutdown(&mut self) {
        self.session.shutdown();
        self.state.request_exit();
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let theme = self.state.theme;
        frame.render_widget(Block::default().style(theme.base()), area);

        let text_width = area.width.saturating_sub(2 + 12);
        let layout = ChatLayout::calculate(area, composer_lines(&self.state.input.buffer, text_width));

        self.render_header(frame, &layout);
        self.render_transcript(frame, &layout);
        self.render_composer(frame, &layout);
    }

    fn render_header(&self, frame: &mut Frame<'_>, layout: &ChatLayout) {
        let theme = &self.state.theme;
        let mut spans = vec![
            Span::styled(" murmur ", theme.title()),
            Span::styled(format!("session {}", self.state.session_id), theme.muted()),
        ];
        if self.state.busy {
            spans.push(Span::styled(format!("  {}", self.state.messages.sending_label), theme.busy()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.base()), layout.header);
    }

    fn render_transcript(&mut self, frame: &mut Frame<'_>, layout: &ChatLayout) {
        let area = layout.transcript;
        let utterances = self.session.store().snapshot();
        let theme = self.state.theme;

        let lines = TranscriptRenderer::new(&utterances, &theme, &self.state.messages.empty_conversation)
            .render_lines(area.width);

        let height = usize::from(area.height);
        self.state.page_height = height.max(1);
        let top = self.state.scroll.top_line(lines.len(), height);
        let visible: Vec<Line<'static>> = lines.into_iter().skip(top).take(height).collect();

        frame.render_widget(Paragraph::new(visible).style(theme.base()), area);
    }

    fn render_composer(&self, frame: &mut Frame<'_>, layout: &ChatLayout) {
        let theme = &self.state.theme;
        let (text_area, label_area) = layout.composer_sections();
        let enabled = self.state.input_enabled();

        let border = if enabled { theme.focused_border() } else { theme.border() };
        let block = Block::default().borders(Borders::ALL).border_style(border).style(theme.base());

        let content = if self.state.input.is_empty() {
            Line::from(Span::styled(self.state.messages.input_placeholder.clone(), theme.muted()))
        } else {
            Line::from(self.state.input.buffer.clone())
        };
        let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, text_area);

        let label_style = if enabled { theme.title() } else { theme.busy() };
        let label = Paragraph::new(Line::from(Span::styled(self.state.send_label().to_string(), label_style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border).style(theme.base()));
        frame.render_widget(label, label_area);

        if enabled {
            let inner_width = text_area.width.saturating_sub(2).max(1);
            let before_cursor: String = self.state.input.buffer.chars().take(self.state.input.cursor).collect();
            let offset = unicode_width::UnicodeWidthStr::width(before_cursor.as_str()) as u16;
            let x = text_area.x + 1 + offset % inner_width;
            let y = text_area.y + 1 + offset / inner_width;
            if y < text_area.y + text_area.height.saturating_sub(1) {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }
}
