use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthStr;

/// Composer never grows past this many text lines
pub const MAX_COMPOSER_LINES: u16 = 5;

/// Calculated layout for the chat view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLayout {
    /// Header area (1 line)
    pub header: Rect,
    /// Conversation log
    pub transcript: Rect,
    /// Bordered composer (3 to 7 rows)
    pub composer: Rect,
}

impl ChatLayout {
    /// Split `area` for a composer showing `composer_lines` lines of text.
    pub fn calculate(area: Rect, composer_lines: u16) -> Self {
        let composer_height = composer_lines.clamp(1, MAX_COMPOSER_LINES) + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(composer_height)])
            .split(area);

        Self { header: chunks[0], transcript: chunks[1], composer: chunks[2] }
    }

    /// Composer text area and the send label to its right
    pub fn composer_sections(&self) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(12)])
            .split(self.composer);

        (chunks[0], chunks[1])
    }
}

/// Number of wrapped lines `text` needs at `width` columns, within 1..=5.
pub fn composer_lines(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let lines: usize = text.split('\n').map(|line| line.width().div_ceil(width).max(1)).sum();
    u16::try_from(lines).unwrap_or(u16::MAX).clamp(1, MAX_COMPOSER_LINES)
}
