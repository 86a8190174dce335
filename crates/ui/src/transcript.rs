use crate::theme::Theme;
use murmur_core::{Role, Utterance};
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Turns the conversation log into styled, wrapped lines
///
/// User utterances are right-aligned and system utterances left-aligned,
/// each as a padded bubble at most three quarters of the view wide.
pub struct TranscriptRenderer<'a> {
    utterances: &'a [Utterance],
    theme: &'a Theme,
    empty_hint: &'a str,
}

impl<'a> TranscriptRenderer<'a> {
    pub fn new(utterances: &'a [Utterance], theme: &'a Theme, empty_hint: &'a str) -> Self {
        Self { utterances, theme, empty_hint }
    }

    pub fn render_lines(&self, width: u16) -> Vec<Line<'static>> {
        if self.utterances.is_empty() {
            return vec![
                Line::default(),
                Line::from(Span::styled(self.empty_hint.to_string(), self.theme.muted())).alignment(Alignment::Center),
            ];
        }

        let bubble_width = Self::bubble_text_width(width);
        let mut lines = Vec::new();

        for utterance in self.utterances {
            lines.push(Line::default());

            let (style, alignment) = match utterance.role() {
                Role::User => (self.theme.user(), Alignment::Right),
                Role::System => (self.theme.system(), Alignment::Left),
            };

            for chunk in wrap_chars(utterance.content(), bubble_width) {
                lines.push(Self::bubble_line(chunk, style, alignment));
            }
        }

        lines
    }

    fn bubble_text_width(width: u16) -> usize {
        let usable = usize::from(width).saturating_mul(3) / 4;
        usable.saturating_sub(2).max(1)
    }

    fn bubble_line(chunk: String, style: Style, alignment: Alignment) -> Line<'static> {
        Line::from(Span::styled(format!(" {} ", chunk), style)).alignment(alignment)
    }
}

/// Wrap on display width, breaking anywhere (CJK text has no spaces).
pub fn wrap_chars(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut out = Vec::new();

    for source_line in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for ch in source_line.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > max_width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }

        out.push(current);
    }

    out
}
