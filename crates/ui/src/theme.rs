use murmur_core::ThemeVariant;
use ratatui::style::{Color, Modifier, Style};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Color palette for the chat view
///
/// Dark is based on iceberg.vim (https://github.com/cocopon/iceberg.vim),
/// light on its `background=light` counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub variant: ThemeVariant,
    /// Primary background (fills terminal)
    pub bg: Color,
    /// Primary text
    pub fg: Color,
    /// Panels and bubbles
    pub panel_bg: Color,
    /// User bubbles and focused borders
    pub accent: Color,
    /// Hints, placeholders, secondary text
    pub muted: Color,
    pub border: Color,
    /// Busy indicator
    pub warning: Color,
}

impl Theme {
    pub const DARK: Theme = Theme {
        variant: ThemeVariant::Dark,
        bg: Color::Rgb(22, 24, 33),
        fg: Color::Rgb(198, 200, 209),
        panel_bg: Color::Rgb(30, 33, 50),
        accent: Color::Rgb(132, 160, 198),
        muted: Color::Rgb(107, 112, 137),
        border: Color::Rgb(60, 65, 90),
        warning: Color::Rgb(226, 164, 120),
    };

    pub const LIGHT: Theme = Theme {
        variant: ThemeVariant::Light,
        bg: Color::Rgb(232, 233, 236),
        fg: Color::Rgb(51, 55, 76),
        panel_bg: Color::Rgb(220, 223, 231),
        accent: Color::Rgb(45, 83, 158),
        muted: Color::Rgb(140, 144, 163),
        border: Color::Rgb(204, 207, 218),
        warning: Color::Rgb(199, 115, 57),
    };

    pub fn for_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::DARK,
            ThemeVariant::Light => Self::LIGHT,
        }
    }

    pub fn toggled(&self) -> Self {
        Self::for_variant(self.variant.toggled())
    }

    /// Base style for all text
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// User bubble: accent background, right side
    pub fn user(&self) -> Style {
        Style::default().fg(self.bg).bg(self.accent)
    }

    /// System bubble: panel background, left side
    pub fn system(&self) -> Style {
        Style::default().fg(self.fg).bg(self.panel_bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted).bg(self.bg)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent).bg(self.bg)
    }

    pub fn busy(&self) -> Style {
        Style::default().fg(self.warning).bg(self.bg).add_modifier(Modifier::ITALIC)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).bg(self.bg).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DARK
    }
}

/// `~/.murmur/theme`
pub fn default_theme_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".murmur").join("theme"))
}

/// Read the remembered theme choice; missing or unreadable files yield `None`.
pub fn load_variant(path: &Path) -> Option<ThemeVariant> {
    let content = fs::read_to_string(path).ok()?;
    match content.parse() {
        Ok(variant) => Some(variant),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable theme file");
            None
        }
    }
}

pub fn save_variant(path: &Path, variant: ThemeVariant) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, variant.as_str())
}
