use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pacing::PacingPolicy;
use crate::segment::DEFAULT_SENTINEL;

/// Order in which the history endpoint lists past turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryOrder {
    /// Most recent turn first; reversed before display (default)
    #[default]
    NewestFirst,
    /// Already chronological
    OldestFirst,
}

impl HistoryOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryOrder::NewestFirst => "newest-first",
            HistoryOrder::OldestFirst => "oldest-first",
        }
    }

    /// Reorder `items` (as received) into display order.
    pub fn into_chronological<T>(self, mut items: Vec<T>) -> Vec<T> {
        if self == HistoryOrder::NewestFirst {
            items.reverse();
        }
        items
    }
}

impl std::fmt::Display for HistoryOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HistoryOrder {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest-first" => Ok(HistoryOrder::NewestFirst),
            "oldest-first" => Ok(HistoryOrder::OldestFirst),
            _ => Err(crate::Error::Config(ConfigError::InvalidHistoryOrder(s.to_string()).to_string())),
        }
    }
}

/// Dark/light palette selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeVariant::Dark => "dark",
            ThemeVariant::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeVariant::Dark => ThemeVariant::Light,
            ThemeVariant::Light => ThemeVariant::Dark,
        }
    }
}

impl std::fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ThemeVariant {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(ThemeVariant::Dark),
            "light" => Ok(ThemeVariant::Light),
            _ => Err(crate::Error::Config(ConfigError::InvalidTheme(s.to_string()).to_string())),
        }
    }
}

/// Remote chat service location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL; `/chat` and `/get_history` are appended
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:5000".to_string(), timeout_secs: 30 }
    }
}

/// Reveal pacing and payload splitting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    pub sentinel: char,
    pub per_char_ms: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub history_order: HistoryOrder,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            per_char_ms: 100,
            min_delay_ms: 1000,
            max_delay_ms: 5000,
            history_order: HistoryOrder::default(),
        }
    }
}

impl PlaybackConfig {
    pub fn pacing(&self) -> PacingPolicy {
        PacingPolicy::from_millis(self.per_char_ms, self.min_delay_ms, self.max_delay_ms)
    }
}

/// User-visible fixed strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessagesConfig {
    /// Shown as a system utterance when either endpoint fails
    pub network_error: String,
    /// Reply text when `/chat` succeeds without data
    pub no_response: String,
    /// Hint rendered while the log is empty
    pub empty_conversation: String,
    pub input_placeholder: String,
    pub send_label: String,
    pub sending_label: String,
    /// Composer refuses characters beyond this count
    pub max_input_chars: usize,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            network_error: "网络异常，请稍后重试。".to_string(),
            no_response: "系统无响应".to_string(),
            empty_conversation: "开始你的对话吧~".to_string(),
            input_placeholder: "请输入你的问题...".to_string(),
            send_label: "发送".to_string(),
            sending_label: "发送中...".to_string(),
            max_input_chars: 200,
        }
    }
}

/// Terminal front-end preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Initial theme when no persisted choice exists
    pub theme: ThemeVariant,
    /// Where the toggled theme is remembered (default: ~/.murmur/theme)
    pub theme_file: Option<PathBuf>,
}

/// File logging section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    /// Log directory (default: ~/.murmur/logs, or `MURMUR_LOG_DIR`)
    pub directory: Option<PathBuf>,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "pretty".to_string(), file: FileLoggingConfig::default() }
    }
}

/// Root configuration structure for murmur.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Conversation identity sent to the history endpoint
    #[serde(default = "default_session_id")]
    pub session_id: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub messages: MessagesConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_session_id() -> String {
    "default".to_string()
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| crate::Error::Config(ConfigError::from(e).to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        use crate::Error;

        if self.session_id.trim().is_empty() {
            return Err(Error::Config(ConfigError::EmptySessionId.to_string()));
        }

        if self.server.base_url.trim().is_empty() {
            return Err(Error::Config(ConfigError::EmptyBaseUrl.to_string()));
        }

        if self.playback.min_delay_ms > self.playback.max_delay_ms {
            return Err(Error::Config(
                ConfigError::InvalidDelayBounds { min: self.playback.min_delay_ms, max: self.playback.max_delay_ms }
                    .to_string(),
            ));
        }

        if self.playback.sentinel.is_whitespace() {
            return Err(Error::Config(ConfigError::InvalidSentinel(self.playback.sentinel).to_string()));
        }

        if self.messages.max_input_chars == 0 {
            return Err(Error::Config(ConfigError::InvalidInputLimit.to_string()));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# murmur configuration
# Copy this file to murmur.toml and customize as needed

# Conversation identity used to fetch history
session_id = "0d00"

[server]
# Chat service root; /chat and /get_history are appended
base_url = "http://localhost:5000"
timeout_secs = 30

[playback]
# Character that packs several utterances into one reply
sentinel = "$"
# Reveal delay per character, clamped to [min_delay_ms, max_delay_ms]
per_char_ms = 100
min_delay_ms = 1000
max_delay_ms = 5000
# "newest-first" or "oldest-first"
history_order = "newest-first"

[messages]
network_error = "网络异常，请稍后重试。"
no_response = "系统无响应"
empty_conversation = "开始你的对话吧~"
input_placeholder = "请输入你的问题..."
send_label = "发送"
sending_label = "发送中..."
max_input_chars = 200

[ui]
# "dark" or "light"; Ctrl+T toggles and remembers the choice
theme = "dark"
# theme_file = "/home/me/.murmur/theme"

[logging]
level = "warn"
# "pretty", "json" or "compact"
format = "pretty"

[logging.file]
enabled = false
# directory = "/home/me/.murmur/logs"
"#
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            session_id: default_session_id(),
            server: ServerConfig::default(),
            playback: PlaybackConfig::default(),
            messages: MessagesConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("session_id must not be empty")]
    EmptySessionId,

    #[error("server.base_url must not be empty")]
    EmptyBaseUrl,

    #[error("min_delay_ms ({min}) exceeds max_delay_ms ({max})")]
    InvalidDelayBounds { min: u64, max: u64 },

    #[error("sentinel must not be whitespace: {0:?}")]
    InvalidSentinel(char),

    #[error("max_input_chars must be positive")]
    InvalidInputLimit,

    #[error("invalid history order: {0}")]
    InvalidHistoryOrder(String),

    #[error("invalid theme: {0}")]
    InvalidTheme(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
