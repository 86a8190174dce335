use std::time::Duration;

/// Typing-speed simulation for timed reveals
///
/// The delay before a segment appears grows with its length and is clamped
/// to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    per_char: Duration,
    min: Duration,
    max: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self { per_char: Duration::from_millis(100), min: Duration::from_millis(1000), max: Duration::from_millis(5000) }
    }
}

impl PacingPolicy {
    /// Create a policy; bounds given in the wrong order are swapped.
    pub fn new(per_char: Duration, min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { per_char, min, max }
    }

    /// Create from millisecond values (config representation)
    pub fn from_millis(per_char_ms: u64, min_ms: u64, max_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(per_char_ms),
            Duration::from_millis(min_ms),
            Duration::from_millis(max_ms),
        )
    }

    /// No delay at all; useful for headless tools and tests.
    pub fn immediate() -> Self {
        Self { per_char: Duration::ZERO, min: Duration::ZERO, max: Duration::ZERO }
    }

    /// Delay before revealing `segment`, measured in characters, not bytes.
    pub fn delay_for(&self, segment: &str) -> Duration {
        let chars = u32::try_from(segment.chars().count()).unwrap_or(u32::MAX);
        self.per_char.saturating_mul(chars).clamp(self.min, self.max)
    }

    pub fn per_char(&self) -> Duration {
        self.per_char
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}
