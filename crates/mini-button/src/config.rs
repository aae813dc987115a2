//! Button configuration types and builder
//!
//! Out-of-range values are clamped, never rejected, so building a
//! configuration cannot fail.

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u16 = 25;

/// Shortest accepted debounce window
pub const MIN_DEBOUNCE_MS: u32 = 1;

/// Longest accepted debounce window
///
/// The debounce start is kept as the low 16 bits of the clock, so the window
/// has to stay comfortably below 65536 ms for the wrapping comparison to hold.
pub const MAX_DEBOUNCE_MS: u32 = 60_000;

/// Default delay before auto-repeat starts
pub const DEFAULT_REPEAT_DELAY_MS: u32 = 500;

/// Default auto-repeat period
pub const DEFAULT_REPEAT_RATE_MS: u32 = 100;

/// Debounced button configuration
///
/// Use [`Builder`] (or [`Config::default`]) to create one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Debounce window in milliseconds, within [1, 60000]
    debounce_ms: u16,
    /// Enable the line's pull-up resistor in `begin()`
    pull_up: bool,
    /// Interpret a low level as pressed
    invert: bool,
}

impl Config {
    /// Start building a configuration from the defaults.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Debounce window in milliseconds
    pub fn debounce_ms(&self) -> u16 {
        self.debounce_ms
    }

    /// Whether `begin()` enables the pull-up resistor
    pub fn pull_up(&self) -> bool {
        self.pull_up
    }

    /// Whether a low level reads as pressed
    pub fn invert(&self) -> bool {
        self.invert
    }
}

impl Default for Config {
    fn default() -> Self {
        Builder::new().build()
    }
}

/// Builder for [`Config`]
///
/// # Example
///
/// ```
/// use mini_button::Config;
///
/// // Active-high button with an external pull-down.
/// let config = Config::builder()
///     .debounce_ms(10)
///     .pull_up(false)
///     .invert(false)
///     .build();
/// assert_eq!(config.debounce_ms(), 10);
///
/// // Zero is not a valid window.
/// assert_eq!(Config::builder().debounce_ms(0).build().debounce_ms(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    debounce_ms: u32,
    pull_up: bool,
    invert: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            debounce_ms: DEFAULT_DEBOUNCE_MS as u32,
            // Internal pull-up with the contact to ground...
            pull_up: true,
            // ...so a low level means pressed.
            invert: true,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debounce window (clamped to [1, 60000] ms)
    pub fn debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Enable or disable the pull-up resistor
    pub fn pull_up(mut self, enabled: bool) -> Self {
        self.pull_up = enabled;
        self
    }

    /// Interpret a low level as pressed
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        let debounce_ms = self.debounce_ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
        Config {
            // Fits: clamped to MAX_DEBOUNCE_MS above.
            debounce_ms: debounce_ms as u16,
            pull_up: self.pull_up,
            invert: self.invert,
        }
    }
}

/// Auto-repeat timing for [`RepeatButton`](crate::RepeatButton)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatConfig {
    delay_ms: u32,
    rate_ms: u32,
}

impl RepeatConfig {
    /// Repeat every `rate_ms` once the button has been held for `delay_ms`.
    ///
    /// Both values are clamped to at least 1 ms.
    pub fn new(delay_ms: u32, rate_ms: u32) -> Self {
        Self {
            delay_ms: delay_ms.max(1),
            rate_ms: rate_ms.max(1),
        }
    }

    /// Hold time before the first repeat
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Time between repeats
    pub fn rate_ms(&self) -> u32 {
        self.rate_ms
    }
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_DELAY_MS, DEFAULT_REPEAT_RATE_MS)
    }
}
