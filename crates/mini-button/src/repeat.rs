//! Auto-repeating button
//!
//! While the button is held past the initial delay, the virtual state drops to
//! released for a single poll once per repeat period, so a caller watching
//! `was_pressed()` sees a new press after every blip.
//!
//! Repeats are counted rather than derived from `elapsed % rate`: the button
//! tracks how many periods should have elapsed since the press and how many
//! blips it has emitted, and emits one more whenever it is behind. A slow or
//! irregular polling loop therefore cannot skip a period.
//!
//! A blip is only emitted when the previous poll saw the button virtually
//! pressed, so polling at or above the repeat period yields a blip on every
//! other poll and the count falls behind the elapsed periods while held.

use crate::button::Button;
use crate::config::{Config, RepeatConfig};
use crate::error::Error;
use crate::hal::{Clock, InputLine};
use crate::{elapsed_ms, PressedFor};

/// A button that synthesizes key-repeat while held.
pub struct RepeatButton<L, C> {
    button: Button<L, C>,
    repeat: RepeatConfig,
    /// Virtual state, true = pressed
    state: bool,
    /// Virtual state as of the previous `read()`
    last_state: bool,
    /// Blips emitted since the current physical press began
    repeat_count: u32,
    /// Tick of the last virtual change
    last_change: u32,
}

impl<L, C> RepeatButton<L, C>
where
    L: InputLine,
    C: Clock,
{
    /// Create a repeating button.
    pub fn new(line: L, clock: C, config: Config, repeat: RepeatConfig) -> Self {
        Self {
            button: Button::new(line, clock, config),
            repeat,
            state: false,
            last_state: false,
            repeat_count: 0,
            last_change: 0,
        }
    }

    /// Seed the underlying button and mirror its state.
    pub fn begin(&mut self) -> Result<(), Error<L::Error>> {
        self.button.begin()?;
        self.state = self.button.is_pressed();
        self.last_state = self.state;
        self.repeat_count = 0;
        self.last_change = self.button.last_change();
        Ok(())
    }

    /// Read the button and return the virtual state.
    ///
    /// A failed sample reports no change and emits no blip.
    pub fn try_read(&mut self) -> Result<bool, Error<L::Error>> {
        if let Err(e) = self.button.try_read() {
            self.last_state = self.state;
            return Err(e);
        }
        Ok(self.synthesize())
    }

    /// Read the button and return the virtual state.
    pub fn read(&mut self) -> bool {
        self.button.read();
        self.synthesize()
    }

    fn synthesize(&mut self) -> bool {
        let now = self.button.now_ms();
        self.last_state = self.state;
        self.state = self.button.is_pressed();

        if self.state {
            let held = elapsed_ms(now, self.button.last_change());
            let delay = self.repeat.delay_ms();
            if held >= delay {
                let due = (held - delay) / self.repeat.rate_ms() + 1;
                if self.repeat_count < due && self.last_state {
                    self.state = false;
                    self.repeat_count += 1;
                    log::debug!("repeat: blip {} at {}ms", self.repeat_count, now);
                }
            }
        } else {
            self.repeat_count = 0;
        }

        if self.state != self.last_state {
            self.last_change = now;
        }
        self.state
    }

    /// Virtual state is pressed.
    pub fn is_pressed(&self) -> bool {
        self.state
    }

    /// Virtual state is released.
    pub fn is_released(&self) -> bool {
        !self.state
    }

    /// The last `read()` changed the virtual state to pressed.
    pub fn was_pressed(&self) -> bool {
        self.state && self.changed()
    }

    /// The last `read()` changed the virtual state to released.
    pub fn was_released(&self) -> bool {
        !self.state && self.changed()
    }

    /// The virtual state changed on the last `read()`.
    pub fn changed(&self) -> bool {
        self.state != self.last_state
    }

    /// Virtually pressed and unchanged for at least `ms` milliseconds.
    pub fn pressed_for(&self, ms: u32) -> bool {
        self.state && self.held_for(ms)
    }

    /// Virtually released and unchanged for at least `ms` milliseconds.
    pub fn released_for(&self, ms: u32) -> bool {
        !self.state && self.held_for(ms)
    }

    /// Blips emitted during the current press; zero while released.
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// Tick (ms) of the last virtual change.
    pub fn last_change(&self) -> u32 {
        self.last_change
    }

    /// Repeat timing.
    pub fn repeat_config(&self) -> &RepeatConfig {
        &self.repeat
    }

    /// The underlying debounced button.
    pub fn button(&self) -> &Button<L, C> {
        &self.button
    }

    fn held_for(&self, ms: u32) -> bool {
        elapsed_ms(self.button.now_ms(), self.last_change) >= ms
    }
}

impl<L, C> PressedFor for RepeatButton<L, C>
where
    L: InputLine,
    C: Clock,
{
    fn pressed_for(&self, ms: u32) -> bool {
        RepeatButton::pressed_for(self, ms)
    }
}
