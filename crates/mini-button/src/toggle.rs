//! Push-on, push-off button

use crate::button::Button;
use crate::config::Config;
use crate::error::Error;
use crate::hal::{Clock, InputLine};
use crate::{elapsed_ms, PressedFor};

/// A latch that flips every time its button is pressed.
///
/// Only the press edge counts: releasing the button, or holding it, never
/// flips the latch.
pub struct ToggleButton<L, C> {
    button: Button<L, C>,
    toggle_state: bool,
    /// Tick of the last flip
    last_change: u32,
}

impl<L, C> ToggleButton<L, C>
where
    L: InputLine,
    C: Clock,
{
    /// Create a toggle starting in `initial_state`.
    pub fn new(line: L, clock: C, config: Config, initial_state: bool) -> Self {
        Self {
            button: Button::new(line, clock, config),
            toggle_state: initial_state,
            last_change: 0,
        }
    }

    /// Seed the underlying button. The toggle keeps its initial state.
    pub fn begin(&mut self) -> Result<(), Error<L::Error>> {
        self.button.begin()?;
        self.last_change = self.button.last_change();
        Ok(())
    }

    /// Read the button and return the toggle state.
    pub fn try_read(&mut self) -> Result<bool, Error<L::Error>> {
        self.button.try_read()?;
        Ok(self.latch())
    }

    /// Read the button and return the toggle state.
    pub fn read(&mut self) -> bool {
        self.button.read();
        self.latch()
    }

    fn latch(&mut self) -> bool {
        if self.button.was_pressed() {
            self.toggle_state = !self.toggle_state;
            self.last_change = self.button.last_change();
            log::debug!("toggle: now {}", self.toggle_state);
        }
        self.toggle_state
    }

    /// The last `read()` flipped the toggle.
    pub fn changed(&self) -> bool {
        self.button.was_pressed()
    }

    /// Current toggle state.
    pub fn toggle_state(&self) -> bool {
        self.toggle_state
    }

    /// Toggle is on and has not flipped for at least `ms` milliseconds.
    pub fn pressed_for(&self, ms: u32) -> bool {
        self.toggle_state && self.held_for(ms)
    }

    /// Toggle is off and has not flipped for at least `ms` milliseconds.
    pub fn released_for(&self, ms: u32) -> bool {
        !self.toggle_state && self.held_for(ms)
    }

    /// Tick (ms) of the last flip, or of `begin()` if it never flipped.
    pub fn last_change(&self) -> u32 {
        self.last_change
    }

    /// The underlying debounced button.
    pub fn button(&self) -> &Button<L, C> {
        &self.button
    }

    fn held_for(&self, ms: u32) -> bool {
        elapsed_ms(self.button.now_ms(), self.last_change) >= ms
    }
}

impl<L, C> PressedFor for ToggleButton<L, C>
where
    L: InputLine,
    C: Clock,
{
    fn pressed_for(&self, ms: u32) -> bool {
        ToggleButton::pressed_for(self, ms)
    }
}
