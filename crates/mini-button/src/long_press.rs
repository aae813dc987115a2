//! Long-press observer
//!
//! A [`LongPress`] never touches hardware. Each poll it asks the object it
//! watches whether that object has been pressed for at least the threshold,
//! and reports the answer as its own pressed/released state. The watched
//! object is lent to `read()` rather than stored, so its owner keeps polling
//! it mutably and several observers can share it.

use crate::hal::Clock;
use crate::{elapsed_ms, PressedFor};

/// Pressed while the watched object has been held past a threshold.
pub struct LongPress<C> {
    clock: C,
    threshold_ms: u32,
    state: bool,
    last_state: bool,
    /// Tick of the last change of the derived state
    last_change: u32,
}

impl<C: Clock> LongPress<C> {
    /// Create an observer with a threshold (clamped to at least 1 ms).
    pub fn new(clock: C, threshold_ms: u32) -> Self {
        Self {
            clock,
            threshold_ms: threshold_ms.max(1),
            state: false,
            last_state: false,
            last_change: 0,
        }
    }

    /// Start released, stamped now.
    pub fn begin(&mut self) {
        self.state = false;
        self.last_state = false;
        self.last_change = self.clock.now_ms();
    }

    /// Re-evaluate against `observed` and return the derived state.
    ///
    /// Poll `observed` first in the same loop iteration.
    pub fn read<P>(&mut self, observed: &P) -> bool
    where
        P: PressedFor + ?Sized,
    {
        self.last_state = self.state;
        self.state = observed.pressed_for(self.threshold_ms);
        if self.state != self.last_state {
            self.last_change = self.clock.now_ms();
            log::debug!(
                "long press: pressed={} at {}ms",
                self.state,
                self.last_change
            );
        }
        self.state
    }

    /// Observed object was held past the threshold at the last `read()`.
    pub fn is_pressed(&self) -> bool {
        self.state
    }

    /// Not a long press at the last `read()`.
    pub fn is_released(&self) -> bool {
        !self.state
    }

    /// The last `read()` crossed the threshold.
    pub fn was_pressed(&self) -> bool {
        self.state && self.changed()
    }

    /// The last `read()` ended a long press.
    pub fn was_released(&self) -> bool {
        !self.state && self.changed()
    }

    /// The derived state changed on the last `read()`.
    pub fn changed(&self) -> bool {
        self.state != self.last_state
    }

    /// Long-pressed and unchanged for at least `ms` milliseconds.
    pub fn pressed_for(&self, ms: u32) -> bool {
        self.state && self.held_for(ms)
    }

    /// Not long-pressed, unchanged for at least `ms` milliseconds.
    pub fn released_for(&self, ms: u32) -> bool {
        !self.state && self.held_for(ms)
    }

    /// Tick (ms) of the last change of the derived state.
    pub fn last_change(&self) -> u32 {
        self.last_change
    }

    /// Hold time needed to count as a long press.
    pub fn threshold_ms(&self) -> u32 {
        self.threshold_ms
    }

    fn held_for(&self, ms: u32) -> bool {
        elapsed_ms(self.clock.now_ms(), self.last_change) >= ms
    }
}

impl<C: Clock> PressedFor for LongPress<C> {
    fn pressed_for(&self, ms: u32) -> bool {
        LongPress::pressed_for(self, ms)
    }
}
