//! Debounced button
//!
//! The debouncer has two modes. While *stable*, any sample that disagrees with
//! the current state opens a candidate change and records when it began. While
//! *debouncing*, the candidate is confirmed once the disagreement has lasted
//! the whole debounce window, or dropped as soon as the line agrees with the
//! state again. A confirmed change is stamped with the tick of confirmation,
//! not the tick the bounce began.

use crate::config::Config;
use crate::error::Error;
use crate::hal::{Clock, InputLine};
use crate::{elapsed_ms, PressedFor};

/// A debounced push-button on one input line.
pub struct Button<L, C> {
    line: L,
    clock: C,
    config: Config,

    /// Stable state, true = pressed
    state: bool,
    /// Stable state as of the previous `read()`
    last_state: bool,
    /// A candidate change is being timed
    debouncing: bool,
    /// Start of the candidate change (low 16 bits of the clock)
    db_start: u16,
    /// Tick of the last confirmed change
    last_change: u32,
}

impl<L, C> Button<L, C>
where
    L: InputLine,
    C: Clock,
{
    /// Create a button. Call [`begin`](Self::begin) before the first `read()`.
    pub fn new(line: L, clock: C, config: Config) -> Self {
        Self {
            line,
            clock,
            config,
            state: false,
            last_state: false,
            debouncing: false,
            db_start: 0,
            last_change: 0,
        }
    }

    /// Configure the line and seed the state from one sample.
    ///
    /// The seeded state is never reported as a change.
    pub fn begin(&mut self) -> Result<(), Error<L::Error>> {
        self.line
            .configure(self.config.pull_up())
            .map_err(Error::Line)?;
        self.state = self.sample()?;
        self.last_state = self.state;
        self.debouncing = false;
        self.last_change = self.clock.now_ms();
        log::debug!(
            "button: begin pressed={} at {}ms (debounce {}ms)",
            self.state,
            self.last_change,
            self.config.debounce_ms()
        );
        Ok(())
    }

    /// Sample the line and advance the debouncer.
    ///
    /// Returns the stable state, true if pressed. A failed sample leaves the
    /// debouncer where it was and reports no change.
    pub fn try_read(&mut self) -> Result<bool, Error<L::Error>> {
        self.last_state = self.state;

        let now = self.clock.now_ms();
        let pin_val = self.sample()?;

        if self.debouncing {
            if pin_val != self.state {
                let now16 = now as u16;
                if now16.wrapping_sub(self.db_start) >= self.config.debounce_ms() {
                    self.state = pin_val;
                    self.last_change = now;
                    self.debouncing = false;
                    log::debug!("button: pressed={} at {}ms", self.state, now);
                }
            } else {
                self.debouncing = false;
                log::trace!("button: bounce dropped at {}ms", now);
            }
        } else if pin_val != self.state {
            self.db_start = now as u16;
            self.debouncing = true;
            log::trace!("button: debouncing from {}ms", now);
        }

        Ok(self.state)
    }

    /// Sample the line and advance the debouncer.
    ///
    /// Call this frequently; the polling period should be well below the
    /// debounce window. A line error is logged and the held state returned.
    pub fn read(&mut self) -> bool {
        match self.try_read() {
            Ok(state) => state,
            Err(Error::Line(e)) => {
                log::warn!("button: line read failed: {:?}", e);
                self.state
            }
        }
    }

    /// Stable state at the last `read()` is pressed. Does not sample.
    pub fn is_pressed(&self) -> bool {
        self.state
    }

    /// Stable state at the last `read()` is released. Does not sample.
    pub fn is_released(&self) -> bool {
        !self.state
    }

    /// The last `read()` changed the state to pressed.
    pub fn was_pressed(&self) -> bool {
        self.state && self.changed()
    }

    /// The last `read()` changed the state to released.
    pub fn was_released(&self) -> bool {
        !self.state && self.changed()
    }

    /// Pressed, and unchanged for at least `ms` milliseconds as of now.
    pub fn pressed_for(&self, ms: u32) -> bool {
        self.state && self.held_for(ms)
    }

    /// Released, and unchanged for at least `ms` milliseconds as of now.
    pub fn released_for(&self, ms: u32) -> bool {
        !self.state && self.held_for(ms)
    }

    /// The state changed on the last `read()`.
    pub fn changed(&self) -> bool {
        self.state != self.last_state
    }

    /// Tick (ms) of the last confirmed state change.
    pub fn last_change(&self) -> u32 {
        self.last_change
    }

    /// A candidate change is currently being timed.
    pub fn is_debouncing(&self) -> bool {
        self.debouncing
    }

    /// Configuration the button was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current tick of the button's clock.
    pub(crate) fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }

    /// Give back the line and clock.
    pub fn release(self) -> (L, C) {
        (self.line, self.clock)
    }

    fn held_for(&self, ms: u32) -> bool {
        elapsed_ms(self.clock.now_ms(), self.last_change) >= ms
    }

    /// Raw level with the inversion applied, true = pressed.
    fn sample(&mut self) -> Result<bool, Error<L::Error>> {
        let high = self.line.read_level().map_err(Error::Line)?;
        Ok(high ^ self.config.invert())
    }
}

impl<L, C> PressedFor for Button<L, C>
where
    L: InputLine,
    C: Clock,
{
    fn pressed_for(&self, ms: u32) -> bool {
        Button::pressed_for(self, ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FailingPin, ManualClock, MockPin};
    use embedded_hal::digital::ErrorKind;

    fn config(debounce_ms: u32) -> Config {
        Config::builder().debounce_ms(debounce_ms).build()
    }

    /// Poll at `t` after moving the clock there.
    fn read_at(button: &mut Button<&MockPin, &ManualClock>, clock: &ManualClock, t: u32) -> bool {
        clock.set(t);
        button.read()
    }

    #[test]
    fn begin_seeds_state_without_change() {
        let pin = MockPin::new(false); // active low: pressed
        let clock = ManualClock::new(100);
        let mut button = Button::new(&pin, &clock, Config::default());
        button.begin().unwrap();

        assert!(button.is_pressed());
        assert!(!button.changed());
        assert!(!button.was_pressed());
        assert_eq!(button.last_change(), 100);
        assert_eq!(pin.pull_up(), Some(true));
    }

    #[test]
    fn begin_respects_pull_and_invert() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(0);
        let config = Config::builder().pull_up(false).invert(false).build();
        let mut button = Button::new(&pin, &clock, config);
        button.begin().unwrap();

        assert!(button.is_pressed());
        assert_eq!(pin.pull_up(), Some(false));
    }

    #[test]
    fn press_confirmed_after_window() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(20));
        button.begin().unwrap();

        pin.set_high(false);
        for t in [0, 5, 10, 15] {
            assert!(!read_at(&mut button, &clock, t), "pressed too early at {t}");
            assert!(!button.changed());
        }
        assert!(read_at(&mut button, &clock, 20));
        assert!(button.was_pressed());
        assert_eq!(button.last_change(), 20);

        assert!(read_at(&mut button, &clock, 25));
        assert!(!button.changed());
    }

    #[test]
    fn short_bounce_never_changes_state() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(20));
        button.begin().unwrap();

        pin.set_high(false);
        read_at(&mut button, &clock, 1);
        read_at(&mut button, &clock, 10);
        assert!(button.is_debouncing());
        pin.set_high(true);
        read_at(&mut button, &clock, 15);
        assert!(!button.is_debouncing());

        for t in 16..100 {
            assert!(!read_at(&mut button, &clock, t));
            assert!(!button.changed());
        }
        assert_eq!(button.last_change(), 0);
    }

    #[test]
    fn new_disagreement_restarts_window() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(20));
        button.begin().unwrap();

        pin.set_high(false);
        read_at(&mut button, &clock, 0);
        pin.set_high(true);
        read_at(&mut button, &clock, 15);
        pin.set_high(false);
        read_at(&mut button, &clock, 18);
        // 20ms after the first disagreement, but only 2ms into the new one.
        assert!(!read_at(&mut button, &clock, 20));
        assert!(!read_at(&mut button, &clock, 37));
        assert!(read_at(&mut button, &clock, 38));
        assert_eq!(button.last_change(), 38);
    }

    #[test]
    fn release_is_debounced_too() {
        let pin = MockPin::new(false);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(10));
        button.begin().unwrap();
        assert!(button.is_pressed());

        pin.set_high(true);
        read_at(&mut button, &clock, 100);
        assert!(button.is_pressed());
        read_at(&mut button, &clock, 110);
        assert!(button.was_released());
        assert!(!button.was_pressed());
        assert!(button.is_released());
    }

    #[test]
    fn changed_tracks_consecutive_reads() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(1));
        button.begin().unwrap();

        let levels = [true, false, false, false, true, true, false, false, true];
        let mut previous = button.is_pressed();
        for (i, high) in levels.into_iter().enumerate() {
            pin.set_high(high);
            let state = read_at(&mut button, &clock, i as u32 * 2);
            assert_eq!(button.changed(), state != previous, "poll {i}");
            previous = state;
        }
    }

    #[test]
    fn durations_sample_the_clock_fresh() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(5));
        button.begin().unwrap();

        pin.set_high(false);
        read_at(&mut button, &clock, 0);
        read_at(&mut button, &clock, 5);
        assert!(button.is_pressed());

        assert!(button.pressed_for(0));
        assert!(!button.pressed_for(100));
        clock.set(104);
        assert!(!button.pressed_for(100));
        clock.set(105);
        assert!(button.pressed_for(100));
        assert!(!button.released_for(0));
    }

    #[test]
    fn released_for_counts_from_begin() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(1_000);
        let mut button = Button::new(&pin, &clock, Config::default());
        button.begin().unwrap();

        clock.set(1_499);
        assert!(!button.released_for(500));
        clock.set(1_500);
        assert!(button.released_for(500));
        assert!(!button.pressed_for(0));
    }

    #[test]
    fn confirmation_across_u16_wrap() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(20));
        button.begin().unwrap();

        pin.set_high(false);
        read_at(&mut button, &clock, 65_530);
        assert!(!read_at(&mut button, &clock, 65_545));
        assert!(read_at(&mut button, &clock, 65_550));
        assert_eq!(button.last_change(), 65_550);
    }

    #[test]
    fn confirmation_across_u32_wrap() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(u32::MAX - 30);
        let mut button = Button::new(&pin, &clock, config(20));
        button.begin().unwrap();

        pin.set_high(false);
        read_at(&mut button, &clock, u32::MAX - 9);
        assert!(!read_at(&mut button, &clock, 5));
        assert!(read_at(&mut button, &clock, 10));
        assert_eq!(button.last_change(), 10);

        clock.set(40);
        assert!(button.pressed_for(30));
        assert!(!button.pressed_for(31));
    }

    #[test]
    fn max_window_survives_wrap() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(100_000));
        button.begin().unwrap();
        assert_eq!(button.config().debounce_ms(), 60_000);

        pin.set_high(false);
        read_at(&mut button, &clock, 30_000);
        assert!(!read_at(&mut button, &clock, 89_999));
        assert!(read_at(&mut button, &clock, 90_000));
    }

    #[test]
    fn failed_sample_holds_state() {
        let pin = FailingPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(10));
        button.begin().unwrap();

        pin.set_high(false);
        button.read();
        clock.set(10);
        button.read();
        assert!(button.was_pressed());

        pin.fail_next(2);
        clock.set(20);
        assert_eq!(button.try_read(), Err(Error::Line(ErrorKind::Other)));
        assert!(button.is_pressed());
        assert!(!button.changed());
        assert!(button.read());
        assert!(!button.changed());
        assert_eq!(button.last_change(), 10);
    }

    #[test]
    fn begin_reports_a_failed_seed() {
        let pin = FailingPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(10));

        pin.fail_next(1);
        assert_eq!(button.begin(), Err(Error::Line(ErrorKind::Other)));
        assert!(button.begin().is_ok());
        assert!(button.is_released());
    }

    #[test]
    fn failed_sample_does_not_open_a_window() {
        let pin = FailingPin::new(true);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(10));
        button.begin().unwrap();

        pin.set_high(false);
        pin.fail_next(1);
        let err = button.try_read().unwrap_err();
        assert_eq!(err.into_inner(), ErrorKind::Other);
        assert!(!button.changed());
        assert!(!button.is_debouncing());

        // The next good sample starts the window from scratch.
        assert_eq!(read_with(&mut button, &clock, 5), Ok(false));
        assert!(button.is_debouncing());
        assert_eq!(read_with(&mut button, &clock, 15), Ok(true));
        assert_eq!(button.last_change(), 15);
    }

    #[test]
    fn read_holds_state_through_failures() {
        let pin = FailingPin::new(false);
        let clock = ManualClock::new(0);
        let mut button = Button::new(&pin, &clock, config(10));
        button.begin().unwrap();
        assert!(button.is_pressed());

        pin.set_high(true);
        pin.fail_next(5);
        for t in 0..5 {
            clock.set(t * 10);
            assert!(button.read());
            assert!(!button.changed());
        }
        assert!(button.pressed_for(40));

        clock.set(50);
        assert!(button.read());
        clock.set(60);
        assert!(!button.read());
        assert!(button.was_released());
    }

    fn read_with(
        button: &mut Button<&FailingPin, &ManualClock>,
        clock: &ManualClock,
        t: u32,
    ) -> Result<bool, Error<ErrorKind>> {
        clock.set(t);
        button.try_read()
    }

    #[test]
    fn release_returns_parts() {
        let pin = MockPin::new(true);
        let clock = ManualClock::new(3);
        let button = Button::new(&pin, &clock, Config::default());
        let (line, clk) = button.release();
        assert!(line.is_high());
        assert_eq!(clk.now_ms(), 3);
    }
}
