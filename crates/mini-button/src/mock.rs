//! Test doubles for lines and clocks
//!
//! Both doubles use interior mutability so a test can keep a shared reference
//! while a button owns `&MockPin` / `&ManualClock`.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::digital::{ErrorKind, ErrorType};

use crate::hal::{Clock, InputLine};

/// Input line whose level is set by the test.
#[derive(Debug, Default)]
pub struct MockPin {
    high: Cell<bool>,
    pull_up: Cell<Option<bool>>,
    configure_calls: Cell<u32>,
    reads: Cell<u32>,
}

impl MockPin {
    /// A line currently at the given level.
    pub fn new(high: bool) -> Self {
        Self {
            high: Cell::new(high),
            ..Self::default()
        }
    }

    /// Drive the raw level.
    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    /// Current raw level.
    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    /// Pull-up setting from the last `configure`, `None` if never configured.
    pub fn pull_up(&self) -> Option<bool> {
        self.pull_up.get()
    }

    /// How many times `configure` was called.
    pub fn configure_calls(&self) -> u32 {
        self.configure_calls.get()
    }

    /// How many times the level was sampled.
    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl ErrorType for &MockPin {
    type Error = Infallible;
}

impl InputLine for &MockPin {
    fn configure(&mut self, pull_up: bool) -> Result<(), Self::Error> {
        self.pull_up.set(Some(pull_up));
        self.configure_calls.set(self.configure_calls.get() + 1);
        Ok(())
    }

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.high.get())
    }
}

/// Line that can be told to fail its next samples.
#[derive(Debug, Default)]
pub struct FailingPin {
    pin: MockPin,
    failures: Cell<u32>,
}

impl FailingPin {
    /// A healthy line at the given level.
    pub fn new(high: bool) -> Self {
        Self {
            pin: MockPin::new(high),
            failures: Cell::new(0),
        }
    }

    /// Make the next `count` samples fail.
    pub fn fail_next(&self, count: u32) {
        self.failures.set(count);
    }

    /// Drive the raw level.
    pub fn set_high(&self, high: bool) {
        self.pin.set_high(high);
    }
}

impl ErrorType for &FailingPin {
    type Error = ErrorKind;
}

impl InputLine for &FailingPin {
    fn configure(&mut self, pull_up: bool) -> Result<(), Self::Error> {
        let mut pin = &self.pin;
        pin.configure(pull_up).map_err(|e| match e {})
    }

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        let failures = self.failures.get();
        if failures > 0 {
            self.failures.set(failures - 1);
            return Err(ErrorKind::Other);
        }
        let mut pin = &self.pin;
        pin.read_level().map_err(|e| match e {})
    }
}

/// Clock that only moves when the test says so.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    /// A clock reading `start_ms`.
    pub fn new(start_ms: u32) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Jump to an absolute tick.
    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    /// Move forward, wrapping like a hardware counter.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
