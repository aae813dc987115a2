//! Hardware seams
//!
//! The core touches the outside world through exactly two traits:
//!
//! - [`InputLine`] - configure a digital input once, then sample its raw level
//! - [`Clock`] - a monotonic millisecond tick that wraps silently
//!
//! Any embedded-hal v1.0 [`InputPin`] can be used as a line through
//! [`HalLine`]. Boards that can switch the pull resistor at runtime implement
//! [`InputLine`] directly.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mini_button::{Button, Config, HalLine};
//!
//! let line = HalLine::new(gpio.pa3.into_pull_up_input());
//! let mut button = Button::new(line, &systick_clock, Config::default());
//! button.begin()?;
//! ```

use embedded_hal::digital::{ErrorType, InputPin};

/// A digital input line a [`Button`](crate::Button) can own.
///
/// The error type comes from embedded-hal so that HAL pin errors flow through
/// unchanged.
pub trait InputLine: ErrorType {
    /// One-time setup of the line, enabling the pull-up resistor if asked.
    ///
    /// Must be idempotent.
    fn configure(&mut self, pull_up: bool) -> Result<(), Self::Error>;

    /// Instantaneous raw level, `true` for high. Not inverted.
    fn read_level(&mut self) -> Result<bool, Self::Error>;
}

/// Monotonic millisecond tick source.
///
/// The counter must wrap silently once it exhausts 32 bits; all duration
/// arithmetic in this crate tolerates the wrap.
pub trait Clock {
    /// Current tick in milliseconds.
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Adapter from an embedded-hal [`InputPin`] to an [`InputLine`].
///
/// embedded-hal pins carry their pull configuration in their type, so
/// [`configure`](InputLine::configure) only records the request; set the pull
/// resistor when creating the pin.
pub struct HalLine<P> {
    /// Wrapped HAL pin
    pin: P,
    /// Pull-up request seen by `configure`, if any
    pull_up: Option<bool>,
}

impl<P: InputPin> HalLine<P> {
    /// Wrap a HAL input pin.
    pub fn new(pin: P) -> Self {
        Self { pin, pull_up: None }
    }

    /// Pull-up setting requested by the last `configure` call.
    pub fn requested_pull_up(&self) -> Option<bool> {
        self.pull_up
    }

    /// Give the pin back.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> ErrorType for HalLine<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputLine for HalLine<P> {
    fn configure(&mut self, pull_up: bool) -> Result<(), Self::Error> {
        if self.pull_up.is_none() {
            log::debug!("HalLine: pull_up={} requested, pin pull is fixed by its type", pull_up);
        }
        self.pull_up = Some(pull_up);
        Ok(())
    }

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}
