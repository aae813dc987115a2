//! Debounced push-buttons for polled firmware.
//!
//! A [`Button`] turns the bouncing level of a digital input line into a clean
//! pressed/released state. Three behaviors are layered on top of it:
//!
//! - [`ToggleButton`] - push-on, push-off latch
//! - [`RepeatButton`] - key-repeat stream synthesized from a held press
//! - [`LongPress`] - becomes pressed once anything implementing [`PressedFor`]
//!   has been held past a threshold
//!
//! Everything is poll-driven: call `read()` on every component once per loop
//! iteration, base buttons before the components that depend on them.
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "mock")] {
//! use mini_button::mock::{ManualClock, MockPin};
//! use mini_button::{Button, Config};
//!
//! let pin = MockPin::new(true); // pulled up, released
//! let clock = ManualClock::new(0);
//! let mut button = Button::new(&pin, &clock, Config::builder().debounce_ms(20).build());
//! button.begin().unwrap();
//!
//! pin.set_high(false); // contact closes
//! for _ in 0..=4 {
//!     button.read();
//!     clock.advance(5);
//! }
//! assert!(button.is_pressed());
//! assert_eq!(button.last_change(), 20);
//! # }
//! ```

#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

pub mod button;
pub mod config;
pub mod error;
pub mod hal;
pub mod long_press;
pub mod repeat;
pub mod toggle;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use button::Button;
pub use config::{Builder, Config, RepeatConfig};
pub use error::Error;
pub use hal::{Clock, HalLine, InputLine};
pub use long_press::LongPress;
pub use repeat::RepeatButton;
pub use toggle::ToggleButton;

/// Something that can report how long it has been held.
///
/// This is the only thing a [`LongPress`] needs from the object it watches, so
/// observers can sit on top of plain buttons, toggles, repeat buttons or other
/// observers.
pub trait PressedFor {
    /// True if currently pressed and unchanged for at least `ms` milliseconds.
    fn pressed_for(&self, ms: u32) -> bool;
}

impl<T: PressedFor + ?Sized> PressedFor for &T {
    fn pressed_for(&self, ms: u32) -> bool {
        (**self).pressed_for(ms)
    }
}

/// Milliseconds from `since` to `now` on a wrapping 32-bit clock.
#[inline]
pub(crate) fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
