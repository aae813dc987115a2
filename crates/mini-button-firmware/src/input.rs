use core::fmt;

use embedded_hal::digital::{ErrorKind, ErrorType};
use esp_idf_svc::hal::gpio::{Input, InputPin, OutputPin, PinDriver, Pull};
use esp_idf_svc::sys::{self, EspError};
use mini_button::{Clock, InputLine};

/// GPIO configuration failure reported by ESP-IDF.
#[derive(Debug)]
pub struct LineError(EspError);

impl LineError {
    pub fn into_esp(self) -> EspError {
        self.0
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gpio: {}", self.0)
    }
}

impl embedded_hal::digital::Error for LineError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A GPIO whose pull resistor is chosen by the button config.
pub struct EspLine<'d, T: InputPin + OutputPin> {
    pin: PinDriver<'d, T, Input>,
}

impl<'d, T: InputPin + OutputPin> EspLine<'d, T> {
    pub fn new(pin: PinDriver<'d, T, Input>) -> Self {
        Self { pin }
    }
}

impl<T: InputPin + OutputPin> ErrorType for EspLine<'_, T> {
    type Error = LineError;
}

impl<T: InputPin + OutputPin> InputLine for EspLine<'_, T> {
    fn configure(&mut self, pull_up: bool) -> Result<(), Self::Error> {
        let pull = if pull_up { Pull::Up } else { Pull::Floating };
        self.pin.set_pull(pull).map_err(LineError)
    }

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_high())
    }
}

/// Milliseconds since boot from the high resolution timer, wrapping at 32 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct EspClock;

impl Clock for EspClock {
    fn now_ms(&self) -> u32 {
        let micros = unsafe { sys::esp_timer_get_time() };
        (micros / 1000) as u32
    }
}
