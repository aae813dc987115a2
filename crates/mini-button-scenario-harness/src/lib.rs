//! Host-side scenario test harness for scripted button timelines.
//!
//! The harness owns one simulated input line and one clock, both shared with
//! the device under test through `Rc` handles, and polls the device on a fixed
//! cadence while the script drives the line.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::ErrorType;
use mini_button::{
    Button, Clock, Config, InputLine, LongPress, PressedFor, RepeatButton, RepeatConfig,
    ToggleButton,
};

/// Simulated input line; clones drive the same level.
#[derive(Clone, Debug, Default)]
pub struct SharedLine {
    high: Rc<Cell<bool>>,
    pull_up: Rc<Cell<Option<bool>>>,
}

impl SharedLine {
    /// Drive the raw level.
    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    /// Pull-up setting requested by the device, if it configured the line.
    pub fn pull_up(&self) -> Option<bool> {
        self.pull_up.get()
    }
}

impl ErrorType for SharedLine {
    type Error = Infallible;
}

impl InputLine for SharedLine {
    fn configure(&mut self, pull_up: bool) -> Result<(), Self::Error> {
        self.pull_up.set(Some(pull_up));
        Ok(())
    }

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }
}

/// Simulated millisecond clock; clones read the same tick.
#[derive(Clone, Debug, Default)]
pub struct SharedClock(Rc<Cell<u32>>);

impl SharedClock {
    /// Jump to an absolute tick.
    pub fn set(&self, ms: u32) {
        self.0.set(ms);
    }
}

impl Clock for SharedClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

/// Something the harness can poll.
pub trait Device {
    /// One-time setup before the first poll.
    fn begin(&mut self);
    /// One poll; returns the reported state.
    fn poll(&mut self) -> bool;
    /// The last poll changed the reported state.
    fn changed(&self) -> bool;
}

pub type SimButton = Button<SharedLine, SharedClock>;
pub type SimToggle = ToggleButton<SharedLine, SharedClock>;
pub type SimRepeat = RepeatButton<SharedLine, SharedClock>;

impl Device for SimButton {
    fn begin(&mut self) {
        Button::begin(self).expect("simulated line is infallible");
    }

    fn poll(&mut self) -> bool {
        self.read()
    }

    fn changed(&self) -> bool {
        Button::changed(self)
    }
}

impl Device for SimToggle {
    fn begin(&mut self) {
        ToggleButton::begin(self).expect("simulated line is infallible");
    }

    fn poll(&mut self) -> bool {
        self.read()
    }

    fn changed(&self) -> bool {
        ToggleButton::changed(self)
    }
}

impl Device for SimRepeat {
    fn begin(&mut self) {
        RepeatButton::begin(self).expect("simulated line is infallible");
    }

    fn poll(&mut self) -> bool {
        self.read()
    }

    fn changed(&self) -> bool {
        RepeatButton::changed(self)
    }
}

/// A device plus a long-press observer watching it.
///
/// Polls report the observer's state; the watched device stays reachable
/// through [`Watched::device`].
pub struct Watched<D> {
    device: D,
    long_press: LongPress<SharedClock>,
}

impl<D> Watched<D> {
    /// The watched device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The observer.
    pub fn long_press(&self) -> &LongPress<SharedClock> {
        &self.long_press
    }
}

impl<D: Device + PressedFor> Device for Watched<D> {
    fn begin(&mut self) {
        self.device.begin();
        self.long_press.begin();
    }

    fn poll(&mut self) -> bool {
        self.device.poll();
        self.long_press.read(&self.device)
    }

    fn changed(&self) -> bool {
        self.long_press.changed()
    }
}

/// One poll result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Tick of the poll
    pub at: u32,
    /// Reported state
    pub state: bool,
    /// The poll changed the state
    pub changed: bool,
}

/// Couples a device with its simulated line and clock.
///
/// The line is wired active-low (pulled up, contact to ground), matching the
/// default [`Config`].
pub struct ScenarioHarness<D> {
    line: SharedLine,
    clock: SharedClock,
    device: D,
    samples: Vec<Sample>,
}

impl<D: Device> ScenarioHarness<D> {
    /// Build a device on a released line at `start_ms` and call its `begin()`.
    pub fn new(start_ms: u32, build: impl FnOnce(SharedLine, SharedClock) -> D) -> Self {
        let line = SharedLine::default();
        line.set_high(true);
        let clock = SharedClock::default();
        clock.set(start_ms);

        let mut device = build(line.clone(), clock.clone());
        device.begin();

        Self {
            line,
            clock,
            device,
            samples: Vec::new(),
        }
    }

    /// Close (`true`) or open the contact.
    pub fn set_pressed(&mut self, pressed: bool) {
        self.line.set_high(!pressed);
    }

    /// Current tick.
    pub fn now(&self) -> u32 {
        self.clock.now_ms()
    }

    /// Move the clock to `t` and poll once.
    pub fn poll_at(&mut self, t: u32) -> Sample {
        self.clock.set(t);
        let state = self.device.poll();
        let sample = Sample {
            at: t,
            state,
            changed: self.device.changed(),
        };
        self.samples.push(sample);
        sample
    }

    /// Poll every `step` ms for `duration` ms starting now, then leave the
    /// clock at the end of the span. Returns the samples taken.
    pub fn run_for(&mut self, duration: u32, step: u32) -> &[Sample] {
        assert!(step > 0, "step must be positive");
        let start = self.now();
        let first = self.samples.len();
        let mut offset = Some(0u32);
        while let Some(o) = offset.filter(|&o| o < duration) {
            self.poll_at(start.wrapping_add(o));
            offset = o.checked_add(step);
        }
        self.clock.set(start.wrapping_add(duration));
        &self.samples[first..]
    }

    /// Set the contact, then [`run_for`](Self::run_for).
    pub fn hold(&mut self, pressed: bool, duration: u32, step: u32) -> &[Sample] {
        self.set_pressed(pressed);
        self.run_for(duration, step)
    }

    /// Play `(pressed, duration)` segments back to back.
    pub fn script(&mut self, segments: &[(bool, u32)], step: u32) -> &[Sample] {
        let first = self.samples.len();
        for &(pressed, duration) in segments {
            self.hold(pressed, duration, step);
        }
        &self.samples[first..]
    }

    /// Every sample so far.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Samples whose poll changed the state.
    pub fn changes(&self) -> Vec<Sample> {
        self.samples.iter().copied().filter(|s| s.changed).collect()
    }

    /// Forget recorded samples.
    pub fn clear_samples(&mut self) {
        self.samples.clear();
    }

    /// The device under test.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The simulated line.
    pub fn line(&self) -> &SharedLine {
        &self.line
    }
}

/// A debounced button with the given window.
pub fn button(debounce_ms: u32) -> impl FnOnce(SharedLine, SharedClock) -> SimButton {
    move |line, clock| Button::new(line, clock, Config::builder().debounce_ms(debounce_ms).build())
}

/// A toggle with the given window and initial state.
pub fn toggle(debounce_ms: u32, initial: bool) -> impl FnOnce(SharedLine, SharedClock) -> SimToggle {
    move |line, clock| {
        ToggleButton::new(
            line,
            clock,
            Config::builder().debounce_ms(debounce_ms).build(),
            initial,
        )
    }
}

/// A repeating button with the given window and repeat timing.
pub fn repeat(
    debounce_ms: u32,
    delay_ms: u32,
    rate_ms: u32,
) -> impl FnOnce(SharedLine, SharedClock) -> SimRepeat {
    move |line, clock| {
        RepeatButton::new(
            line,
            clock,
            Config::builder().debounce_ms(debounce_ms).build(),
            RepeatConfig::new(delay_ms, rate_ms),
        )
    }
}

/// Put a long-press observer on top of another device.
pub fn watched<D>(
    inner: impl FnOnce(SharedLine, SharedClock) -> D,
    threshold_ms: u32,
) -> impl FnOnce(SharedLine, SharedClock) -> Watched<D> {
    move |line, clock| Watched {
        device: inner(line, clock.clone()),
        long_press: LongPress::new(clock, threshold_ms),
    }
}
