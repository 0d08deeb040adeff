//! Alarm output abstraction.
//!
//! Defines the [`Actuator`] trait the monitor drives, and [`PinActuator`], an
//! adapter for any `embedded-hal` digital output pin.

use embedded_hal::digital::OutputPin;

/// Trait for abstracting the alarm output hardware.
///
/// Implement this for whatever switches your siren or strobe (a GPIO driving
/// a relay or MOSFET, an I/O expander, a network relay, ...). `on` is the
/// logical level: `true` means "alarm sounding", regardless of the electrical
/// polarity of the driver circuit.
pub trait Actuator {
    /// Error reported by the output driver.
    type Error: core::fmt::Debug;

    /// Sets the logical output level.
    fn set_output(&mut self, on: bool) -> Result<(), Self::Error>;
}

impl<A: Actuator + ?Sized> Actuator for &mut A {
    type Error = A::Error;

    fn set_output(&mut self, on: bool) -> Result<(), Self::Error> {
        (**self).set_output(on)
    }
}

/// Electrical level that switches the driver circuit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pin high energises the load.
    #[default]
    High,
    /// Pin low energises the load (e.g. many opto-isolated relay boards).
    Low,
}

/// [`Actuator`] over a single `embedded-hal` output pin.
pub struct PinActuator<P: OutputPin> {
    pin: P,
    active: ActiveLevel,
}

impl<P: OutputPin> PinActuator<P> {
    /// Wraps an output pin.
    ///
    /// The pin is not touched here; the monitor forces the output off during
    /// startup.
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    /// Returns the configured active level.
    pub fn active_level(&self) -> ActiveLevel {
        self.active
    }

    /// Releases the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Actuator for PinActuator<P> {
    type Error = P::Error;

    fn set_output(&mut self, on: bool) -> Result<(), Self::Error> {
        let drive_high = match self.active {
            ActiveLevel::High => on,
            ActiveLevel::Low => !on,
        };

        if drive_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
