//! Commands emitted by the alarm controller for the actuator.

/// A change of actuator output.
///
/// The controller returns `Option<ActuatorCommand>`; `None` means "leave the
/// output as it is".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorCommand {
    /// Energise the siren/strobe.
    On,
    /// De-energise the siren/strobe.
    Off,
}

impl ActuatorCommand {
    /// Logical output level this command asks for.
    #[inline]
    pub fn level(self) -> bool {
        matches!(self, ActuatorCommand::On)
    }
}
