//! Actuator command sent to the probe.

use std::fmt;

/// Desired state of the probe's LED.
///
/// Transient: a command exists only as the payload of one outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Switch the LED on (`{"led": 1}`).
    On,
    /// Switch the LED off (`{"led": 0}`).
    Off,
}

impl Command {
    /// Wire value of the `led` field.
    #[must_use]
    pub const fn led_value(self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 0,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("LED ON"),
            Self::Off => f.write_str("LED OFF"),
        }
    }
}
