//! Command source: turns operator input into LED commands.
//!
//! A [`TriggerInput`] is the raw input device: it reports which of the two
//! triggers ("assert ON", "assert OFF") is currently asserted. A
//! [`CommandSource`] samples it and decides whether a [`Command`] should be
//! sent. Each device session owns its own source; the input behind it may
//! be shared by the whole process (see [`OperatorPanel`]).

pub mod operator;
pub mod rate_limit;

use std::sync::Arc;

use crate::domain::Command;

pub use operator::{
    DEFAULT_PRESS_WINDOW, OperatorPanel, parse_operator_line, run_operator_console,
    spawn_stdin_console,
};
pub use rate_limit::RateLimitedCommandSource;

/// Snapshot of the two operator triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerState {
    /// "Assert ON" is active.
    pub on: bool,
    /// "Assert OFF" is active.
    pub off: bool,
}

impl TriggerState {
    /// The command this snapshot asks for. ON wins when both are asserted.
    #[must_use]
    pub const fn command(self) -> Option<Command> {
        if self.on {
            Some(Command::On)
        } else if self.off {
            Some(Command::Off)
        } else {
            None
        }
    }
}

/// Raw operator input device.
pub trait TriggerInput: std::fmt::Debug + Send + Sync + 'static {
    /// Samples the triggers. May consume momentary presses.
    fn sample(&self) -> TriggerState;
}

impl<T: TriggerInput + ?Sized> TriggerInput for Arc<T> {
    fn sample(&self) -> TriggerState {
        (**self).sample()
    }
}

/// Produces the command, if any, to send on this tick.
pub trait CommandSource: Send {
    /// Samples the input once. Returns `None` when nothing should be sent.
    fn poll(&mut self) -> Option<Command>;
}
