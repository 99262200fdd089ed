//! Cooldown-limited command source.

use std::time::Duration;

use tokio::time::Instant;

use super::{CommandSource, TriggerInput};
use crate::domain::Command;

/// [`CommandSource`] that suppresses identical commands for a cooldown
/// window after each emission.
///
/// A held trigger therefore produces one command per cooldown window rather
/// than one per sample. A different command is emitted immediately.
#[derive(Debug)]
pub struct RateLimitedCommandSource<I> {
    input: I,
    cooldown: Duration,
    last: Option<(Command, Instant)>,
}

impl<I: TriggerInput> RateLimitedCommandSource<I> {
    /// Wraps `input` with the given cooldown.
    #[must_use]
    pub const fn new(input: I, cooldown: Duration) -> Self {
        Self {
            input,
            cooldown,
            last: None,
        }
    }

    /// Samples the input as if the current time were `now`.
    pub fn poll_at(&mut self, now: Instant) -> Option<Command> {
        let command = self.input.sample().command()?;
        if let Some((previous, emitted_at)) = self.last
            && previous == command
            && now.saturating_duration_since(emitted_at) < self.cooldown
        {
            return None;
        }
        self.last = Some((command, now));
        Some(command)
    }
}

impl<I: TriggerInput> CommandSource for RateLimitedCommandSource<I> {
    fn poll(&mut self) -> Option<Command> {
        self.poll_at(Instant::now())
    }
}
