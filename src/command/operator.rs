//! Operator panel and console.
//!
//! [`OperatorPanel`] is the process-wide trigger input. Triggers can be
//! held (asserted until released) or pressed (asserted for one sample taken
//! within the press window). [`run_operator_console`] feeds presses from
//! line-oriented input; [`spawn_stdin_console`] runs it over stdin on a
//! dedicated thread so a pending read never holds up runtime shutdown.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tokio::time::Instant;

use super::{TriggerInput, TriggerState};
use crate::domain::Command;

/// How long an unsampled press stays asserted by default.
pub const DEFAULT_PRESS_WINDOW: Duration = Duration::from_millis(250);

#[derive(Debug, Default)]
struct TriggerLine {
    held: AtomicBool,
    pressed_at: Mutex<Option<Instant>>,
}

impl TriggerLine {
    fn press(&self, now: Instant) {
        *self.pressed_at.lock().unwrap_or_else(PoisonError::into_inner) = Some(now);
    }

    fn sample(&self, now: Instant, window: Duration) -> bool {
        let pressed_at = self
            .pressed_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let pressed = pressed_at.is_some_and(|at| now.saturating_duration_since(at) <= window);
        self.held.load(Ordering::Acquire) || pressed
    }
}

/// Shared operator input with one line per trigger.
///
/// A press is consumed by the first sample that observes it, so with several
/// live sessions only one of them acts on it. A press nobody samples within
/// the press window is dropped, so a device connecting later never sees it.
#[derive(Debug)]
pub struct OperatorPanel {
    on: TriggerLine,
    off: TriggerLine,
    press_window: Duration,
}

impl Default for OperatorPanel {
    fn default() -> Self {
        Self::with_press_window(DEFAULT_PRESS_WINDOW)
    }
}

impl OperatorPanel {
    /// Creates a panel with nothing asserted and the default press window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a panel whose presses expire after `press_window`.
    #[must_use]
    pub fn with_press_window(press_window: Duration) -> Self {
        Self {
            on: TriggerLine::default(),
            off: TriggerLine::default(),
            press_window,
        }
    }

    fn line(&self, command: Command) -> &TriggerLine {
        match command {
            Command::On => &self.on,
            Command::Off => &self.off,
        }
    }

    /// Asserts the trigger for `command` until the next sample or the end of
    /// the press window, whichever comes first.
    pub fn press(&self, command: Command) {
        self.line(command).press(Instant::now());
    }

    /// Asserts the trigger for `command` until [`release`](Self::release).
    pub fn hold(&self, command: Command) {
        self.line(command).held.store(true, Ordering::Release);
    }

    /// Releases a held trigger.
    pub fn release(&self, command: Command) {
        self.line(command).held.store(false, Ordering::Release);
    }

    /// Samples both triggers as of `now`.
    pub fn sample_at(&self, now: Instant) -> TriggerState {
        // Both lines are sampled so a press on the losing line is consumed too.
        let on = self.on.sample(now, self.press_window);
        let off = self.off.sample(now, self.press_window);
        TriggerState { on, off }
    }
}

impl TriggerInput for OperatorPanel {
    fn sample(&self) -> TriggerState {
        self.sample_at(Instant::now())
    }
}

/// Interprets one console line: `1`/`on` or `0`/`off`, case-insensitive.
#[must_use]
pub fn parse_operator_line(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "on" => Some(Command::On),
        "0" | "off" => Some(Command::Off),
        _ => None,
    }
}

/// Reads operator lines until end of input, pressing the matching trigger
/// for each recognised line.
pub fn run_operator_console<R: BufRead>(reader: R, panel: &OperatorPanel) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "operator console read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_operator_line(&line) {
            Some(command) => {
                tracing::info!(%command, "operator command queued");
                panel.press(command);
            }
            None => tracing::warn!(input = %line.trim(), "unrecognised operator input"),
        }
    }
    tracing::info!("operator console closed");
}

/// Starts the operator console on stdin in a background thread.
///
/// # Errors
///
/// Returns an I/O error if the thread cannot be spawned.
pub fn spawn_stdin_console(panel: Arc<OperatorPanel>) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("operator-console".to_string())
        .spawn(move || {
            tracing::info!("operator console ready: type 1 (LED on) or 0 (LED off)");
            run_operator_console(std::io::stdin().lock(), &panel);
        })
}
