//! Interactive exit delay.
//!
//! After a scan started by double-clicking the binary, the console window would
//! close before anyone could read the report. [`ExitCountdown`] keeps it open
//! for a few seconds, re-rendering the remaining time once per second, and ends
//! early when a key is pressed.
//!
//! Key detection sits behind the [`KeySignal`] trait so headless runs can skip
//! it entirely and tests can substitute a scripted signal.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::debug;

/// A source of "the user pressed a key" events.
pub trait KeySignal {
    /// Wait up to `timeout` for a keypress. Returns `true` if one arrived.
    fn wait_for_key(&mut self, timeout: Duration) -> bool;
}

/// Reads a line from stdin on a background thread; ENTER counts as the keypress.
///
/// The thread only ever sends one message. If stdin closes, no keypress is
/// reported and the countdown simply runs out.
#[derive(Debug)]
pub struct StdinSignal {
    rx: Receiver<()>,
}

impl StdinSignal {
    /// Start listening on stdin.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut line = String::new();
            if let Ok(n) = std::io::stdin().lock().read_line(&mut line) {
                if n > 0 {
                    let _ = tx.send(());
                }
            }
        });
        Self { rx }
    }
}

impl KeySignal for StdinSignal {
    fn wait_for_key(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                // Reader gave up (EOF); keep the countdown pace.
                thread::sleep(timeout);
                false
            }
        }
    }
}

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEnd {
    /// A key was pressed before the delay ran out.
    KeyPressed,
    /// The full delay elapsed.
    Elapsed,
}

/// Counts down a whole number of seconds, stopping early on a keypress.
#[derive(Debug, Clone)]
pub struct ExitCountdown {
    seconds: u64,
    tick: Duration,
}

impl ExitCountdown {
    /// A countdown of `seconds` one-second ticks.
    pub fn new(seconds: u64) -> Self {
        Self {
            seconds,
            tick: Duration::from_secs(1),
        }
    }

    /// Override the tick length.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Total number of ticks.
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Run the countdown.
    ///
    /// `render` is called with the remaining seconds before each tick, starting
    /// at the full delay and never increasing.
    pub fn run<S, F>(&self, signal: &mut S, mut render: F) -> CountdownEnd
    where
        S: KeySignal + ?Sized,
        F: FnMut(u64),
    {
        for remaining in (1..=self.seconds).rev() {
            render(remaining);
            if signal.wait_for_key(self.tick) {
                debug!(remaining, "countdown interrupted");
                return CountdownEnd::KeyPressed;
            }
        }
        CountdownEnd::Elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reports a keypress on the given tick (0-based), never if `None`.
    struct Scripted {
        press_at: Option<usize>,
        ticks: usize,
    }

    impl KeySignal for Scripted {
        fn wait_for_key(&mut self, _timeout: Duration) -> bool {
            let pressed = self.press_at == Some(self.ticks);
            self.ticks += 1;
            pressed
        }
    }

    #[test]
    fn test_countdown_runs_out() {
        let mut signal = Scripted { press_at: None, ticks: 0 };
        let mut shown = Vec::new();
        let end = ExitCountdown::new(3).run(&mut signal, |s| shown.push(s));

        assert_eq!(end, CountdownEnd::Elapsed);
        assert_eq!(shown, vec![3, 2, 1]);
        assert_eq!(signal.ticks, 3);
    }

    #[test]
    fn test_keypress_ends_early() {
        let mut signal = Scripted { press_at: Some(1), ticks: 0 };
        let mut shown = Vec::new();
        let end = ExitCountdown::new(10).run(&mut signal, |s| shown.push(s));

        assert_eq!(end, CountdownEnd::KeyPressed);
        assert_eq!(shown, vec![10, 9]);
    }

    #[test]
    fn test_zero_delay_does_nothing() {
        let mut signal = Scripted { press_at: Some(0), ticks: 0 };
        let end = ExitCountdown::new(0).run(&mut signal, |_| panic!("nothing to render"));
        assert_eq!(end, CountdownEnd::Elapsed);
        assert_eq!(signal.ticks, 0);
    }

    #[test]
    fn test_channel_signal() {
        let (tx, rx) = mpsc::channel();
        let mut signal = StdinSignal { rx };
        assert!(!signal.wait_for_key(Duration::from_millis(1)));
        tx.send(()).unwrap();
        assert!(signal.wait_for_key(Duration::from_millis(1)));
    }
}
