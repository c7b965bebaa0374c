//! Press recognition finite state machine.
//!
//! Pure logic, no queues, no clock reads. Consumes edge levels and tick
//! pulses, produces the held duration of each completed press. Fully
//! testable on host.
//!
//! # Debounce confirmation
//!
//! The machine trusts an up-edge only after it has seen at least two tick
//! pulses since the down-edge. With the tick period at roughly half the
//! debounce interval, two pulses guarantee the interval has elapsed, so a
//! bounce's premature up-edge is ignored and a later stable up-edge closes
//! the press. No clock is read on the interrupt path to decide this.

use embassy_time::{Duration, Instant};

use crate::press::Level;

/// Tick pulses that must elapse after a down-edge before an up-edge is
/// trusted as a genuine release.
pub const DEBOUNCE_CONFIRM_TICKS: u32 = 2;

/// FSM state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// No press in flight. Tick count is zero.
    Idle,
    /// Down-edge seen, counting ticks, waiting for a stable up-edge.
    AwaitingUp,
}

/// Per-button press recognition state machine.
///
/// Owned and mutated by exactly one recognition loop; edge and tick events
/// for one button are serialized through that single consumer, so the
/// machine needs no interior synchronization.
///
/// # Example
///
/// ```ignore
/// let mut machine = PressMachine::new();
///
/// machine.on_edge(Level::Down, Instant::from_millis(0));
/// machine.on_tick();
/// machine.on_tick();
///
/// let held = machine.on_edge(Level::Up, Instant::from_millis(30));
/// assert_eq!(held, Some(Duration::from_millis(30)));
/// ```
pub struct PressMachine {
    state: State,
    tick_count: u32,
    down_since: Option<Instant>,
}

impl PressMachine {
    /// Create a machine in the idle state.
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            tick_count: 0,
            down_since: None,
        }
    }

    /// Feed one edge transition.
    ///
    /// `at` is the edge's capture timestamp if the hardware latched one,
    /// otherwise the time of processing. Returns the held duration when
    /// the edge completes a press, `None` for every other transition.
    pub fn on_edge(&mut self, level: Level, at: Instant) -> Option<Duration> {
        match (self.state, level) {
            (State::Idle, Level::Down) => {
                self.down_since = Some(at);
                self.tick_count = 1;
                self.state = State::AwaitingUp;
                None
            }
            // Repeated down-edge inside a press: bounce, already counted.
            (State::AwaitingUp, Level::Down) => None,
            // Up-edge with no matching down: ignore.
            (State::Idle, Level::Up) => None,
            (State::AwaitingUp, Level::Up) => {
                if self.tick_count < DEBOUNCE_CONFIRM_TICKS {
                    // Not yet debounced; a later stable up-edge will close
                    // the press.
                    return None;
                }
                let held = match self.down_since {
                    Some(down) => {
                        Duration::from_ticks(at.as_ticks().saturating_sub(down.as_ticks()))
                    }
                    // Unreachable while the single-consumer invariant
                    // holds; fold into the debounce band.
                    None => Duration::from_ticks(0),
                };
                self.reset();
                Some(held)
            }
        }
    }

    /// Feed one tick pulse.
    pub fn on_tick(&mut self) {
        match self.state {
            // Clear any stale start; occasionally left behind when a
            // sequence is abandoned.
            State::Idle => self.down_since = None,
            State::AwaitingUp => self.tick_count = self.tick_count.saturating_add(1),
        }
    }

    /// Return to idle, discarding any press in flight.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.tick_count = 0;
        self.down_since = None;
    }

    /// Check if no press is in flight.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Ticks observed since the current press started; zero when idle.
    #[inline]
    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }
}

impl Default for PressMachine {
    fn default() -> Self {
        Self::new()
    }
}
