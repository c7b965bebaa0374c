//! Module: tick
//!
//! Purpose: fan periodic timer pulses out to every recognizer.
//!
//! Architecture:
//! - The timer interrupt hands its pulse to the relay's upstream queue
//!   with a non-blocking `try_send`; an over-full upstream drops the
//!   pulse rather than stall the interrupt.
//! - One relay task per process owns the registry and forwards each pulse
//!   to every registered recognizer's private queue. Fan-out may block:
//!   tick production is slow and fixed-rate relative to recognition.
//! - The registry is append-only and sealed before steady state:
//!   `register` needs `&mut self`, `run` consumes the relay.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::info;

use crate::error::RegistryError;
use crate::press::TickPulse;

/// Depth of each tick queue. One slot is enough: a pulse is a pure
/// signal, and the relay catches up on the next period if a consumer
/// briefly lags.
pub const TICK_QUEUE_DEPTH: usize = 1;

/// Most recognizers one relay will fan out to.
pub const MAX_RECOGNIZERS: usize = 4;

/// A recognizer's private tick delivery queue.
pub type TickQueue = Channel<CriticalSectionRawMutex, TickPulse, TICK_QUEUE_DEPTH>;

/// Fans the upstream timer pulse out to every registered recognizer.
///
/// # Usage
///
/// ```ignore
/// static UPSTREAM: TickQueue = TickQueue::new();
/// static BUTTON_TICKS: TickQueue = TickQueue::new();
///
/// let mut relay = TickRelay::new();
/// relay.register(&BUTTON_TICKS)?;
///
/// // In the timer interrupt:
/// let _ = UPSTREAM.try_send(TickPulse);
///
/// // As a long-lived task, once per process:
/// relay.run(&UPSTREAM).await
/// ```
pub struct TickRelay {
    outlets: Vec<&'static TickQueue, MAX_RECOGNIZERS>,
}

impl TickRelay {
    /// Create a relay with an empty registry.
    pub const fn new() -> Self {
        Self { outlets: Vec::new() }
    }

    /// Register one recognizer's tick queue.
    ///
    /// Append-only; must complete before [`run`](Self::run) starts.
    pub fn register(&mut self, queue: &'static TickQueue) -> Result<(), RegistryError> {
        self.outlets.push(queue).map_err(|_| RegistryError::Full)
    }

    /// Number of registered tick queues.
    pub fn registered(&self) -> usize {
        self.outlets.len()
    }

    /// Forward one pulse to every registered queue, in registration order.
    pub async fn fan_out(&self, pulse: TickPulse) {
        for outlet in &self.outlets {
            outlet.send(pulse).await;
        }
    }

    /// Relay pulses from `upstream` forever.
    ///
    /// Consuming `self` seals the registry: no queue can be added once
    /// steady-state fan-out has begun.
    pub async fn run(self, upstream: &'static TickQueue) -> ! {
        info!("tick relay running, {} outlet(s)", self.outlets.len());
        loop {
            let pulse = upstream.receive().await;
            self.fan_out(pulse).await;
        }
    }
}

impl Default for TickRelay {
    fn default() -> Self {
        Self::new()
    }
}
