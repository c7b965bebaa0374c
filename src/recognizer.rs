//! Per-button recognition component.
//!
//! Owns the assembled pipeline for one physical button: the edge queue
//! fed from interrupt context, the private tick queue fed by the relay,
//! the press state machine, the threshold store handle, and the
//! publisher. The recognition loop is the single consumer of both queues,
//! so machine state needs no locking; it suspends while both queues are
//! empty and never mid-transition.
//!
//! There is no cancellation and no timeout: a stuck-down button produces
//! nothing until an up-edge eventually arrives.

use core::fmt;

use embassy_futures::select::{select, Either};
use embassy_time::Instant;
use log::debug;

use crate::config::ThresholdStore;
use crate::edge::{EdgeQueue, EdgeSource, EDGE_QUEUE_DEPTH};
use crate::error::ConstructionError;
use crate::machine::PressMachine;
use crate::press::{EdgeEvent, Level};
use crate::publish::{DeliveryPolicy, PressSink, Publisher};
use crate::tick::TickQueue;

/// Recognizes presses on one physical button.
///
/// One instance models exactly one button. `P` is the pin layer's edge
/// source; its error type surfaces unmodified from [`attach`](Self::attach).
///
/// # Usage
///
/// ```ignore
/// static EDGES: EdgeQueue = EdgeQueue::new();
/// static TICKS: TickQueue = TickQueue::new();
/// static THRESHOLDS: ThresholdStore = ThresholdStore::new();
/// static PRESSES: Channel<CriticalSectionRawMutex, PressLength, 4> = Channel::new();
///
/// tick_relay.register(&TICKS)?;
/// let mut button = Recognizer::new(
///     "user",
///     pin,
///     &EDGES,
///     &TICKS,
///     &THRESHOLDS,
///     DeliveryPolicy::Guaranteed,
///     &[PRESSES.dyn_sender()],
/// )?;
/// button.attach()?;
///
/// // As a long-lived task, one per button:
/// button.run().await
/// ```
pub struct Recognizer<P, const N: usize = EDGE_QUEUE_DEPTH>
where
    P: EdgeSource<N>,
{
    name: &'static str,
    pin: P,
    edges: &'static EdgeQueue<N>,
    ticks: &'static TickQueue,
    thresholds: &'static ThresholdStore,
    publisher: Publisher,
    machine: PressMachine,
}

impl<P, const N: usize> Recognizer<P, N>
where
    P: EdgeSource<N>,
{
    /// Build a recognizer over its queues, thresholds, and sinks.
    ///
    /// Fails with [`ConstructionError::NoOutputSinks`] when no sink is
    /// supplied: a recognizer with nobody to notify is a wiring mistake.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'static str,
        pin: P,
        edges: &'static EdgeQueue<N>,
        ticks: &'static TickQueue,
        thresholds: &'static ThresholdStore,
        policy: DeliveryPolicy,
        sinks: &[PressSink],
    ) -> Result<Self, ConstructionError> {
        let publisher = Publisher::new(policy, sinks)?;
        Ok(Self {
            name,
            pin,
            edges,
            ticks,
            thresholds,
            publisher,
            machine: PressMachine::new(),
        })
    }

    /// Wire the pin's edge interrupt into this recognizer's queue.
    ///
    /// Errors from the pin layer pass through unmodified.
    pub fn attach(&mut self) -> Result<(), P::Error> {
        self.pin.attach(self.edges.relay())
    }

    /// On-demand read of the button line's current level.
    pub fn level(&self) -> Level {
        self.pin.level()
    }

    /// Instance name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check if no press is in flight.
    pub fn is_idle(&self) -> bool {
        self.machine.is_idle()
    }

    /// Edges dropped at the interrupt boundary since start.
    pub fn dropped_edges(&self) -> u32 {
        self.edges.dropped()
    }

    /// Presses dropped by best-effort publishing since start.
    pub fn dropped_presses(&self) -> u32 {
        self.publisher.dropped()
    }

    /// Process exactly one event: the next edge or the next tick.
    ///
    /// Suspends while both queues are empty. Publication of a completed
    /// press happens before the next event is taken, so subscribers see
    /// presses in chronological order.
    pub async fn step(&mut self) {
        match select(self.edges.receive(), self.ticks.receive()).await {
            Either::First(edge) => self.handle_edge(edge).await,
            Either::Second(_pulse) => self.machine.on_tick(),
        }
    }

    /// Run the recognition loop forever. One long-lived task per button.
    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    async fn handle_edge(&mut self, edge: EdgeEvent) {
        // Capture time when the hardware latched one, processing time
        // otherwise.
        let at = edge.at.unwrap_or_else(Instant::now);
        if let Some(held) = self.machine.on_edge(edge.level, at) {
            let length = self.thresholds.snapshot().classify(held);
            debug!(
                "{}: {:?} press ({} ms)",
                self.name,
                length,
                held.as_millis()
            );
            self.publisher.publish(length).await;
        }
    }
}

/// Diagnostic dump of the instance name and current thresholds. Not part
/// of the recognition contract.
impl<P, const N: usize> fmt::Display for Recognizer<P, N>
where
    P: EdgeSource<N>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.thresholds.snapshot();
        write!(
            f,
            "{}: debounce={}ms short={}ms long={}ms extra_long={}ms",
            self.name,
            t.debounce_interval.as_millis(),
            t.short_press.as_millis(),
            t.long_press.as_millis(),
            t.extra_long_press.as_millis(),
        )
    }
}
