//! Lock-free SPSC edge queue and the interrupt-side relay.
//!
//! This is the hand-off between the edge interrupt and the recognition
//! loop. The producer side runs in interrupt context and must not block,
//! allocate, or take unbounded time; the consumer side is one recognition
//! loop that suspends until an event arrives.
//!
//! ```text
//! edge ISR ──▶ EdgeRelay::push ──▶ EdgeQueue ──▶ Recognizer
//!              (atomics only)      (bounded)     (single consumer)
//! ```
//!
//! # Rules
//!
//! - The producer performs exactly one non-blocking enqueue attempt per
//!   edge; on a full queue the event is dropped and counted. Losing edges
//!   under a pathological bounce storm is intentional; stalling the
//!   interrupt is not.
//! - The queue data path uses only atomic operations. The consumer
//!   wake-up after a successful enqueue enters a bounded critical section
//!   (waker swap), never a blocking lock.
//! - No logging from the producer side; it runs in interrupt context. The
//!   dropped counter is the diagnostic.

use core::cell::UnsafeCell;
use core::future::poll_fn;
use core::sync::atomic::{AtomicU32, Ordering};
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;

use crate::press::{EdgeEvent, Level};

/// Default queue depth: absorbs a bounce burst between recognizer
/// wake-ups. Must be a power of two for index masking.
pub const EDGE_QUEUE_DEPTH: usize = 4;

/// Bounded lock-free SPSC queue for edge events.
///
/// # Safety
///
/// This type uses `UnsafeCell` internally but is safe to use because:
/// - Single producer (the pin's interrupt relay), single consumer (the
///   owning recognizer), enforced by design, not by the type system
/// - A slot is written only before the `Release` store of `write_idx`
///   that publishes it, and read only after the matching `Acquire` load
/// - Indices are monotonically increasing `u32`s, wrapped via mask
///
/// # Memory Ordering
///
/// - Producer: `Acquire` load of `read_idx` (observe freed slots),
///   `Release` store of `write_idx` (publish the written slot)
/// - Consumer: `Acquire` load of `write_idx` (observe published slots),
///   `Release` store of `read_idx` (free the slot for reuse)
pub struct EdgeQueue<const N: usize = EDGE_QUEUE_DEPTH> {
    /// Ring of event slots.
    slots: UnsafeCell<[EdgeEvent; N]>,

    /// Next write index (monotonically increasing, wraps via mask).
    write_idx: AtomicU32,

    /// Next read index (monotonically increasing, wraps via mask).
    read_idx: AtomicU32,

    /// Events dropped because the queue was full.
    dropped: AtomicU32,

    /// Wakes the suspended consumer after an enqueue.
    waker: AtomicWaker,
}

// SAFETY: single producer, single consumer, atomic index coordination.
// No mutable aliasing possible while the SPSC discipline holds.
unsafe impl<const N: usize> Sync for EdgeQueue<N> {}
unsafe impl<const N: usize> Send for EdgeQueue<N> {}

impl<const N: usize> EdgeQueue<N> {
    /// Mask for wrapping an index to the buffer size.
    const MASK: usize = N - 1;

    /// Create a new empty queue.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "edge queue depth must be a power of 2");

        Self {
            slots: UnsafeCell::new([EdgeEvent::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            waker: AtomicWaker::new(),
        }
    }

    /// Get the interrupt-side producer handle.
    pub fn relay(&'static self) -> EdgeRelay<N> {
        EdgeRelay { queue: self }
    }

    /// Enqueue one event, producer side.
    ///
    /// Returns `false` if the queue was full and the event was dropped.
    ///
    /// # Timing
    ///
    /// O(1), never blocks, never allocates. Safe in interrupt context.
    #[inline]
    fn push(&self, event: EdgeEvent) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: single producer; this slot is not published until the
        // Release store below, and the consumer has freed it (read_idx).
        unsafe {
            (*self.slots.get())[(write as usize) & Self::MASK] = event;
        }
        self.write_idx.store(write.wrapping_add(1), Ordering::Release);

        self.waker.wake();
        true
    }

    /// Dequeue one event if available, consumer side.
    #[inline]
    pub fn try_receive(&self) -> Option<EdgeEvent> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: single consumer; the slot was published by the Release
        // store of write_idx observed above.
        let event = unsafe { (*self.slots.get())[(read as usize) & Self::MASK] };
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(event)
    }

    /// Receive the next event, suspending while the queue is empty.
    pub async fn receive(&self) -> EdgeEvent {
        poll_fn(|cx| {
            if let Some(event) = self.try_receive() {
                return Poll::Ready(event);
            }
            self.waker.register(cx.waker());
            // Re-check after registering so an enqueue racing the
            // registration cannot strand the consumer.
            match self.try_receive() {
                Some(event) => Poll::Ready(event),
                None => Poll::Pending,
            }
        })
        .await
    }

    /// Events waiting to be consumed.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Check if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Events dropped because the queue was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for EdgeQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side producer handle for one edge queue.
///
/// `Copy`, so it can move into an interrupt closure or a `static`
/// handler table. One relay per queue: the SPSC contract means exactly
/// one execution context may push.
#[derive(Clone, Copy)]
pub struct EdgeRelay<const N: usize = EDGE_QUEUE_DEPTH> {
    queue: &'static EdgeQueue<N>,
}

impl<const N: usize> EdgeRelay<N> {
    /// Hand one edge event to the recognizer.
    ///
    /// Exactly one non-blocking enqueue attempt; returns `false` if the
    /// queue was full and the event was dropped.
    #[inline]
    pub fn push(&self, event: EdgeEvent) -> bool {
        self.queue.push(event)
    }
}

/// The hardware seam: a digital input line that fires on both rising and
/// falling transitions.
///
/// The pin layer owns electrical configuration (pull-up/pull-down,
/// interrupt vector attachment) and the mapping from electrical level to
/// logical [`Level`]. Implementations route every transition into the
/// supplied relay, stamping a capture time when the hardware latches one.
pub trait EdgeSource<const N: usize = EDGE_QUEUE_DEPTH> {
    /// Error of the underlying pin/interrupt layer, propagated unmodified.
    type Error;

    /// Wire both rising and falling transitions of the line into `relay`.
    fn attach(&mut self, relay: EdgeRelay<N>) -> Result<(), Self::Error>;

    /// On-demand read of the line's current logical level.
    fn level(&self) -> Level;
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_time::Instant;

    fn down_at(ms: u64) -> EdgeEvent {
        EdgeEvent::captured(Level::Down, Instant::from_millis(ms))
    }

    #[test]
    fn test_queue_fifo_order() {
        static QUEUE: EdgeQueue = EdgeQueue::new();
        let relay = QUEUE.relay();

        assert!(relay.push(down_at(1)));
        assert!(relay.push(down_at(2)));
        assert_eq!(QUEUE.pending(), 2);

        assert_eq!(QUEUE.try_receive(), Some(down_at(1)));
        assert_eq!(QUEUE.try_receive(), Some(down_at(2)));
        assert_eq!(QUEUE.try_receive(), None);
        assert!(QUEUE.is_empty());
    }

    #[test]
    fn test_queue_drops_when_full() {
        static QUEUE: EdgeQueue = EdgeQueue::new();
        let relay = QUEUE.relay();

        for ms in 0..EDGE_QUEUE_DEPTH as u64 {
            assert!(relay.push(down_at(ms)));
        }
        // Bounce storm: the burst past capacity is dropped, not blocked on.
        assert!(!relay.push(down_at(99)));
        assert!(!relay.push(down_at(100)));
        assert_eq!(QUEUE.dropped(), 2);

        // The queued events survive intact.
        assert_eq!(QUEUE.try_receive(), Some(down_at(0)));
        assert_eq!(QUEUE.pending(), (EDGE_QUEUE_DEPTH - 1) as u32);

        // Space freed, pushes succeed again.
        assert!(relay.push(down_at(7)));
    }

    #[test]
    fn test_queue_index_wrap() {
        static QUEUE: EdgeQueue = EdgeQueue::new();
        let relay = QUEUE.relay();

        // Cycle well past the ring size.
        for ms in 0..(EDGE_QUEUE_DEPTH as u64 * 10) {
            assert!(relay.push(down_at(ms)));
            assert_eq!(QUEUE.try_receive(), Some(down_at(ms)));
        }
        assert!(QUEUE.is_empty());
        assert_eq!(QUEUE.dropped(), 0);
    }

    #[test]
    fn test_receive_returns_queued_event() {
        static QUEUE: EdgeQueue = EdgeQueue::new();
        QUEUE.relay().push(down_at(5));

        let event = block_on(QUEUE.receive());
        assert_eq!(event, down_at(5));
    }

    #[test]
    fn test_spsc_cross_thread() {
        static QUEUE: EdgeQueue<64> = EdgeQueue::new();
        let relay = QUEUE.relay();

        let producer = std::thread::spawn(move || {
            for ms in 0..1000u64 {
                // Spin rather than drop so the order check below is exact.
                while !relay.push(down_at(ms)) {
                    std::thread::yield_now();
                }
            }
        });

        for expected in 0..1000u64 {
            let event = block_on(QUEUE.receive());
            assert_eq!(event, down_at(expected));
        }

        producer.join().unwrap();
        assert!(QUEUE.is_empty());
    }
}
