//! # bouncer
//!
//! Debounced button press recognition with multi-subscriber publishing.
//!
//! Recognizes variable-length presses from raw, electrically noisy edge
//! transitions on one digital input line, classifies each completed press
//! by duration, and broadcasts the classification to a fixed set of
//! subscribers. Built for embedded control loops: hard interrupt-latency
//! constraints, no allocator, no OS scheduler.
//!
//! ## Architecture
//!
//! ```text
//! edge ISR ──▶ EdgeRelay ──▶ EdgeQueue ──┐
//!              (lock-free)               ├──▶ Recognizer ──▶ Publisher ──▶ sinks
//! timer ISR ─▶ TickRelay ──▶ tick queue ─┘    (single         (fixed set)
//!              (fan-out)                       consumer)
//! ```
//!
//! - The interrupt side performs exactly one non-blocking enqueue per
//!   edge and never blocks; overflow under a bounce storm drops events
//!   and counts them.
//! - One tick relay task per process fans the debounce timer's pulse out
//!   to every recognizer's private queue.
//! - One recognizer task per button merges its two queues, measures
//!   elapsed debounce time in ticks, and classifies each completed
//!   down-up sequence against configurable thresholds.
//! - Pin electrical configuration, interrupt vector attachment, and the
//!   log transport stay outside the crate.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod edge;
pub mod error;
pub mod machine;
pub mod press;
pub mod publish;
pub mod recognizer;
pub mod tick;

pub use config::{PressThresholds, ThresholdStore};
pub use edge::{EdgeQueue, EdgeRelay, EdgeSource, EDGE_QUEUE_DEPTH};
pub use error::{ConfigError, ConstructionError, RegistryError};
pub use machine::PressMachine;
pub use press::{EdgeEvent, Level, PressLength, TickPulse};
pub use publish::{DeliveryPolicy, PressSink, Publisher, MAX_SUBSCRIBERS};
pub use recognizer::Recognizer;
pub use tick::{TickQueue, TickRelay, MAX_RECOGNIZERS};
