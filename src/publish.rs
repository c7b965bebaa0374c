//! Module: publish
//!
//! Purpose: broadcast each classified press to a fixed set of subscriber
//! sinks.
//!
//! Two delivery contracts, one chosen per deployment:
//! - **Guaranteed**: "every subscriber sees every press." Blocking sends;
//!   appropriate when subscriber buffering is sufficient.
//! - **BestEffort**: "a stalled subscriber loses presses, the recognizer
//!   never stalls." Drop-if-full sends, counted for diagnostics.
//!
//! Do not mix policies across the instances of one deployment.

use embassy_sync::channel::DynamicSender;
use heapless::Vec;
use log::warn;

use crate::error::ConstructionError;
use crate::press::PressLength;

/// Most sinks one publisher will carry.
pub const MAX_SUBSCRIBERS: usize = 8;

/// A subscriber's input: the send side of a channel of press lengths.
/// Capacity-erased so every subscriber sizes its own buffering.
pub type PressSink = DynamicSender<'static, PressLength>;

/// Deployment-wide delivery contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Block until every sink has accepted the press.
    Guaranteed,
    /// Drop the press for any sink that is full; never block.
    BestEffort,
}

/// Broadcasts classified presses to the subscriber set, in set order.
///
/// The set is fixed at construction and never exposed for mutation;
/// per-subscriber delivery is chronological.
pub struct Publisher {
    sinks: Vec<PressSink, MAX_SUBSCRIBERS>,
    policy: DeliveryPolicy,
    dropped: u32,
}

impl Publisher {
    /// Build a publisher over `sinks`.
    ///
    /// Fails with [`ConstructionError::NoOutputSinks`] when `sinks` is
    /// empty and [`ConstructionError::TooManySinks`] past
    /// [`MAX_SUBSCRIBERS`].
    pub fn new(policy: DeliveryPolicy, sinks: &[PressSink]) -> Result<Self, ConstructionError> {
        if sinks.is_empty() {
            return Err(ConstructionError::NoOutputSinks);
        }
        let mut set = Vec::new();
        for sink in sinks {
            set.push(sink.clone())
                .map_err(|_| ConstructionError::TooManySinks)?;
        }
        Ok(Self {
            sinks: set,
            policy,
            dropped: 0,
        })
    }

    /// Broadcast one press to every sink.
    pub async fn publish(&mut self, length: PressLength) {
        for sink in &self.sinks {
            match self.policy {
                DeliveryPolicy::Guaranteed => sink.send(length).await,
                DeliveryPolicy::BestEffort => {
                    if sink.try_send(length).is_err() {
                        self.dropped = self.dropped.saturating_add(1);
                        warn!("subscriber full, dropped {:?}", length);
                    }
                }
            }
        }
    }

    /// Number of sinks in the set.
    pub fn subscriber_count(&self) -> usize {
        self.sinks.len()
    }

    /// The delivery contract this publisher was built with.
    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// Presses dropped under the best-effort contract.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
