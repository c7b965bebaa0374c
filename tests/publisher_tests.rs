//! Publisher delivery-policy tests.

use bouncer::{ConstructionError, DeliveryPolicy, PressLength, PressSink, Publisher, MAX_SUBSCRIBERS};
use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

type Sink = Channel<CriticalSectionRawMutex, PressLength, 2>;

#[test]
fn test_guaranteed_delivery_reaches_every_sink() {
    static FIRST: Sink = Sink::new();
    static SECOND: Sink = Sink::new();

    let mut publisher = Publisher::new(
        DeliveryPolicy::Guaranteed,
        &[FIRST.dyn_sender(), SECOND.dyn_sender()],
    )
    .unwrap();
    assert_eq!(publisher.subscriber_count(), 2);
    assert_eq!(publisher.policy(), DeliveryPolicy::Guaranteed);

    block_on(publisher.publish(PressLength::Short));
    block_on(publisher.publish(PressLength::Long));

    // Chronological per subscriber.
    assert_eq!(FIRST.try_receive(), Ok(PressLength::Short));
    assert_eq!(FIRST.try_receive(), Ok(PressLength::Long));
    assert_eq!(SECOND.try_receive(), Ok(PressLength::Short));
    assert_eq!(SECOND.try_receive(), Ok(PressLength::Long));
}

#[test]
fn test_debounce_classification_is_published() {
    static ONLY: Sink = Sink::new();

    let mut publisher =
        Publisher::new(DeliveryPolicy::Guaranteed, &[ONLY.dyn_sender()]).unwrap();
    block_on(publisher.publish(PressLength::Debounce));

    // Subscribers decide what a sub-threshold press means; they still see it.
    assert_eq!(ONLY.try_receive(), Ok(PressLength::Debounce));
}

#[test]
fn test_best_effort_drops_only_for_the_stalled_sink() {
    static STALLED: Channel<CriticalSectionRawMutex, PressLength, 1> = Channel::new();
    static OPEN: Sink = Sink::new();

    // Fill the stalled subscriber's buffer.
    STALLED.try_send(PressLength::ExtraLong).unwrap();

    let mut publisher = Publisher::new(
        DeliveryPolicy::BestEffort,
        &[STALLED.dyn_sender(), OPEN.dyn_sender()],
    )
    .unwrap();

    block_on(publisher.publish(PressLength::Short));

    assert_eq!(publisher.dropped(), 1);
    assert_eq!(OPEN.try_receive(), Ok(PressLength::Short));
    // The stalled sink still holds its old backlog, nothing more.
    assert_eq!(STALLED.try_receive(), Ok(PressLength::ExtraLong));
    assert!(STALLED.try_receive().is_err());
}

#[test]
fn test_empty_sink_set_is_rejected() {
    let result = Publisher::new(DeliveryPolicy::BestEffort, &[]);
    assert_eq!(result.err(), Some(ConstructionError::NoOutputSinks));
}

#[test]
fn test_subscriber_set_is_bounded() {
    static ONLY: Sink = Sink::new();

    let sinks: [PressSink; MAX_SUBSCRIBERS + 1] = core::array::from_fn(|_| ONLY.dyn_sender());

    let result = Publisher::new(DeliveryPolicy::Guaranteed, &sinks);
    assert_eq!(result.err(), Some(ConstructionError::TooManySinks));
}
