//! Module: config
//!
//! Purpose: duration thresholds for press classification, and the shared
//! store that makes runtime mutation atomic.
//!
//! Architecture:
//! - [`PressThresholds`] is a plain `Copy` value; `classify` on it is pure.
//! - [`ThresholdStore`] holds the live thresholds behind a critical-section
//!   cell. Readers snapshot all four fields in one section, writers replace
//!   all fields or none. A failed validation leaves the store untouched.
//!
//! Safety: RT-safe. Accesses are bounded critical sections, no blocking locks.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Duration;

use crate::error::ConfigError;
use crate::press::PressLength;

/// Shortest accepted debounce interval.
pub const DEBOUNCE_INTERVAL_MIN: Duration = Duration::from_millis(10);

/// Longest accepted debounce interval.
pub const DEBOUNCE_INTERVAL_MAX: Duration = Duration::from_millis(30);

/// Duration thresholds for one button instance.
///
/// Invariants, enforced by [`ThresholdStore`] on every mutation:
/// - `DEBOUNCE_INTERVAL_MIN <= debounce_interval <= DEBOUNCE_INTERVAL_MAX`
/// - `short_press <= long_press <= extra_long_press`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PressThresholds {
    /// Minimum time an edge must persist to count as a genuine transition.
    /// The tick period should be roughly half of this, so two tick pulses
    /// confirm the interval has elapsed.
    pub debounce_interval: Duration,
    /// Lower bound of a short press.
    pub short_press: Duration,
    /// Lower bound of a long press.
    pub long_press: Duration,
    /// Lower bound of an extra-long press.
    pub extra_long_press: Duration,
}

impl PressThresholds {
    /// Stock thresholds: 21 ms debounce, 22 ms / 500 ms / 1971 ms bands.
    pub const DEFAULT: Self = Self {
        debounce_interval: Duration::from_millis(21),
        short_press: Duration::from_millis(22),
        long_press: Duration::from_millis(500),
        extra_long_press: Duration::from_millis(1971),
    };

    /// Classify a completed press duration.
    ///
    /// Pure and deterministic: every duration falls into exactly one band.
    /// Anything below the short-press threshold classifies as
    /// [`PressLength::Debounce`]; it is still a value, not an error.
    #[inline]
    pub fn classify(&self, held: Duration) -> PressLength {
        if held >= self.extra_long_press {
            PressLength::ExtraLong
        } else if held >= self.long_press {
            PressLength::Long
        } else if held >= self.short_press {
            PressLength::Short
        } else {
            PressLength::Debounce
        }
    }
}

impl Default for PressThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Shared threshold store with atomic, validated mutation.
///
/// `const`-constructible so firmware can place one in a `static` next to
/// the queues. The recognizer snapshots it once per completed press; a
/// console or host link mutates it through the checked setters.
///
/// # Usage
///
/// ```ignore
/// static THRESHOLDS: ThresholdStore = ThresholdStore::new();
///
/// THRESHOLDS.set_press_lengths(
///     Duration::from_millis(30),
///     Duration::from_millis(400),
///     Duration::from_millis(1500),
/// )?;
/// let current = THRESHOLDS.snapshot();
/// ```
pub struct ThresholdStore {
    current: Mutex<CriticalSectionRawMutex, Cell<PressThresholds>>,
}

impl ThresholdStore {
    /// Create a store holding the stock thresholds.
    pub const fn new() -> Self {
        Self {
            current: Mutex::new(Cell::new(PressThresholds::DEFAULT)),
        }
    }

    /// Get a consistent copy of the current thresholds.
    #[inline]
    pub fn snapshot(&self) -> PressThresholds {
        self.current.lock(|cell| cell.get())
    }

    /// Replace the three press-length thresholds.
    ///
    /// Fails with [`ConfigError::InvalidOrdering`] unless
    /// `short <= long <= extra_long`; on failure the store is unchanged.
    pub fn set_press_lengths(
        &self,
        short: Duration,
        long: Duration,
        extra_long: Duration,
    ) -> Result<(), ConfigError> {
        if !(short <= long && long <= extra_long) {
            return Err(ConfigError::InvalidOrdering);
        }
        self.current.lock(|cell| {
            let mut thresholds = cell.get();
            thresholds.short_press = short;
            thresholds.long_press = long;
            thresholds.extra_long_press = extra_long;
            cell.set(thresholds);
        });
        Ok(())
    }

    /// Replace the debounce interval.
    ///
    /// Fails with [`ConfigError::OutOfRange`] unless the interval lies in
    /// `10..=30` ms; on failure the store is unchanged.
    pub fn set_debounce_interval(&self, interval: Duration) -> Result<(), ConfigError> {
        if interval < DEBOUNCE_INTERVAL_MIN || interval > DEBOUNCE_INTERVAL_MAX {
            return Err(ConfigError::OutOfRange);
        }
        self.current.lock(|cell| {
            let mut thresholds = cell.get();
            thresholds.debounce_interval = interval;
            cell.set(thresholds);
        });
        Ok(())
    }
}

impl Default for ThresholdStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        let t = PressThresholds::DEFAULT;

        assert_eq!(t.classify(Duration::from_millis(0)), PressLength::Debounce);
        assert_eq!(t.classify(Duration::from_millis(21)), PressLength::Debounce);
        assert_eq!(t.classify(Duration::from_millis(22)), PressLength::Short);
        assert_eq!(t.classify(Duration::from_millis(499)), PressLength::Short);
        assert_eq!(t.classify(Duration::from_millis(500)), PressLength::Long);
        assert_eq!(t.classify(Duration::from_millis(1970)), PressLength::Long);
        assert_eq!(
            t.classify(Duration::from_millis(1971)),
            PressLength::ExtraLong
        );
        assert_eq!(
            t.classify(Duration::from_millis(60_000)),
            PressLength::ExtraLong
        );
    }

    #[test]
    fn test_set_press_lengths_validates_ordering() {
        let store = ThresholdStore::new();
        let before = store.snapshot();

        // Descending order must be rejected and leave the store untouched.
        let result = store.set_press_lengths(
            Duration::from_millis(500),
            Duration::from_millis(22),
            Duration::from_millis(1971),
        );
        assert_eq!(result, Err(ConfigError::InvalidOrdering));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_set_press_lengths_accepts_equal_bounds() {
        let store = ThresholdStore::new();
        store
            .set_press_lengths(
                Duration::from_millis(100),
                Duration::from_millis(100),
                Duration::from_millis(100),
            )
            .unwrap();

        let t = store.snapshot();
        assert_eq!(t.short_press, Duration::from_millis(100));
        assert_eq!(t.long_press, Duration::from_millis(100));
        assert_eq!(t.extra_long_press, Duration::from_millis(100));
        // Debounce interval untouched by a press-length update.
        assert_eq!(t.debounce_interval, Duration::from_millis(21));
    }

    #[test]
    fn test_set_debounce_interval_range() {
        let store = ThresholdStore::new();

        assert_eq!(
            store.set_debounce_interval(Duration::from_millis(9)),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(
            store.set_debounce_interval(Duration::from_millis(31)),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(
            store.snapshot().debounce_interval,
            Duration::from_millis(21)
        );

        store
            .set_debounce_interval(Duration::from_millis(10))
            .unwrap();
        assert_eq!(
            store.snapshot().debounce_interval,
            Duration::from_millis(10)
        );
        store
            .set_debounce_interval(Duration::from_millis(30))
            .unwrap();
        assert_eq!(
            store.snapshot().debounce_interval,
            Duration::from_millis(30)
        );
    }
}
