//! Error types for bouncer.
//!
//! Errors are raised synchronously at construction and configuration time
//! only. Recognition-time anomalies (edge queue overflow, a slow
//! subscriber) are absorbed as counted best-effort loss instead: the
//! recognition loop must never fail or block indefinitely. Hardware
//! errors from the pin layer pass through [`EdgeSource::attach`]
//! unmodified and are not wrapped here.
//!
//! [`EdgeSource::attach`]: crate::edge::EdgeSource::attach

/// Configuration error from threshold mutation calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Debounce interval outside the supported 10..=30 ms window.
    OutOfRange,
    /// Press-length thresholds not in ascending short <= long <= extra-long order.
    InvalidOrdering,
}

impl ConfigError {
    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::OutOfRange => "debounce interval out of range",
            Self::InvalidOrdering => "press thresholds out of order",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Error raised when a recognizer or publisher is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionError {
    /// No output sinks were supplied; a recognizer with nobody to notify
    /// is a configuration mistake, not a valid quiet mode.
    NoOutputSinks,
    /// More sinks than the fixed subscriber set can hold.
    TooManySinks,
}

impl ConstructionError {
    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoOutputSinks => "no output sinks supplied",
            Self::TooManySinks => "subscriber set capacity exceeded",
        }
    }
}

impl core::fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Error raised when registering a tick queue with the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The tick registry already holds the maximum number of recognizers.
    Full,
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Full => f.write_str("tick registry full"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::OutOfRange.message(),
            "debounce interval out of range"
        );
        assert_eq!(
            ConfigError::InvalidOrdering.message(),
            "press thresholds out of order"
        );
        assert_eq!(
            ConstructionError::NoOutputSinks.message(),
            "no output sinks supplied"
        );
    }
}
