//! Session configuration

use std::time::Duration;

/// Tunables for one order session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Simulated payment processing latency (stage 1)
    pub processing_delay: Duration,
    /// How long the success screen stays up before the surface closes (stage 2)
    pub confirmation_delay: Duration,
    /// Capacity of the session event broadcast channel
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(2000),
            confirmation_delay: Duration::from_millis(3000),
            event_capacity: 64,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            processing_delay: std::env::var("PAYMENT_PROCESSING_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.processing_delay),
            confirmation_delay: std::env::var("PAYMENT_CONFIRMATION_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.confirmation_delay),
            event_capacity: std::env::var("SESSION_EVENT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.event_capacity),
        }
    }
}
