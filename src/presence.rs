//! Touch-presence state machine.
//!
//! The touchpad keeps reporting frames while a finger rests on it but never
//! reports a reliable lift-off, so "not touching" is inferred from the absence
//! of recent frames. Observations set the contact count directly; periodic
//! ticks expire a stale count once the debounce window has elapsed.

use crate::contact::ContactBatch;
use crate::error::MonitorError;

pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Timing parameters for expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceSettings {
    /// Elapsed time without evidence after which contacts are considered lifted.
    pub debounce_ms: u64,
    /// Cadence of the expiry tick.
    pub poll_interval_ms: u64,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenceState {
    /// Contacts currently reported; 0 means idle.
    pub contact_count: u32,
    /// Timestamp of the newest observation. Never moves backwards.
    pub last_observed_at_ms: u64,
}

/// Point-in-time presence decision handed to renderers by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusSnapshot {
    contact_count: u32,
}

impl StatusSnapshot {
    pub const IDLE: StatusSnapshot = StatusSnapshot { contact_count: 0 };

    pub fn new(contact_count: u32) -> Self {
        Self { contact_count }
    }

    pub fn contact_count(&self) -> u32 {
        self.contact_count
    }

    pub fn is_touching(&self) -> bool {
        self.contact_count > 0
    }
}

pub struct PresenceTracker {
    state: PresenceState,
    debounce_ms: u64,
}

impl PresenceTracker {
    pub fn new(settings: PresenceSettings) -> Self {
        Self {
            state: PresenceState::default(),
            debounce_ms: settings.debounce_ms,
        }
    }

    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Record a decoded frame. Returns a snapshot only when the reported count changes.
    pub fn on_contacts_observed(&mut self, batch: &ContactBatch) -> Option<StatusSnapshot> {
        let observed_at = batch.observed_at_ms();
        if observed_at < self.state.last_observed_at_ms {
            // Count is still real evidence; only the timestamp is ignored.
            log::debug!(
                "{}",
                MonitorError::ClockRegression {
                    now_ms: observed_at,
                    last_ms: self.state.last_observed_at_ms,
                }
            );
        } else {
            self.state.last_observed_at_ms = observed_at;
        }

        let count = u32::try_from(batch.len()).unwrap_or(u32::MAX);
        let previous = self.state.contact_count;
        self.state.contact_count = count;

        (count != previous).then(|| StatusSnapshot::new(count))
    }

    /// Expire contacts once no frame has arrived for longer than the debounce window.
    pub fn on_tick(&mut self, now_ms: u64) -> Option<StatusSnapshot> {
        if self.state.contact_count == 0 {
            return None;
        }

        let last = self.state.last_observed_at_ms;
        if now_ms < last {
            log::debug!(
                "{}",
                MonitorError::ClockRegression {
                    now_ms,
                    last_ms: last,
                }
            );
            return None;
        }

        if now_ms - last <= self.debounce_ms {
            return None;
        }

        log::debug!(
            "No contacts for {}ms, releasing {} contact(s)",
            now_ms - last,
            self.state.contact_count
        );
        self.state.contact_count = 0;
        Some(StatusSnapshot::IDLE)
    }
}
