//! Touchpad presence monitor.
//!
//! Raw multitouch frames from the touchpad feed a debounced presence state
//! machine; status changes are rendered as a tray-style icon and background
//! color, and every frame is recorded in an append-only audit log.

pub mod audit;
pub mod clock;
pub mod config;
pub mod contact;
pub mod device;
pub mod dump;
pub mod error;
pub mod input;
pub mod monitor;
pub mod presence;
pub mod shell;
pub mod status;

pub use audit::AuditLog;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use contact::{Contact, ContactBatch};
pub use error::MonitorError;
pub use monitor::{finish_session, Monitor, MonitorHandle, SharedMonitor, StatusListener};
pub use presence::{PresenceSettings, PresenceState, PresenceTracker, StatusSnapshot};
pub use status::{describe_for_log, Background, IconImage, StatusSink};
