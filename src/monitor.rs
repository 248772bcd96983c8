//! Serial executor for presence state.
//!
//! Input frames and expiry ticks come from different threads. Both are sent as
//! commands to one worker thread that owns the `PresenceTracker`, so the state
//! has exactly one writer and no lock. Listeners get snapshots by value.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::audit::AuditLog;
use crate::clock::Clock;
use crate::contact::ContactBatch;
use crate::presence::{PresenceSettings, PresenceTracker, StatusSnapshot};
use crate::status::describe_for_log;

/// Receives the monitor's outputs on the worker thread.
pub trait StatusListener: Send + 'static {
    /// Called only when presence actually changes.
    fn status_changed(&mut self, snapshot: StatusSnapshot);

    /// Called for every record the worker appends to the audit log, in log order.
    fn log_appended(&mut self, text: &str);
}

enum Command {
    Observed(ContactBatch),
    Tick(u64),
    Note(String),
    Shutdown,
}

/// Cheap, cloneable sender side of the monitor.
#[derive(Clone)]
pub struct MonitorHandle {
    tx: Sender<Command>,
}

impl MonitorHandle {
    /// Queue a decoded frame. Returns false once the monitor has stopped.
    pub fn observe(&self, batch: ContactBatch) -> bool {
        self.tx.send(Command::Observed(batch)).is_ok()
    }

    /// Queue an expiry check at `now_ms`. Returns false once the monitor has stopped.
    pub fn tick(&self, now_ms: u64) -> bool {
        self.tx.send(Command::Tick(now_ms)).is_ok()
    }

    /// Queue a free-form audit entry, ordered with the frames sent before and after it.
    pub fn note(&self, text: impl Into<String>) -> bool {
        self.tx.send(Command::Note(text.into())).is_ok()
    }
}

struct Ticker {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

pub struct Monitor<L: StatusListener> {
    handle: MonitorHandle,
    worker: Option<JoinHandle<L>>,
    ticker: Option<Ticker>,
}

impl<L: StatusListener> Monitor<L> {
    /// Start the worker thread. No ticks are generated until `start_ticker`.
    pub fn spawn(settings: PresenceSettings, audit: AuditLog, listener: L) -> Self {
        let (tx, rx) = mpsc::channel();
        let tracker = PresenceTracker::new(settings);
        let worker = thread::Builder::new()
            .name("presence".into())
            .spawn(move || run_worker(rx, tracker, audit, listener));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Failed to spawn presence worker: {}", e);
                None
            }
        };

        Self {
            handle: MonitorHandle { tx },
            worker,
            ticker: None,
        }
    }

    pub fn handle(&self) -> MonitorHandle {
        self.handle.clone()
    }

    /// Generate expiry ticks every `interval` from a separate thread.
    pub fn start_ticker(&mut self, interval: Duration, clock: Arc<dyn Clock>) {
        if self.ticker.is_some() {
            return;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let handle = self.handle.clone();

        let spawned = thread::Builder::new()
            .name("presence-ticker".into())
            .spawn(move || {
                log::debug!("Ticker started ({}ms)", interval.as_millis());
                loop {
                    thread::sleep(interval);
                    if stop_flag.load(Ordering::Relaxed) {
                        break;
                    }
                    if !handle.tick(clock.now_ms()) {
                        break;
                    }
                }
                log::debug!("Ticker stopped");
            });

        match spawned {
            Ok(thread) => self.ticker = Some(Ticker { stop, thread }),
            Err(e) => log::error!("Failed to spawn ticker: {}", e),
        }
    }

    /// Stop the ticker, let the worker drain queued commands, and hand back the listener.
    pub fn shutdown(mut self) -> Option<L> {
        self.stop_ticker();
        let _ = self.handle.tx.send(Command::Shutdown);

        let worker = self.worker.take()?;
        match worker.join() {
            Ok(listener) => Some(listener),
            Err(_) => {
                log::error!("Presence worker panicked");
                None
            }
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop.store(true, Ordering::Relaxed);
            if ticker.thread.join().is_err() {
                log::error!("Ticker thread panicked");
            }
        }
    }
}

impl<L: StatusListener> Drop for Monitor<L> {
    fn drop(&mut self) {
        self.stop_ticker();
        let _ = self.handle.tx.send(Command::Shutdown);
    }
}

fn run_worker<L: StatusListener>(
    rx: Receiver<Command>,
    mut tracker: PresenceTracker,
    audit: AuditLog,
    mut listener: L,
) -> L {
    let mut frame_count: u64 = 0;

    while let Ok(command) = rx.recv() {
        match command {
            Command::Observed(batch) => {
                if let Some(snapshot) = tracker.on_contacts_observed(&batch) {
                    listener.status_changed(snapshot);
                }

                let record = describe_for_log(&batch);
                audit.append(record.clone());
                listener.log_appended(&record);

                log_frame_progress(&mut frame_count, batch.len());
            }
            Command::Tick(now_ms) => {
                if let Some(snapshot) = tracker.on_tick(now_ms) {
                    listener.status_changed(snapshot);
                }
            }
            Command::Note(text) => {
                audit.append(text.clone());
                listener.log_appended(&text);
            }
            Command::Shutdown => break,
        }
    }

    listener
}

/// Monitor reachable from the main thread and from a signal handler.
/// The first `stop` shuts it down; later calls do nothing.
pub struct SharedMonitor<L: StatusListener> {
    inner: Arc<Mutex<Option<Monitor<L>>>>,
}

impl<L: StatusListener> Clone for SharedMonitor<L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<L: StatusListener> SharedMonitor<L> {
    pub fn new(monitor: Monitor<L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(monitor))),
        }
    }

    /// Returns true if this call performed the shutdown.
    pub fn stop(&self) -> bool {
        let monitor = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match monitor {
            Some(monitor) => {
                monitor.shutdown();
                true
            }
            None => false,
        }
    }
}

/// Stop the monitor and export the audit log. `None` if it was already stopped.
pub fn finish_session<L: StatusListener>(
    monitor: &SharedMonitor<L>,
    audit: &AuditLog,
) -> Option<String> {
    if !monitor.stop() {
        return None;
    }
    log::info!("Monitor stopped, {} audit entries", audit.len());
    Some(audit.export())
}

fn log_frame_progress(frame_count: &mut u64, contact_count: usize) {
    if *frame_count == 0 {
        log::info!("Touch frames flowing");
    }
    *frame_count += 1;

    if *frame_count % 500 == 0 {
        log::debug!("Touch frames: {}, contacts: {}", frame_count, contact_count);
    }
}
