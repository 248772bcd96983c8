//! Raw input source for the monitor: device presence, registration, and
//! decoding of one frame into a `ContactBatch`.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::mem;
use std::path::{Path, PathBuf};

use crate::clock::Clock;
use crate::contact::ContactBatch;
use crate::error::MonitorError;

use super::event::{is_syn_report, parse_input_event, INPUT_EVENT_SIZE};
use super::touch::TouchDecoder;

pub trait InputGateway {
    fn device_exists(&self) -> bool;

    /// Start receiving input. Calling it again while registered is a no-op.
    fn register(&mut self) -> Result<(), MonitorError>;

    /// Decode one frame. Never fails: unrecognized payloads give an empty batch.
    fn parse_input(&mut self, payload: &[u8], observed_at_ms: u64) -> ContactBatch;

    /// Block until the next complete frame arrives and decode it.
    fn next_batch(&mut self, clock: &dyn Clock) -> Result<ContactBatch, MonitorError>;
}

/// Reads `struct input_event` records from a `/dev/input/eventN` node.
pub struct EvdevGateway {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    decoder: TouchDecoder,
    frame: Vec<u8>,
}

impl EvdevGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: None,
            decoder: TouchDecoder::new(),
            frame: Vec::with_capacity(INPUT_EVENT_SIZE * 32),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_registered(&self) -> bool {
        self.reader.is_some()
    }

    fn read_frame(&mut self) -> io::Result<Vec<u8>> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "touchpad not registered",
            ));
        };

        let mut buf = [0u8; INPUT_EVENT_SIZE];
        loop {
            reader.read_exact(&mut buf)?;
            self.frame.extend_from_slice(&buf);
            if parse_input_event(&buf).is_some_and(|ev| is_syn_report(&ev)) {
                return Ok(mem::take(&mut self.frame));
            }
        }
    }
}

impl InputGateway for EvdevGateway {
    fn device_exists(&self) -> bool {
        self.path.exists()
    }

    fn register(&mut self) -> Result<(), MonitorError> {
        if self.reader.is_some() {
            return Ok(());
        }

        let file = File::open(&self.path)
            .map_err(|e| MonitorError::device_unavailable(&self.path, e))?;
        log::info!("Reading touchpad events from {}", self.path.display());

        self.reader = Some(BufReader::new(file));
        self.decoder.reset();
        self.frame.clear();
        Ok(())
    }

    fn parse_input(&mut self, payload: &[u8], observed_at_ms: u64) -> ContactBatch {
        if payload.is_empty() || payload.len() % INPUT_EVENT_SIZE != 0 {
            let err = MonitorError::MalformedInput(format!(
                "{} bytes is not a whole number of {}-byte events",
                payload.len(),
                INPUT_EVENT_SIZE
            ));
            log::warn!("{}", err);
            return ContactBatch::empty(observed_at_ms);
        }

        for record in payload.chunks_exact(INPUT_EVENT_SIZE) {
            if let Some(ev) = parse_input_event(record) {
                self.decoder.apply(&ev);
            }
        }

        ContactBatch::new(self.decoder.contacts(), observed_at_ms)
    }

    fn next_batch(&mut self, clock: &dyn Clock) -> Result<ContactBatch, MonitorError> {
        let payload = match self.read_frame() {
            Ok(payload) => payload,
            Err(e) => {
                self.reader = None;
                self.frame.clear();
                return Err(MonitorError::device_unavailable(&self.path, e));
            }
        };

        Ok(self.parse_input(&payload, clock.now_ms()))
    }
}
