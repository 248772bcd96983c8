//! Touchpad discovery from the kernel's input device list.

use std::path::PathBuf;

use crate::error::MonitorError;
use crate::input::ABS_MT_POSITION_X;

pub const INPUT_DEVICES_PATH: &str = "/proc/bus/input/devices";

const INPUT_PROP_POINTER: u32 = 0x00;

/// One block of `/proc/bus/input/devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDeviceInfo {
    pub name: String,
    pub handlers: Vec<String>,
    pub props: u128,
    pub abs: u128,
}

impl InputDeviceInfo {
    /// `/dev/input/eventN` for this device, if it has an evdev handler.
    pub fn event_node(&self) -> Option<PathBuf> {
        self.handlers
            .iter()
            .find(|h| {
                h.strip_prefix("event")
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            })
            .map(|h| PathBuf::from("/dev/input").join(h))
    }

    /// Indirect pointer with multitouch positions, or anything named a touchpad.
    pub fn is_touchpad(&self) -> bool {
        let multitouch_pointer = has_bit(self.props, INPUT_PROP_POINTER)
            && has_bit(self.abs, u32::from(ABS_MT_POSITION_X));
        multitouch_pointer || self.name.to_lowercase().contains("touchpad")
    }
}

pub fn parse_device_list(content: &str) -> Vec<InputDeviceInfo> {
    let mut devices = Vec::new();
    let mut current: Option<InputDeviceInfo> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            if let Some(dev) = current.take() {
                devices.push(dev);
            }
            continue;
        }

        let Some((kind, rest)) = line.split_once(": ") else {
            continue;
        };
        let dev = current.get_or_insert_with(InputDeviceInfo::default);

        match kind {
            "N" => {
                if let Some(name) = rest.strip_prefix("Name=") {
                    dev.name = name.trim_matches('"').to_string();
                }
            }
            "H" => {
                if let Some(handlers) = rest.strip_prefix("Handlers=") {
                    dev.handlers = handlers.split_whitespace().map(String::from).collect();
                }
            }
            "B" => {
                if let Some(bits) = rest.strip_prefix("PROP=") {
                    dev.props = parse_bitmap(bits);
                } else if let Some(bits) = rest.strip_prefix("ABS=") {
                    dev.abs = parse_bitmap(bits);
                }
            }
            _ => {}
        }
    }

    if let Some(dev) = current {
        devices.push(dev);
    }
    devices
}

pub fn list_devices() -> Result<Vec<InputDeviceInfo>, MonitorError> {
    let content = std::fs::read_to_string(INPUT_DEVICES_PATH)?;
    Ok(parse_device_list(&content))
}

/// First touchpad with an event node, if any.
pub fn find_touchpad() -> Option<InputDeviceInfo> {
    let devices = match list_devices() {
        Ok(devices) => devices,
        Err(e) => {
            log::warn!("Cannot read {}: {}", INPUT_DEVICES_PATH, e);
            return None;
        }
    };

    let found = devices
        .into_iter()
        .find(|d| d.is_touchpad() && d.event_node().is_some());
    if let Some(ref dev) = found {
        log::debug!("Detected touchpad: {}", dev.name);
    }
    found
}

// Hex words separated by spaces, most significant first, one kernel `long` each.
fn parse_bitmap(field: &str) -> u128 {
    let word_bits = usize::BITS;
    field
        .split_whitespace()
        .rev()
        .take((u128::BITS / word_bits) as usize)
        .enumerate()
        .fold(0, |acc, (i, word)| {
            let word = u64::from_str_radix(word, 16).unwrap_or(0);
            acc | (u128::from(word) << (i as u32 * word_bits))
        })
}

fn has_bit(bitmap: u128, bit: u32) -> bool {
    bit < u128::BITS && bitmap & (1 << bit) != 0
}
