//! Debugging subcommands: stream raw touchpad events, list input devices.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::device::{self, InputDeviceInfo};
use crate::error::MonitorError;
use crate::input::{parse_input_event, EV_ABS, EV_KEY, EV_SYN, INPUT_EVENT_SIZE};

fn code_name(ty: u16, code: u16) -> String {
    if ty == EV_SYN {
        return match code {
            0 => "SYN_REPORT".into(),
            3 => "SYN_DROPPED".into(),
            _ => format!("SYN/{}", code),
        };
    }
    if ty == EV_KEY {
        return format!("KEY/{}", code);
    }
    if ty == EV_ABS {
        let abs = match code {
            0x00 => "X",
            0x01 => "Y",
            0x18 => "PRESSURE",
            0x2f => "MT_SLOT",
            0x30 => "MT_TOUCH_MAJOR",
            0x31 => "MT_TOUCH_MINOR",
            0x34 => "MT_ORIENTATION",
            0x35 => "MT_POSITION_X",
            0x36 => "MT_POSITION_Y",
            0x37 => "MT_TOOL_TYPE",
            0x39 => "MT_TRACKING_ID",
            0x3a => "MT_PRESSURE",
            _ => "?",
        };
        return format!("ABS_{}({})", abs, code);
    }
    format!("type{} code{}", ty, code)
}

pub fn run_dump(device_path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file =
        File::open(device_path).map_err(|e| MonitorError::device_unavailable(device_path, e))?;
    let mut reader = BufReader::new(file);
    eprintln!(
        "Dumping touchpad events from {} (Ctrl+C to stop):\n",
        device_path.display()
    );

    let mut buf = [0u8; INPUT_EVENT_SIZE];
    let mut n = 0u64;
    loop {
        reader.read_exact(&mut buf)?;
        if let Some(ev) = parse_input_event(&buf) {
            n += 1;
            let name = code_name(ev.event_type().raw(), ev.raw_code());
            println!("{:6}  {}  value={}", n, name, ev.raw_value());
        }
    }
}

pub fn run_devices() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let devices = device::list_devices()?;
    for dev in &devices {
        println!("{}", describe_device(dev));
    }
    Ok(())
}

fn describe_device(dev: &InputDeviceInfo) -> String {
    let node = dev
        .event_node()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".into());
    let marker = if dev.is_touchpad() { "touchpad" } else { "" };
    format!("{:20}  {:8}  {}", node, marker, dev.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_names() {
        assert_eq!(code_name(EV_SYN, 0), "SYN_REPORT");
        assert_eq!(code_name(EV_ABS, 0x39), "ABS_MT_TRACKING_ID(57)");
        assert_eq!(code_name(EV_KEY, 330), "KEY/330");
        assert_eq!(code_name(4, 4), "type4 code4");
    }

    #[test]
    fn test_describe_device() {
        let dev = InputDeviceInfo {
            name: "SYNA2393:00 06CB:CE26 Touchpad".into(),
            handlers: vec!["mouse1".into(), "event7".into()],
            ..Default::default()
        };
        let line = describe_device(&dev);
        assert!(line.starts_with("/dev/input/event7"));
        assert!(line.contains("touchpad"));
        assert!(line.ends_with("SYNA2393:00 06CB:CE26 Touchpad"));
    }
}
