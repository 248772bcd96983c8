//! Raw Linux `struct input_event` records as read from `/dev/input/eventN`.

use evdevil::event::{EventType, InputEvent};

/// timeval (2 × 4 bytes) + type + code + value.
pub const INPUT_EVENT_SIZE_32: usize = 16;
/// timeval (2 × 8 bytes) + type + code + value.
pub const INPUT_EVENT_SIZE_64: usize = 24;

/// Record size produced by the running kernel.
#[cfg(target_pointer_width = "64")]
pub const INPUT_EVENT_SIZE: usize = INPUT_EVENT_SIZE_64;
#[cfg(not(target_pointer_width = "64"))]
pub const INPUT_EVENT_SIZE: usize = INPUT_EVENT_SIZE_32;

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;
pub const SYN_REPORT: u16 = 0;
pub const SYN_DROPPED: u16 = 3;

pub const ABS_MT_SLOT: u16 = 0x2f;
pub const ABS_MT_POSITION_X: u16 = 0x35;
pub const ABS_MT_POSITION_Y: u16 = 0x36;
pub const ABS_MT_TRACKING_ID: u16 = 0x39;

/// Parse one input_event (32-bit or 64-bit layout, chosen by buffer length).
pub fn parse_input_event(buf: &[u8]) -> Option<InputEvent> {
    match buf.len() {
        INPUT_EVENT_SIZE_32 => parse_at(buf, 8),
        len if len >= INPUT_EVENT_SIZE_64 => parse_at(buf, 16),
        _ => None,
    }
}

fn parse_at(buf: &[u8], offset: usize) -> Option<InputEvent> {
    let field = buf.get(offset..offset + 8)?;
    let ty = u16::from_le_bytes([field[0], field[1]]);
    let code = u16::from_le_bytes([field[2], field[3]]);
    let value = i32::from_le_bytes([field[4], field[5], field[6], field[7]]);

    Some(InputEvent::new(EventType::from_raw(ty), code, value))
}

/// True for the EV_SYN/SYN_REPORT record that closes a frame.
pub fn is_syn_report(ev: &InputEvent) -> bool {
    ev.event_type().raw() == EV_SYN && ev.raw_code() == SYN_REPORT
}

#[cfg(test)]
pub(crate) fn encode_input_event(ty: u16, code: u16, value: i32) -> [u8; INPUT_EVENT_SIZE] {
    let mut buf = [0u8; INPUT_EVENT_SIZE];
    let offset = INPUT_EVENT_SIZE - 8;
    buf[offset..offset + 2].copy_from_slice(&ty.to_le_bytes());
    buf[offset + 2..offset + 4].copy_from_slice(&code.to_le_bytes());
    buf[offset + 4..offset + 8].copy_from_slice(&value.to_le_bytes());
    buf
}
