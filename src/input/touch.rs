//! Multitouch protocol decoding: tracks per-slot state across frames and
//! yields the contacts present at each SYN_REPORT.

use evdevil::event::InputEvent;

use crate::contact::Contact;

use super::event::{
    ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_SLOT, ABS_MT_TRACKING_ID, EV_ABS, EV_SYN,
    SYN_DROPPED, SYN_REPORT,
};

const MT_SLOTS: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    tracking_id: Option<i32>,
    x: Option<i32>,
    y: Option<i32>,
}

/// Slot state persists between frames: protocol B only sends what changed.
#[derive(Debug)]
pub struct TouchDecoder {
    current_slot: usize,
    slots: [SlotState; MT_SLOTS],
    /// Set by SYN_DROPPED; events are discarded until the next SYN_REPORT.
    dropping: bool,
}

impl Default for TouchDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchDecoder {
    pub fn new() -> Self {
        Self {
            current_slot: 0,
            slots: [SlotState::default(); MT_SLOTS],
            dropping: false,
        }
    }

    pub fn apply(&mut self, ev: &InputEvent) {
        let ty = ev.event_type().raw();
        let code = ev.raw_code();
        let value = ev.raw_value();

        if ty == EV_SYN && code == SYN_DROPPED {
            log::debug!("Kernel dropped input events, skipping to next report");
            self.dropping = true;
            return;
        }
        if self.dropping {
            if ty == EV_SYN && code == SYN_REPORT {
                self.dropping = false;
            }
            return;
        }
        if ty != EV_ABS {
            return;
        }

        match code {
            ABS_MT_SLOT => {
                self.current_slot = (value.max(0) as usize).min(MT_SLOTS - 1);
            }
            ABS_MT_TRACKING_ID => {
                let slot = &mut self.slots[self.current_slot];
                if value >= 0 {
                    slot.tracking_id = Some(value);
                } else {
                    *slot = SlotState::default();
                }
            }
            ABS_MT_POSITION_X => {
                self.slots[self.current_slot].x = Some(value);
                self.activate_slot_if_needed();
            }
            ABS_MT_POSITION_Y => {
                self.slots[self.current_slot].y = Some(value);
                self.activate_slot_if_needed();
            }
            _ => {}
        }
    }

    /// Contacts currently down, in slot order.
    pub fn contacts(&self) -> Vec<Contact> {
        self.slots
            .iter()
            .filter_map(|slot| {
                slot.tracking_id.map(|id| Contact {
                    id,
                    x: slot.x.unwrap_or(0),
                    y: slot.y.unwrap_or(0),
                })
            })
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.tracking_id.is_some()).count()
    }

    pub fn reset(&mut self) {
        self.current_slot = 0;
        self.slots = [SlotState::default(); MT_SLOTS];
        self.dropping = false;
    }

    // Devices without tracking IDs still report positions for live contacts.
    fn activate_slot_if_needed(&mut self) {
        let slot = self.current_slot;
        if self.slots[slot].tracking_id.is_none() {
            self.slots[slot].tracking_id = Some(slot as i32);
        }
    }
}
