//! Turns presence snapshots into observable outputs: a background color, a
//! tray icon, and audit text.

mod icon;

pub use icon::{IconImage, Rgba, ICON_SIZE};

use std::fmt;

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::contact::ContactBatch;
use crate::error::MonitorError;
use crate::presence::StatusSnapshot;

const TOUCHING_FILL: Rgb888 = Rgb888::new(0, 128, 0);
const IDLE_FILL: Rgb888 = Rgb888::new(255, 0, 0);
const LABEL_COLOR: Rgb888 = Rgb888::new(255, 255, 255);

const TOUCHING_BACKGROUND: Background = Background(Rgb888::new(144, 238, 144));
const IDLE_BACKGROUND: Background = Background(Rgb888::new(238, 144, 144));

/// Window background color for a presence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background(pub Rgb888);

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0.r(), self.0.g(), self.0.b())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StatusSink {
    icon_size: u32,
}

impl Default for StatusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink {
    pub fn new() -> Self {
        Self::with_icon_size(ICON_SIZE)
    }

    pub fn with_icon_size(icon_size: u32) -> Self {
        Self { icon_size }
    }

    /// Draw the circular status icon. Same snapshot, same pixels.
    pub fn render(&self, snapshot: StatusSnapshot) -> Result<IconImage, MonitorError> {
        let mut image = IconImage::transparent(self.icon_size)?;

        let fill = if snapshot.is_touching() {
            TOUCHING_FILL
        } else {
            IDLE_FILL
        };
        Circle::new(Point::zero(), self.icon_size)
            .into_styled(PrimitiveStyle::with_fill(fill))
            .draw(&mut image)
            .unwrap_or_else(|never| match never {});

        if let Some(label) = icon_label(snapshot) {
            let mut buf = [0u8; 4];
            let label = label.encode_utf8(&mut buf);
            let half = (self.icon_size / 2) as i32;
            let center = Point::new(half, half);
            let text_style = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build();
            Text::with_text_style(
                label,
                center,
                MonoTextStyle::new(&FONT_10X20, LABEL_COLOR),
                text_style,
            )
            .draw(&mut image)
            .unwrap_or_else(|never| match never {});
        }

        Ok(image)
    }

    pub fn background(&self, snapshot: StatusSnapshot) -> Background {
        if snapshot.is_touching() {
            TOUCHING_BACKGROUND
        } else {
            IDLE_BACKGROUND
        }
    }
}

/// Single digit for the icon; counts above nine show as `9`.
fn icon_label(snapshot: StatusSnapshot) -> Option<char> {
    if !snapshot.is_touching() {
        return None;
    }
    char::from_digit(snapshot.contact_count().min(9), 10)
}

/// Audit record for one observed frame: a separator, then one line per contact.
pub fn describe_for_log(batch: &ContactBatch) -> String {
    let mut out = String::from("---");
    for contact in batch.contacts() {
        out.push('\n');
        out.push_str(&contact.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Contact;

    fn count_pixels(img: &IconImage, color: Rgb888) -> usize {
        let want = Rgba::opaque(color);
        (0..img.height())
            .flat_map(|y| (0..img.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| img.pixel(x, y) == Some(want))
            .count()
    }

    #[test]
    fn test_idle_icon_is_red_and_blank() {
        let sink = StatusSink::new();
        let img = sink.render(StatusSnapshot::IDLE).unwrap();

        assert_eq!(img.width(), ICON_SIZE);
        assert_eq!(img.height(), ICON_SIZE);
        assert_eq!(img.pixel(16, 16), Some(Rgba::opaque(IDLE_FILL)));
        assert_eq!(img.pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(count_pixels(&img, LABEL_COLOR), 0);
        assert_eq!(count_pixels(&img, TOUCHING_FILL), 0);
    }

    #[test]
    fn test_touching_icon_is_green_with_label() {
        let sink = StatusSink::new();
        let img = sink.render(StatusSnapshot::new(2)).unwrap();

        assert_eq!(img.pixel(2, 16), Some(Rgba::opaque(TOUCHING_FILL)));
        assert_eq!(img.pixel(31, 31), Some(Rgba::TRANSPARENT));
        assert!(count_pixels(&img, LABEL_COLOR) > 0);
        assert_eq!(count_pixels(&img, IDLE_FILL), 0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let sink = StatusSink::new();
        let a = sink.render(StatusSnapshot::new(3)).unwrap();
        let _ = sink.render(StatusSnapshot::new(1)).unwrap();
        let b = sink.render(StatusSnapshot::new(3)).unwrap();
        assert_eq!(a, b);

        // Idle rendering does not depend on what came before.
        let idle = sink.render(StatusSnapshot::IDLE).unwrap();
        let _ = sink.render(StatusSnapshot::new(4)).unwrap();
        assert_eq!(sink.render(StatusSnapshot::IDLE).unwrap(), idle);
    }

    #[test]
    fn test_different_counts_render_differently() {
        let sink = StatusSink::new();
        let one = sink.render(StatusSnapshot::new(1)).unwrap();
        let two = sink.render(StatusSnapshot::new(2)).unwrap();
        assert_ne!(one, two);
    }

    #[test]
    fn test_label_clamped_to_single_digit() {
        assert_eq!(icon_label(StatusSnapshot::IDLE), None);
        assert_eq!(icon_label(StatusSnapshot::new(1)), Some('1'));
        assert_eq!(icon_label(StatusSnapshot::new(9)), Some('9'));
        assert_eq!(icon_label(StatusSnapshot::new(12)), Some('9'));

        let sink = StatusSink::new();
        assert_eq!(
            sink.render(StatusSnapshot::new(12)).unwrap(),
            sink.render(StatusSnapshot::new(9)).unwrap()
        );
    }

    #[test]
    fn test_oversized_icon_fails_allocation() {
        let sink = StatusSink::with_icon_size(u32::MAX);
        assert!(matches!(
            sink.render(StatusSnapshot::new(1)),
            Err(MonitorError::IconAllocation(_))
        ));
    }

    #[test]
    fn test_background_colors() {
        let sink = StatusSink::new();
        assert_eq!(sink.background(StatusSnapshot::new(1)).to_string(), "#90EE90");
        assert_eq!(sink.background(StatusSnapshot::IDLE).to_string(), "#EE9090");
    }

    #[test]
    fn test_describe_for_log() {
        let batch = ContactBatch::new(
            vec![
                Contact { id: 4, x: 10, y: 20 },
                Contact { id: 1, x: 30, y: 40 },
            ],
            0,
        );
        assert_eq!(
            describe_for_log(&batch),
            "---\nContact ID:4 Point:10,20\nContact ID:1 Point:30,40"
        );
        assert_eq!(describe_for_log(&ContactBatch::empty(0)), "---");
    }
}
