//! In-memory RGBA icon surface.

use std::convert::Infallible;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

use crate::error::MonitorError;

/// Edge length of the tray icon in pixels.
pub const ICON_SIZE: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn opaque(color: Rgb888) -> Self {
        Self {
            r: color.r(),
            g: color.g(),
            b: color.b(),
            a: 0xff,
        }
    }
}

/// Square RGBA image, row-major, transparent until drawn on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconImage {
    size: u32,
    pixels: Vec<Rgba>,
}

impl IconImage {
    /// Allocate a fully transparent surface. Fails only if the allocation does.
    pub fn transparent(size: u32) -> Result<Self, MonitorError> {
        let len = (size as usize)
            .checked_mul(size as usize)
            .unwrap_or(usize::MAX);
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)?;
        pixels.resize(len, Rgba::TRANSPARENT);
        Ok(Self { size, pixels })
    }

    pub fn width(&self) -> u32 {
        self.size
    }

    pub fn height(&self) -> u32 {
        self.size
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Flat RGBA8 bytes, the layout tray APIs expect.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }

    /// Character preview: `.` transparent, `#` white label, `o` any other fill.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.pixels.len() + self.size as usize);
        for row in self.pixels.chunks(self.size.max(1) as usize) {
            for p in row {
                let ch = match (p.a, p.r, p.g, p.b) {
                    (0, ..) => '.',
                    (_, 0xff, 0xff, 0xff) => '#',
                    _ => 'o',
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size as usize + x as usize
    }
}

impl DrawTarget for IconImage {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Ok((x, y)) = <(u32, u32)>::try_from(coord) {
                if x < self.size && y < self.size {
                    let idx = self.index(x, y);
                    self.pixels[idx] = Rgba::opaque(color);
                }
            }
        }
        Ok(())
    }
}

impl OriginDimensions for IconImage {
    fn size(&self) -> Size {
        Size::new(self.size, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_surface() {
        let img = IconImage::transparent(4).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.pixel(3, 3), Some(Rgba::TRANSPARENT));
        assert_eq!(img.pixel(4, 0), None);
        assert_eq!(img.to_rgba_bytes().len(), 4 * 4 * 4);
    }

    #[test]
    fn test_draw_clips_out_of_bounds() {
        let mut img = IconImage::transparent(2).unwrap();
        img.draw_iter([
            Pixel(Point::new(1, 0), Rgb888::RED),
            Pixel(Point::new(-1, 0), Rgb888::RED),
            Pixel(Point::new(2, 2), Rgb888::RED),
        ])
        .unwrap();

        assert_eq!(img.pixel(1, 0), Some(Rgba::opaque(Rgb888::RED)));
        assert_eq!(img.to_ascii(), ".o\n..\n");
    }
}
