// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A pixmap-backed reference device.

use crate::color::DeviceColor;
use crate::device::RasterDevice;
use crate::kurbo::{BezPath, Point, Shape};
use crate::Result;
use peniko::color::PremulRgba8;

/// A pixmap of premultiplied RGBA8 values.
///
/// Doubles as the crate's reference [`RasterDevice`]: rectangles are
/// written directly, paths are filled by sampling the winding number at
/// pixel centers. That is slow compared to a real rasterizer, but exact
/// enough to validate fills pixel by pixel.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u16,
    height: u16,
    buf: Vec<PremulRgba8>,
}

impl Pixmap {
    /// Create a pixmap with the given size in pixels, initialized to
    /// transparent black.
    pub fn new(width: u16, height: u16) -> Self {
        let clear = PremulRgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        };
        let buf = vec![clear; usize::from(width) * usize::from(height)];
        Self { width, height, buf }
    }

    /// Width of the pixmap in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height of the pixmap in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The pixels in row-major order.
    pub fn data(&self) -> &[PremulRgba8] {
        &self.buf
    }

    /// The pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the location is out of bounds.
    pub fn sample(&self, x: u16, y: u16) -> PremulRgba8 {
        self.buf[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Write the pixmap as a PNG.
    ///
    /// Pixels are written as-is, i.e. still premultiplied.
    #[cfg(feature = "png")]
    pub fn write_png<W: std::io::Write>(&self, writer: W) -> core::result::Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(writer, u32::from(self.width), u32::from(self.height));
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png_writer = encoder.write_header()?;
        let data = self
            .buf
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect::<Vec<_>>();
        png_writer.write_image_data(&data)?;
        png_writer.finish()
    }
}

impl RasterDevice for Pixmap {
    fn resolution(&self) -> (f64, f64) {
        (72.0, 72.0)
    }

    fn color_levels(&self) -> u32 {
        256
    }

    fn fill_device_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: &DeviceColor,
    ) -> Result<()> {
        let px = color.as_premul_rgba8();
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x.saturating_add(w)).clamp(0, i32::from(self.width)) as usize;
        let y1 = (y.saturating_add(h)).clamp(0, i32::from(self.height)) as usize;
        for row in y0..y1 {
            let start = row * usize::from(self.width);
            self.buf[start + x0..start + x1].fill(px);
        }
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, color: &DeviceColor) -> Result<()> {
        let px = color.as_premul_rgba8();
        let bbox = path.bounding_box();
        let x0 = (bbox.x0.floor().max(0.0) as usize).min(usize::from(self.width));
        let y0 = (bbox.y0.floor().max(0.0) as usize).min(usize::from(self.height));
        let x1 = ((bbox.x1.ceil().max(0.0)) as usize).min(usize::from(self.width));
        let y1 = ((bbox.y1.ceil().max(0.0)) as usize).min(usize::from(self.height));
        for row in y0..y1 {
            for col in x0..x1 {
                let center = Point::new(col as f64 + 0.5, row as f64 + 0.5);
                if path.winding(center) != 0 {
                    self.buf[row * usize::from(self.width) + col] = px;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::color::{palette::css, AlphaColor};

    fn red() -> DeviceColor {
        DeviceColor::from_alpha_color(css::RED)
    }

    #[test]
    fn rectangle_fill_is_clipped_to_bounds() {
        let mut pixmap = Pixmap::new(4, 4);
        pixmap.fill_device_rectangle(-2, 1, 4, 10, &red()).unwrap();
        assert_eq!(pixmap.sample(0, 0).a, 0);
        assert_eq!(pixmap.sample(1, 1).r, 255);
        assert_eq!(pixmap.sample(2, 1).a, 0);
    }

    #[test]
    fn path_fill_samples_pixel_centers() {
        let mut pixmap = Pixmap::new(8, 8);
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((8.0, 0.0));
        path.line_to((0.0, 8.0));
        path.close_path();
        let color = DeviceColor::from_alpha_color(AlphaColor::new([0.0, 0.0, 1.0, 1.0]));
        pixmap.fill_path(&path, &color).unwrap();
        // Above the diagonal is filled, below is not.
        assert_eq!(pixmap.sample(1, 1).b, 255);
        assert_eq!(pixmap.sample(7, 7).a, 0);
    }
}
