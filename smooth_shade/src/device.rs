// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The raster device the fill engines paint into.

use crate::color::DeviceColor;
use crate::kurbo::BezPath;
use crate::Result;
use core::fmt::Debug;

/// A raster output device.
///
/// The engines drive a device through two fill primitives, both taking
/// device-space geometry. Adjacent fills may touch or slightly overlap
/// along shared edges; devices must tolerate being handed the same
/// boundary pixels more than once.
pub trait RasterDevice: Debug {
    /// Device resolution in pixels per inch, horizontal and vertical.
    fn resolution(&self) -> (f64, f64);

    /// Number of distinguishable levels per color component.
    ///
    /// Bounds how finely colors are worth subdividing; see
    /// [`FillParams::smoothness`](crate::FillParams::smoothness).
    fn color_levels(&self) -> u32;

    /// Fill the pixel-aligned rectangle spanning `x..x + w`, `y..y + h`.
    fn fill_device_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: &DeviceColor,
    ) -> Result<()>;

    /// Fill a device-space path under the nonzero winding rule.
    fn fill_path(&mut self, path: &BezPath, color: &DeviceColor) -> Result<()>;
}
