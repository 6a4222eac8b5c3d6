// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color spaces: restricting client colors and remapping them to device
//! colors.

use crate::color::{ClientColor, DeviceColor};
use crate::Result;
use core::fmt::Debug;
use peniko::color::{AlphaColor, Srgb};

/// The space a shading's client colors live in.
///
/// The engine calls [`restrict_color`](Self::restrict_color) followed by
/// [`remap_color`](Self::remap_color) exactly once per constant-color fill,
/// and uses [`component_range`](Self::component_range) to scale the color
/// tolerance that terminates subdivision.
pub trait ColorSpace: Debug {
    /// Number of color components, between 1 and
    /// [`MAX_COLOR_COMPONENTS`](crate::color::MAX_COLOR_COMPONENTS).
    fn num_components(&self) -> usize;

    /// Value range of component `i`.
    fn component_range(&self, _i: usize) -> (f32, f32) {
        (0.0, 1.0)
    }

    /// Clamp a client color into the valid range of this space.
    fn restrict_color(&self, color: &mut ClientColor) {
        for ci in 0..self.num_components() {
            let (lo, hi) = self.component_range(ci);
            color.components[ci] = color.components[ci].clamp(lo, hi);
        }
    }

    /// Map a client color to a device-ready color.
    fn remap_color(&self, color: &ClientColor) -> Result<DeviceColor>;
}

/// The one-component additive gray space.
#[derive(Copy, Clone, Debug, Default)]
pub struct DeviceGray;

impl ColorSpace for DeviceGray {
    fn num_components(&self) -> usize {
        1
    }

    fn remap_color(&self, color: &ClientColor) -> Result<DeviceColor> {
        let g = color.components[0];
        Ok(DeviceColor::from_alpha_color(AlphaColor::<Srgb>::new([
            g, g, g, 1.0,
        ])))
    }
}

/// The three-component additive RGB space.
#[derive(Copy, Clone, Debug, Default)]
pub struct DeviceRgb;

impl ColorSpace for DeviceRgb {
    fn num_components(&self) -> usize {
        3
    }

    fn remap_color(&self, color: &ClientColor) -> Result<DeviceColor> {
        let [r, g, b] = [
            color.components[0],
            color.components[1],
            color.components[2],
        ];
        Ok(DeviceColor::from_alpha_color(AlphaColor::<Srgb>::new([
            r, g, b, 1.0,
        ])))
    }
}

/// The four-component subtractive CMYK space, converted to RGB with the
/// usual naive formula.
#[derive(Copy, Clone, Debug, Default)]
pub struct DeviceCmyk;

impl ColorSpace for DeviceCmyk {
    fn num_components(&self) -> usize {
        4
    }

    fn remap_color(&self, color: &ClientColor) -> Result<DeviceColor> {
        let [c, m, y, k] = [
            color.components[0],
            color.components[1],
            color.components[2],
            color.components[3],
        ];
        let r = (1.0 - c) * (1.0 - k);
        let g = (1.0 - m) * (1.0 - k);
        let b = (1.0 - y) * (1.0 - k);
        Ok(DeviceColor::from_alpha_color(AlphaColor::<Srgb>::new([
            r, g, b, 1.0,
        ])))
    }
}
