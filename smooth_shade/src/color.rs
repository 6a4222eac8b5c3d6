// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client colors, color ranges, and the convergence test that terminates
//! subdivision.

use peniko::color::{AlphaColor, PremulRgba8, Srgb};

/// Maximum number of components a shading color space may carry.
pub const MAX_COLOR_COMPONENTS: usize = 8;

/// A color in the shading's source color space, one value per component.
///
/// Only the first [`ColorSpace::num_components`] entries are meaningful;
/// the rest stay zero.
///
/// [`ColorSpace::num_components`]: crate::color_space::ColorSpace::num_components
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ClientColor {
    /// The component values.
    pub components: [f32; MAX_COLOR_COMPONENTS],
}

impl ClientColor {
    /// Create a client color from a slice of component values.
    ///
    /// # Panics
    ///
    /// Panics if `values` has more than [`MAX_COLOR_COMPONENTS`] entries.
    pub fn new(values: &[f32]) -> Self {
        let mut components = [0.0; MAX_COLOR_COMPONENTS];
        components[..values.len()].copy_from_slice(values);
        Self { components }
    }
}

/// Whether a set of colors agrees to within the per-component tolerance.
///
/// Returns `true` iff, for every component, the spread `max - min` across
/// `colors` does not exceed `max_error` for that component. This is the
/// oracle that decides when a region is flat enough to paint with one
/// constant color.
pub fn colors_converge(colors: &[ClientColor], num_components: usize, max_error: &[f32]) -> bool {
    for ci in 0..num_components {
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for color in colors {
            let v = color.components[ci];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi - lo > max_error[ci] {
            return false;
        }
    }
    true
}

/// The estimated color range of a parameter region, tracked per component.
#[derive(Copy, Clone, Debug)]
pub struct ColorRange {
    min: [f32; MAX_COLOR_COMPONENTS],
    max: [f32; MAX_COLOR_COMPONENTS],
}

impl ColorRange {
    /// The range spanned by the four corner colors of a region, and whether
    /// its spread is within `max_error`.
    pub(crate) fn from_corners(
        cc: &[ClientColor; 4],
        num_components: usize,
        max_error: &[f32],
    ) -> (Self, bool) {
        let mut range = Self {
            min: [0.0; MAX_COLOR_COMPONENTS],
            max: [0.0; MAX_COLOR_COMPONENTS],
        };
        let mut small = true;
        for ci in 0..num_components {
            let mut lo = f32::INFINITY;
            let mut hi = f32::NEG_INFINITY;
            for color in cc {
                let v = color.components[ci];
                lo = lo.min(v);
                hi = hi.max(v);
            }
            range.min[ci] = lo;
            range.max[ci] = hi;
            small &= hi - lo <= max_error[ci];
        }
        (range, small)
    }

    /// Grow this range to also cover `other`; returns whether the union is
    /// still within `max_error`.
    pub(crate) fn unite(&mut self, other: &Self, num_components: usize, max_error: &[f32]) -> bool {
        let mut small = true;
        for ci in 0..num_components {
            self.min[ci] = self.min[ci].min(other.min[ci]);
            self.max[ci] = self.max[ci].max(other.max[ci]);
            small &= self.max[ci] - self.min[ci] <= max_error[ci];
        }
        small
    }

    /// The color halfway between the range's bounds.
    pub(crate) fn midpoint(&self, num_components: usize) -> ClientColor {
        let mut cc = ClientColor::default();
        for ci in 0..num_components {
            cc.components[ci] = (self.min[ci] + self.max[ci]) * 0.5;
        }
        cc
    }
}

/// A device-ready color in premultiplied sRGB, kept in both u8 and f32
/// form so devices can pick whichever representation they composite in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeviceColor {
    premul_u8: PremulRgba8,
    premul_f32: peniko::color::PremulColor<Srgb>,
}

impl DeviceColor {
    /// Create a device color from a straight-alpha color.
    pub fn from_alpha_color(color: AlphaColor<Srgb>) -> Self {
        Self::from_premul_color(color.premultiply())
    }

    /// Create a device color from a premultiplied color.
    pub fn from_premul_color(color: peniko::color::PremulColor<Srgb>) -> Self {
        Self {
            premul_u8: color.to_rgba8(),
            premul_f32: color,
        }
    }

    /// The color as premultiplied RGBA8.
    pub fn as_premul_rgba8(&self) -> PremulRgba8 {
        self.premul_u8
    }

    /// The color as premultiplied RGBA f32.
    pub fn as_premul_f32(&self) -> peniko::color::PremulColor<Srgb> {
        self.premul_f32
    }

    /// Whether the color is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.premul_f32.components[3] == 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(values: &[f32]) -> ClientColor {
        ClientColor::new(values)
    }

    #[test]
    fn two_colors_converge_within_tolerance() {
        let tol = [0.05; MAX_COLOR_COMPONENTS];
        let a = color(&[0.50, 0.20, 0.80]);
        let b = color(&[0.52, 0.24, 0.76]);
        assert!(colors_converge(&[a, b], 3, &tol));
        let c = color(&[0.50, 0.30, 0.80]);
        assert!(!colors_converge(&[a, c], 3, &tol));
    }

    #[test]
    fn convergence_checks_every_component() {
        let tol = [0.1; MAX_COLOR_COMPONENTS];
        // Components 0 and 1 are flat, component 2 is not.
        let colors = [
            color(&[0.1, 0.2, 0.0]),
            color(&[0.1, 0.2, 0.5]),
            color(&[0.1, 0.2, 0.2]),
            color(&[0.1, 0.2, 0.1]),
        ];
        assert!(!colors_converge(&colors, 3, &tol));
        assert!(colors_converge(&colors, 2, &tol));
    }

    #[test]
    fn corner_range_and_union() {
        let tol = [0.3; MAX_COLOR_COMPONENTS];
        let corners = [
            color(&[0.0]),
            color(&[0.2]),
            color(&[0.1]),
            color(&[0.25]),
        ];
        let (mut range, small) = ColorRange::from_corners(&corners, 1, &tol);
        assert!(small);
        assert_eq!(range.midpoint(1).components[0], 0.125);

        let other_corners = [
            color(&[0.5]),
            color(&[0.45]),
            color(&[0.5]),
            color(&[0.5]),
        ];
        let (other, _) = ColorRange::from_corners(&other_corners, 1, &tol);
        // The union spans 0.0..0.5, which exceeds the 0.3 tolerance.
        assert!(!range.unite(&other, 1, &tol));
        assert_eq!(range.midpoint(1).components[0], 0.25);
    }

    #[test]
    fn device_color_roundtrip() {
        let dc = DeviceColor::from_alpha_color(AlphaColor::new([1.0, 0.0, 0.0, 1.0]));
        let px = dc.as_premul_rgba8();
        assert_eq!((px.r, px.g, px.b, px.a), (255, 0, 0, 255));
        assert!(dc.is_opaque());
    }
}
