// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fill state and the shading dispatcher.

use crate::color::{ClientColor, DeviceColor, MAX_COLOR_COMPONENTS};
use crate::color_space::ColorSpace;
use crate::device::RasterDevice;
use crate::kurbo::{Affine, Point, Rect, Vec2};
use crate::shading::{Shading, ShadingKind};
use crate::{axial, function_based, radial, Result};

/// One ulp of 12-bit-fraction fixed-point device coordinates.
const FIXED_EPSILON: f64 = 1.0 / 4096.0;

/// Caller-supplied parameters for a fill call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FillParams {
    /// Current transform, user space → device space.
    pub ctm: Affine,
    /// Maximum allowed color deviation per (range-normalized) component
    /// before a region may be painted with one constant color.
    ///
    /// Floor-bounded at fill time by the device's color precision: there
    /// is no point chasing smoothness the device cannot represent.
    pub smoothness: f32,
    /// Half-width of the band a device rectangle is expanded by before
    /// pixel rounding, in device pixels per axis.
    pub fill_adjust: Vec2,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            ctm: Affine::IDENTITY,
            smoothness: 0.02,
            fill_adjust: Vec2::new(0.3, 0.3),
        }
    }
}

/// State shared by the engines for the duration of one fill call.
///
/// Owns nothing: the device, color space, and function are borrowed from
/// the caller, and everything here is dropped when the fill returns.
pub(crate) struct FillState<'a> {
    pub(crate) device: &'a mut dyn RasterDevice,
    pub(crate) color_space: &'a dyn ColorSpace,
    pub(crate) ctm: Affine,
    pub(crate) num_components: usize,
    /// Per-component color tolerance. Computed once per fill call and
    /// immutable for its duration.
    pub(crate) cc_max_error: [f32; MAX_COLOR_COMPONENTS],
    fill_adjust: Vec2,
}

impl<'a> FillState<'a> {
    pub(crate) fn new(
        shading: &Shading<'a>,
        device: &'a mut dyn RasterDevice,
        params: &FillParams,
    ) -> Self {
        let num_components = shading.color_space.num_components();
        let levels = device.color_levels().max(2);
        let max_error = params.smoothness.max(1.0 / levels as f32);
        let mut cc_max_error = [0.0; MAX_COLOR_COMPONENTS];
        for (ci, err) in cc_max_error.iter_mut().enumerate().take(num_components) {
            let (lo, hi) = shading.color_space.component_range(ci);
            *err = max_error * (hi - lo);
        }
        Self {
            device,
            color_space: shading.color_space,
            ctm: params.ctm,
            num_components,
            cc_max_error,
            fill_adjust: params.fill_adjust,
        }
    }

    /// Remap a client color through the color space, clamping it first.
    pub(crate) fn remap(&self, mut cc: ClientColor) -> Result<DeviceColor> {
        self.color_space.restrict_color(&mut cc);
        self.color_space.remap_color(&cc)
    }

    /// Fill a user-space rectangle that is also a device-space rectangle.
    ///
    /// `p0` and `p1` are opposite corners, already in device space. The
    /// rectangle is expanded by the fill adjustment and rounded to whole
    /// pixels, so abutting fills share edges without gaps.
    pub(crate) fn fill_device_rectangle(
        &mut self,
        p0: Point,
        p1: Point,
        color: &DeviceColor,
    ) -> Result<()> {
        let (mut xmin, xmax) = ordered(p0.x, p1.x);
        let (mut ymin, ymax) = ordered(p0.y, p1.y);
        // With an adjustment of exactly half a pixel, nudge the low edge so
        // abutting rectangles don't both claim the boundary column.
        xmin -= self.fill_adjust.x;
        if self.fill_adjust.x == 0.5 {
            xmin += FIXED_EPSILON;
        }
        ymin -= self.fill_adjust.y;
        if self.fill_adjust.y == 0.5 {
            ymin += FIXED_EPSILON;
        }
        let x = pixel_round(xmin);
        let y = pixel_round(ymin);
        let w = pixel_round(xmax + self.fill_adjust.x) - x;
        let h = pixel_round(ymax + self.fill_adjust.y) - y;
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        self.device.fill_device_rectangle(x, y, w, h, color)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Round a device coordinate to the nearest pixel index.
fn pixel_round(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Whether the transform maps axis-aligned rectangles to axis-aligned
/// rectangles: a pure scale/flip, possibly with the axes swapped.
pub(crate) fn is_orthogonal(m: &Affine) -> bool {
    let [a, b, c, d, _, _] = m.as_coeffs();
    (b == 0.0 && c == 0.0) || (a == 0.0 && d == 0.0)
}

/// Apply only the linear part of `m` to a distance vector.
pub(crate) fn transform_distance(m: &Affine, v: Vec2) -> Vec2 {
    let [a, b, c, d, _, _] = m.as_coeffs();
    Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
}

/// Fill `rect` with `shading`.
///
/// `rect` is in user space; `params.ctm` maps user space to the device.
/// The painted region is the part of `rect` covered by the shading's
/// domain, plus any requested extension regions. Painting is incremental:
/// if a collaborator fails mid-fill, the error is returned immediately and
/// regions painted so far stay painted.
pub fn fill_shading(
    shading: &Shading<'_>,
    rect: Rect,
    device: &mut dyn RasterDevice,
    params: &FillParams,
) -> Result<()> {
    let mut state = FillState::new(shading, device, params);
    match shading.kind {
        ShadingKind::FunctionBased { .. } => function_based::fill(&mut state, shading, rect),
        ShadingKind::Axial { .. } => axial::fill(&mut state, shading, rect),
        ShadingKind::Radial { .. } => radial::fill(&mut state, shading, rect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_space::DeviceRgb;
    use crate::function::ExponentialFunction;
    use crate::pixmap::Pixmap;

    #[test]
    fn pixel_rounding_partitions_shared_edges() {
        // Two rectangles that share the edge x = 3.125 must cover every
        // column between them at least once and never leave a gap.
        assert_eq!(pixel_round(3.125 + 0.3), 3);
        assert_eq!(pixel_round(3.125 - 0.3), 3);
        // An edge near the pixel center overlaps by one column instead.
        assert_eq!(pixel_round(3.5 + 0.3), 4);
        assert_eq!(pixel_round(3.5 - 0.3), 3);
    }

    #[test]
    fn orthogonality() {
        assert!(is_orthogonal(&Affine::IDENTITY));
        assert!(is_orthogonal(&Affine::scale_non_uniform(2.0, -3.0)));
        // A 90° rotation swaps the axes but keeps rectangles rectangular.
        assert!(is_orthogonal(&Affine::new([0.0, 1.0, -1.0, 0.0, 0.0, 0.0])));
        assert!(!is_orthogonal(&Affine::rotate(0.3)));
        assert!(!is_orthogonal(&Affine::skew(0.5, 0.0)));
    }

    #[test]
    fn distance_transform_ignores_translation() {
        let m = Affine::translate((100.0, 200.0)) * Affine::scale(2.0);
        let v = transform_distance(&m, Vec2::new(3.0, 4.0));
        assert_eq!(v, Vec2::new(6.0, 8.0));
    }

    #[test]
    fn tolerance_is_floored_by_device_precision() {
        let white = ClientColor::new(&[1.0, 1.0, 1.0]);
        let function = ExponentialFunction::new([0.0, 1.0], white, white, 1.0, 3);
        let shading = Shading {
            color_space: &DeviceRgb,
            function: &function,
            bbox: None,
            kind: ShadingKind::Axial {
                start: Point::ZERO,
                end: Point::new(1.0, 0.0),
                domain: [0.0, 1.0],
                extend: [false, false],
            },
        };
        let mut device = Pixmap::new(1, 1);
        let params = FillParams {
            smoothness: 0.0,
            ..Default::default()
        };
        let state = FillState::new(&shading, &mut device, &params);
        assert_eq!(state.num_components, 3);
        // A 256-level device cannot do better than 1/256 per component.
        assert_eq!(state.cc_max_error[0], 1.0 / 256.0);
        assert_eq!(state.cc_max_error[2], 1.0 / 256.0);
        assert_eq!(state.cc_max_error[3], 0.0);
    }
}
