// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shading descriptors.

use crate::color_space::ColorSpace;
use crate::device::RasterDevice;
use crate::fill::{fill_shading, FillParams};
use crate::function::ShadingFunction;
use crate::kurbo::{Affine, Point, Rect};
use crate::Result;

/// The geometry of a shading, selecting which fill engine renders it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShadingKind {
    /// The color varies over a 2-D parameter rectangle mapped into user
    /// space by `matrix`.
    FunctionBased {
        /// Parameter ranges, `[x0, x1, y0, y1]`.
        domain: [f64; 4],
        /// Parameter space → user space.
        matrix: Affine,
    },
    /// The color varies along the axis `start → end`; every line
    /// perpendicular to the axis has one color.
    Axial {
        /// Axis starting point in user space.
        start: Point,
        /// Axis end point in user space.
        end: Point,
        /// Function-domain interval mapped onto the axis.
        domain: [f64; 2],
        /// Whether to paint the boundary color past `start` / past `end`,
        /// out to the clip rectangle.
        extend: [bool; 2],
    },
    /// The color varies between two circles whose center and radius
    /// interpolate linearly.
    Radial {
        /// Center of the circle at the start of the domain.
        start_center: Point,
        /// Radius of the circle at the start of the domain.
        start_radius: f64,
        /// Center of the circle at the end of the domain.
        end_center: Point,
        /// Radius of the circle at the end of the domain.
        end_radius: f64,
        /// Function-domain interval mapped onto the circle family.
        domain: [f64; 2],
        /// Whether to extend past the start / end circle.
        extend: [bool; 2],
    },
}

/// A smooth shading: a color function over a parameter domain, plus the
/// geometry describing how parameters map onto the page.
#[derive(Debug)]
pub struct Shading<'a> {
    /// The space the function's output colors live in.
    pub color_space: &'a dyn ColorSpace,
    /// The color-producing function.
    pub function: &'a dyn ShadingFunction,
    /// User-space bound of the shading, used to size radial extension
    /// geometry. Falls back to the clip rectangle when absent.
    pub bbox: Option<Rect>,
    /// The shading geometry.
    pub kind: ShadingKind,
}

impl Shading<'_> {
    /// Fill `rect` with this shading on `device`.
    ///
    /// Equivalent to [`fill_shading`].
    pub fn fill_rectangle(
        &self,
        rect: Rect,
        device: &mut dyn RasterDevice,
        params: &FillParams,
    ) -> Result<()> {
        fill_shading(self, rect, device, params)
    }
}
