// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Function-based shading: adaptive quadrant subdivision of a 2-D
//! parameter rectangle.

use crate::color::{ClientColor, ColorRange};
use crate::fill::{is_orthogonal, transform_distance, FillState};
use crate::function::ShadingFunction;
use crate::kurbo::{Affine, BezPath, Point, Rect, Vec2};
use crate::shading::{Shading, ShadingKind};
use crate::Result;
use log::{debug, trace, warn};

/// Maximum subdivision depth: enough for 16 halvings along each axis.
const MAX_DEPTH: u32 = 32;

/// Device-space edge length below which a region cannot meaningfully
/// straddle more than one pixel.
const MIN_SIZE: f64 = 0.7;

/// Footprint below which a region is too small to hide a color extreme
/// between its corners, in points.
const MIN_EXTREME_DIST: f64 = 4.0;

/// Outcome of visiting one parameter region.
enum RegionFill {
    /// The region (including all descendants) has been flushed to the
    /// device.
    Painted,
    /// Nothing was painted; an ancestor may still merge this range and
    /// flatten a larger region in one fill.
    Deferred(ColorRange),
}

struct FbFill<'a, 'b> {
    state: &'a mut FillState<'b>,
    function: &'a dyn ShadingFunction,
    /// Parameter space → device space.
    ptm: Affine,
    orthogonal: bool,
    /// Minimum device footprint of a region that could hold a color
    /// extreme, per axis.
    min_extreme: Vec2,
}

pub(crate) fn fill(state: &mut FillState<'_>, shading: &Shading<'_>, rect: Rect) -> Result<()> {
    let ShadingKind::FunctionBased { domain, matrix } = shading.kind else {
        unreachable!("dispatched function-based fill on a different shading kind")
    };
    debug!("function-based shading fill over {rect:?}");
    if matrix.determinant().abs() < 1e-12 {
        warn!("function-based shading with a singular matrix paints nothing");
        return Ok(());
    }
    let ptm = state.ctm * matrix;

    // Parameter ranges covered by the clip rectangle.
    let pbox = matrix.inverse().transform_rect_bbox(rect);
    let x0 = pbox.x0.max(domain[0]);
    let x1 = pbox.x1.min(domain[1]);
    let y0 = pbox.y0.max(domain[2]);
    let y1 = pbox.y1.min(domain[3]);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let (res_x, res_y) = state.device.resolution();
    let min_extreme = Vec2::new(
        (MIN_EXTREME_DIST * res_x / 72.0).max(MIN_SIZE),
        (MIN_EXTREME_DIST * res_y / 72.0).max(MIN_SIZE),
    );
    let mut engine = FbFill {
        orthogonal: is_orthogonal(&ptm),
        state,
        function: shading.function,
        ptm,
        min_extreme,
    };

    // Corner colors, indexed row-major: [x0y0, x1y0, x0y1, x1y1].
    let mut cc = [ClientColor::default(); 4];
    for yi in 0..2 {
        for xi in 0..2 {
            let v = [
                if xi == 0 { x0 } else { x1 },
                if yi == 0 { y0 } else { y1 },
            ];
            engine.function.evaluate(&v, &mut cc[yi * 2 + xi])?;
        }
    }
    let region = Rect::new(x0, y0, x1, y1);
    match engine.fill_region(region, cc, 0)? {
        RegionFill::Painted => Ok(()),
        RegionFill::Deferred(range) => engine.flush(region, &range),
    }
}

impl FbFill<'_, '_> {
    fn fill_region(&mut self, region: Rect, cc: [ClientColor; 4], depth: u32) -> Result<RegionFill> {
        // Device-space footprint of the region's two edges.
        let p = transform_distance(&self.ptm, Vec2::new(region.width(), 0.0));
        let q = transform_distance(&self.ptm, Vec2::new(0.0, region.height()));
        let size_x = p.hypot();
        let size_y = q.hypot();
        let single_pixel = size_x < MIN_SIZE && size_y < MIN_SIZE;
        let single_extreme = p.x.abs() + q.x.abs() < self.min_extreme.x
            && p.y.abs() + q.y.abs() < self.min_extreme.y;

        if single_pixel || single_extreme || depth >= MAX_DEPTH - 1 {
            let (range, small) =
                ColorRange::from_corners(&cc, self.state.num_components, &self.state.cc_max_error);
            // A too-small or depth-capped region terminates unconditionally;
            // a single-extreme region terminates once its corners converge.
            if single_pixel || depth >= MAX_DEPTH - 1 || small {
                return Ok(RegionFill::Deferred(range));
            }
        }

        let divide_x = size_x > size_y;
        let (left, right) = self.split(region, &cc, divide_x)?;
        let l = self.fill_region(left.0, left.1, depth + 1)?;
        let r = self.fill_region(right.0, right.1, depth + 1)?;
        match (l, r) {
            (RegionFill::Painted, RegionFill::Painted) => Ok(RegionFill::Painted),
            (RegionFill::Painted, RegionFill::Deferred(range)) => {
                self.flush(right.0, &range)?;
                Ok(RegionFill::Painted)
            }
            (RegionFill::Deferred(range), RegionFill::Painted) => {
                self.flush(left.0, &range)?;
                Ok(RegionFill::Painted)
            }
            (RegionFill::Deferred(l_range), RegionFill::Deferred(r_range)) => {
                let mut union = l_range;
                if union.unite(&r_range, self.state.num_components, &self.state.cc_max_error) {
                    // Still within tolerance; let an ancestor flatten it.
                    Ok(RegionFill::Deferred(union))
                } else {
                    // The union spreads too far; each half keeps its own
                    // constant color.
                    self.flush(right.0, &r_range)?;
                    self.flush(left.0, &l_range)?;
                    Ok(RegionFill::Painted)
                }
            }
        }
    }

    /// Split the region in half along the chosen axis, evaluating the two
    /// new corner colors and reusing the corners both halves share.
    #[allow(clippy::type_complexity)]
    fn split(
        &mut self,
        region: Rect,
        cc: &[ClientColor; 4],
        divide_x: bool,
    ) -> Result<((Rect, [ClientColor; 4]), (Rect, [ClientColor; 4]))> {
        let mut m0 = ClientColor::default();
        let mut m1 = ClientColor::default();
        if divide_x {
            let xm = (region.x0 + region.x1) * 0.5;
            trace!("dividing at x = {xm}");
            self.function.evaluate(&[xm, region.y0], &mut m0)?;
            self.function.evaluate(&[xm, region.y1], &mut m1)?;
            let left = Rect::new(region.x0, region.y0, xm, region.y1);
            let right = Rect::new(xm, region.y0, region.x1, region.y1);
            Ok((
                (left, [cc[0], m0, cc[2], m1]),
                (right, [m0, cc[1], m1, cc[3]]),
            ))
        } else {
            let ym = (region.y0 + region.y1) * 0.5;
            trace!("dividing at y = {ym}");
            self.function.evaluate(&[region.x0, ym], &mut m0)?;
            self.function.evaluate(&[region.x1, ym], &mut m1)?;
            let lower = Rect::new(region.x0, region.y0, region.x1, ym);
            let upper = Rect::new(region.x0, ym, region.x1, region.y1);
            Ok((
                (lower, [cc[0], cc[1], m0, m1]),
                (upper, [m0, m1, cc[2], cc[3]]),
            ))
        }
    }

    /// Paint a region with the midpoint of its color range.
    fn flush(&mut self, region: Rect, range: &ColorRange) -> Result<()> {
        let cc = range.midpoint(self.state.num_components);
        let color = self.state.remap(cc)?;
        let p0 = self.ptm * Point::new(region.x0, region.y0);
        let p2 = self.ptm * Point::new(region.x1, region.y1);
        if self.orthogonal {
            self.state.fill_device_rectangle(p0, p2, &color)
        } else {
            let p1 = self.ptm * Point::new(region.x1, region.y0);
            let p3 = self.ptm * Point::new(region.x0, region.y1);
            let mut path = BezPath::new();
            path.move_to(p0);
            path.line_to(p1);
            path.line_to(p2);
            path.line_to(p3);
            path.close_path();
            self.state.device.fill_path(&path, &color)
        }
    }
}
