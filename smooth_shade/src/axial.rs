// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axial shading: adaptive stripe subdivision along a gradient axis.

use crate::color::{colors_converge, ClientColor};
use crate::fill::{is_orthogonal, transform_distance, FillState};
use crate::function::{Monotonicity, ShadingFunction};
use crate::kurbo::{Affine, BezPath, Point, Rect, Vec2};
use crate::shading::{Shading, ShadingKind};
use crate::Result;
use log::{debug, trace, warn};

/// Maximum interval subdivision depth, shared with the radial engine.
pub(crate) const MAX_DEPTH: u32 = 16;

/// Stripe/annulus subdivision state. `t` is normalized over `[0, 1]`; the
/// function is evaluated at `t·dd + d0`.
struct AxialFill<'a, 'b> {
    state: &'a mut FillState<'b>,
    function: &'a dyn ShadingFunction,
    /// Axis origin in user space.
    origin: Point,
    /// Axis vector in user space.
    delta: Vec2,
    /// Device-space length of the axis; scales stripe widths to pixels.
    length: f64,
    d0: f64,
    dd: f64,
    /// Clip rectangle in user space, bounding stripe quadrilaterals.
    rect: Rect,
    orthogonal: bool,
}

pub(crate) fn fill(state: &mut FillState<'_>, shading: &Shading<'_>, rect: Rect) -> Result<()> {
    let ShadingKind::Axial {
        start,
        end,
        domain,
        extend,
    } = shading.kind
    else {
        unreachable!("dispatched axial fill on a different shading kind")
    };
    debug!("axial shading fill over {rect:?}");
    let delta = end - start;
    let d0 = domain[0];
    let dd = domain[1] - domain[0];

    // A frame in which the axis runs from (0, 0) to (0, 1): inverse-mapping
    // the clip rectangle yields the parameter range in y.
    let frame = Affine::new([delta.y, -delta.x, delta.x, delta.y, start.x, start.y]);
    if frame.determinant().abs() < 1e-12 {
        warn!("axial shading with a degenerate axis paints nothing");
        return Ok(());
    }
    let t_rect = frame.inverse().transform_rect_bbox(rect);
    let t0 = t_rect.y0.max(0.0);
    let t1 = t_rect.y1.min(1.0);

    let mut engine = AxialFill {
        orthogonal: is_orthogonal(&state.ctm),
        length: transform_distance(&state.ctm, delta).hypot(),
        state,
        function: shading.function,
        origin: start,
        delta,
        d0,
        dd,
        rect,
    };

    // Boundary colors at the (clamped) ends of the covered interval; the
    // extension stripes reuse them.
    let mut cc = [ClientColor::default(); 2];
    engine
        .function
        .evaluate(&[t0.clamp(0.0, 1.0) * dd + d0], &mut cc[0])?;
    engine
        .function
        .evaluate(&[t1.clamp(0.0, 1.0) * dd + d0], &mut cc[1])?;

    if t0 < t1 {
        engine.fill_interval(t0, t1, cc[0], cc[1], 1)?;
    }
    if extend[0] && t0 > t_rect.y0 {
        engine.fill_stripe(&cc[0], t_rect.y0, t0)?;
    }
    if extend[1] && t1 < t_rect.y1 {
        engine.fill_stripe(&cc[1], t1, t_rect.y1)?;
    }
    Ok(())
}

impl AxialFill<'_, '_> {
    /// Paint `[t0, t1]`, subdividing until the function is monotonic and
    /// the endpoint colors converge, the stripe is under a pixel wide, or
    /// the depth bound is reached.
    fn fill_interval(
        &mut self,
        t0: f64,
        t1: f64,
        c0: ClientColor,
        c1: ClientColor,
        depth: u32,
    ) -> Result<()> {
        let settled = self
            .function
            .monotonicity(t0 * self.dd + self.d0, t1 * self.dd + self.d0)
            == Monotonicity::Monotonic
            && colors_converge(&[c0, c1], self.state.num_components, &self.state.cc_max_error);
        if settled || self.length * (t1 - t0) <= 1.0 || depth >= MAX_DEPTH {
            return self.fill_stripe(&c0, t0, t1);
        }
        let tm = (t0 + t1) * 0.5;
        trace!("subdividing stripe at t = {tm}");
        let mut cm = ClientColor::default();
        self.function.evaluate(&[tm * self.dd + self.d0], &mut cm)?;
        self.fill_interval(t0, tm, c0, cm, depth + 1)?;
        self.fill_interval(tm, t1, cm, c1, depth + 1)
    }

    /// Paint one stripe: the band of the clip rectangle between the axis
    /// parameters `t0` and `t1`, filled with `cc`.
    fn fill_stripe(&mut self, cc: &ClientColor, t0: f64, t1: f64) -> Result<()> {
        let color = self.state.remap(*cc)?;
        let ctm = self.state.ctm;
        let p0 = self.origin + self.delta * t0;
        let p1 = self.origin + self.delta * t1;
        if p0.x == p1.x && self.orthogonal {
            // The axis is vertical in user space, so the stripe is a
            // full-width horizontal band of the clip rectangle, and it
            // stays a rectangle on the device.
            let a = ctm * Point::new(self.rect.x0, p0.y);
            let b = ctm * Point::new(self.rect.x1, p1.y);
            self.state.fill_device_rectangle(a, b, &color)
        } else if p0.y == p1.y && self.orthogonal {
            let a = ctm * Point::new(p0.x, self.rect.y0);
            let b = ctm * Point::new(p1.x, self.rect.y1);
            self.state.fill_device_rectangle(a, b, &color)
        } else {
            // General case: extend the stripe's boundary lines to the clip
            // rectangle's sides and fill the quadrilateral. Pick the sides
            // to intersect so the divisor stays away from zero.
            let mut pts = [Point::ZERO; 4];
            if self.delta.x.abs() < self.delta.y.abs() {
                let slope = self.delta.x / self.delta.y;
                pts[0] = Point::new(self.rect.x0, p0.y - slope * (self.rect.x0 - p0.x));
                pts[1] = Point::new(self.rect.x0, p1.y - slope * (self.rect.x0 - p1.x));
                pts[2] = Point::new(self.rect.x1, p1.y - slope * (self.rect.x1 - p1.x));
                pts[3] = Point::new(self.rect.x1, p0.y - slope * (self.rect.x1 - p0.x));
            } else {
                let slope = self.delta.y / self.delta.x;
                pts[0] = Point::new(p0.x - slope * (self.rect.y0 - p0.y), self.rect.y0);
                pts[1] = Point::new(p1.x - slope * (self.rect.y0 - p1.y), self.rect.y0);
                pts[2] = Point::new(p1.x - slope * (self.rect.y1 - p1.y), self.rect.y1);
                pts[3] = Point::new(p0.x - slope * (self.rect.y1 - p0.y), self.rect.y1);
            }
            let mut path = BezPath::new();
            path.move_to(ctm * pts[0]);
            path.line_to(ctm * pts[1]);
            path.line_to(ctm * pts[2]);
            path.line_to(ctm * pts[3]);
            path.close_path();
            self.state.device.fill_path(&path, &color)
        }
    }
}
