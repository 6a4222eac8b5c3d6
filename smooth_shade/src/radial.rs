// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radial shading: adaptive annulus subdivision between two interpolated
//! circles, with analytic cone/bar geometry for the extension regions.

use crate::axial::MAX_DEPTH;
use crate::color::{colors_converge, ClientColor};
use crate::fill::{transform_distance, FillState};
use crate::function::{Monotonicity, ShadingFunction};
use crate::kurbo::{BezPath, Circle, Point, Rect, Shape, Vec2};
use crate::shading::{Shading, ShadingKind};
use crate::Result;
use log::{debug, trace};

/// Flattening tolerance for circle paths, in device pixels.
const ARC_TOLERANCE: f64 = 0.1;

struct RadialFill<'a, 'b> {
    state: &'a mut FillState<'b>,
    function: &'a dyn ShadingFunction,
    /// Center of the start circle in user space.
    center: Point,
    /// Center travel from the start circle to the end circle.
    delta: Vec2,
    /// Radius of the start circle.
    radius: f64,
    /// Radius growth from the start circle to the end circle.
    dr: f64,
    /// Conservative device-space annulus width at full parameter span:
    /// center travel plus radius growth.
    width: f64,
    d0: f64,
    dd: f64,
}

pub(crate) fn fill(state: &mut FillState<'_>, shading: &Shading<'_>, rect: Rect) -> Result<()> {
    let ShadingKind::Radial {
        start_center,
        start_radius,
        end_center,
        end_radius,
        domain,
        extend,
    } = shading.kind
    else {
        unreachable!("dispatched radial fill on a different shading kind")
    };
    debug!("radial shading fill over {rect:?}");
    let delta = end_center - start_center;
    let dr = end_radius - start_radius;
    let d0 = domain[0];
    let dd = domain[1] - domain[0];
    let dist = delta.hypot();

    let mut cc = [ClientColor::default(); 2];
    shading.function.evaluate(&[domain[0]], &mut cc[0])?;
    shading.function.evaluate(&[domain[1]], &mut cc[1])?;

    // Extension geometry must outrun every corner of the clip; twice the
    // bounding box diagonal always does.
    let ext_bounds = shading.bbox.unwrap_or(rect);
    let max_ext = 2.0 * Vec2::new(ext_bounds.width(), ext_bounds.height()).hypot();

    let mut engine = RadialFill {
        width: transform_distance(&state.ctm, delta).hypot()
            + transform_distance(&state.ctm, Vec2::new(dr, 0.0)).hypot(),
        state,
        function: shading.function,
        center: start_center,
        delta,
        radius: start_radius,
        dr,
        d0,
        dd,
    };

    if extend[0] {
        engine.extend_start(
            &cc[0],
            start_center,
            start_radius,
            end_center,
            end_radius,
            dist,
            max_ext,
            rect,
        )?;
    }
    engine.fill_interval(0.0, 1.0, cc[0], cc[1], 1)?;
    if extend[1] {
        engine.extend_end(
            &cc[1],
            start_center,
            start_radius,
            end_center,
            end_radius,
            dist,
            max_ext,
            rect,
        )?;
    }
    Ok(())
}

impl RadialFill<'_, '_> {
    /// Paint `[t0, t1]`, subdividing under the same criteria as the axial
    /// engine but measuring annulus width instead of stripe width.
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
        if settled || self.width * (t1 - t0) <= 1.0 || depth >= MAX_DEPTH {
            return self.fill_annulus(
                &c0,
                t0,
                t1,
                self.radius + self.dr * t0,
                self.radius + self.dr * t1,
            );
        }
        let tm = (t0 + t1) * 0.5;
        trace!("subdividing annulus at t = {tm}");
        let mut cm = ClientColor::default();
        self.function.evaluate(&[tm * self.dd + self.d0], &mut cm)?;
        self.fill_interval(t0, tm, c0, cm, depth + 1)?;
        self.fill_interval(tm, t1, cm, c1, depth + 1)
    }

    /// Fill the ring between the circles at `t0` and `t1` as one path: the
    /// circle at `t0` traced forward and the circle at `t1` traced
    /// backward, so a nonzero fill paints exactly the enclosed ring.
    fn fill_annulus(&mut self, cc: &ClientColor, t0: f64, t1: f64, r0: f64, r1: f64) -> Result<()> {
        let color = self.state.remap(*cc)?;
        let ctm = self.state.ctm;
        let c0 = self.center + self.delta * t0;
        let c1 = self.center + self.delta * t1;
        let mut path = BezPath::new();
        if r0 > 0.0 {
            for el in (ctm * Circle::new(c0, r0)).to_path(ARC_TOLERANCE).elements() {
                path.push(*el);
            }
        }
        if r1 > 0.0 {
            let inner = (ctm * Circle::new(c1, r1))
                .to_path(ARC_TOLERANCE)
                .reverse_subpaths();
            for el in inner.elements() {
                path.push(*el);
            }
        }
        if path.elements().is_empty() {
            return Ok(());
        }
        self.state.device.fill_path(&path, &color)
    }

    /// Fill a user-space triangle.
    fn fill_triangle(&mut self, cc: &ClientColor, p0: Point, p1: Point, p2: Point) -> Result<()> {
        let color = self.state.remap(*cc)?;
        let ctm = self.state.ctm;
        let mut path = BezPath::new();
        path.move_to(ctm * p0);
        path.line_to(ctm * p1);
        path.line_to(ctm * p2);
        path.close_path();
        self.state.device.fill_path(&path, &color)
    }

    /// Paint the extension past the start circle with the start color.
    ///
    /// Painted before the main annuli, which overwrite the overlap between
    /// the circles with the correct gradient colors.
    #[allow(clippy::too_many_arguments)]
    fn extend_start(
        &mut self,
        cc: &ClientColor,
        c0: Point,
        r0: f64,
        c1: Point,
        r1: f64,
        dist: f64,
        max_ext: f64,
        rect: Rect,
    ) -> Result<()> {
        if r0 < r1 {
            if r1 - r0 < dist {
                // The small-end extension is the cone tip: two triangles
                // from the big circle's center through the tangent
                // intersection.
                let coord = extension_cone(c1, r1, c0, r0, max_ext);
                self.fill_triangle(cc, c1, coord[0], coord[1])?;
                self.fill_triangle(cc, c1, coord[0], coord[2])?;
            } else {
                // Nested circles: no tangents exist, fill the start disc.
                self.fill_annulus(cc, 0.0, 0.0, 0.0, r0)?;
            }
        } else if r0 > r1 {
            if r0 - r1 < dist {
                let coord = extension_cone(c0, r0, c1, r1, max_ext);
                self.fill_triangle(cc, coord[3], coord[4], coord[6])?;
                self.fill_triangle(cc, coord[3], coord[5], coord[6])?;
            } else {
                self.fill_annulus(cc, 0.0, 0.0, r0, corner_distance(c0, rect))?;
            }
        } else {
            // Equal radii: the tangents are parallel, so the extension is a
            // bar two radii wide, rendered as two triangles.
            let coord = extension_bar(c0, c1, r0, max_ext);
            self.fill_triangle(cc, coord[0], coord[1], coord[2])?;
            self.fill_triangle(cc, coord[2], coord[3], coord[1])?;
        }
        Ok(())
    }

    /// Paint the extension past the end circle with the end color.
    #[allow(clippy::too_many_arguments)]
    fn extend_end(
        &mut self,
        cc: &ClientColor,
        c0: Point,
        r0: f64,
        c1: Point,
        r1: f64,
        dist: f64,
        max_ext: f64,
        rect: Rect,
    ) -> Result<()> {
        if r0 < r1 {
            if r1 - r0 < dist {
                let coord = extension_cone(c1, r1, c0, r0, max_ext);
                self.fill_triangle(cc, coord[3], coord[4], coord[6])?;
                self.fill_triangle(cc, coord[3], coord[5], coord[6])?;
                self.fill_annulus(cc, 1.0, 1.0, 0.0, r1)
            } else {
                self.fill_annulus(cc, 1.0, 1.0, r1, corner_distance(c1, rect))
            }
        } else if r0 > r1 {
            if r0 - r1 < dist {
                let coord = extension_cone(c0, r0, c1, r1, max_ext);
                self.fill_triangle(cc, c1, coord[0], coord[1])?;
                self.fill_triangle(cc, c1, coord[0], coord[2])?;
            }
            self.fill_annulus(cc, 1.0, 1.0, 0.0, r1)
        } else {
            let coord = extension_bar(c1, c0, r0, max_ext);
            self.fill_triangle(cc, coord[0], coord[1], coord[2])?;
            self.fill_triangle(cc, coord[2], coord[3], coord[1])?;
            self.fill_annulus(cc, 1.0, 1.0, 0.0, r1)
        }
    }
}

/// Exterior-common-tangent ("cone") construction between two circles of
/// different radii; `r_big` must exceed `r_small` and the radius
/// difference must be less than the center distance, so the tangents meet
/// at a single point outside both circles.
///
/// Returns, in order: the tangent intersection point; the two tangent
/// contact points on the small circle; then for each tangent direction the
/// contact point on the big circle followed by a point `max_ext` out along
/// the tangent.
fn extension_cone(big: Point, r_big: f64, small: Point, r_small: f64, max_ext: f64) -> [Point; 7] {
    // The tangents cross on the center line, placed by similar triangles.
    let isec = big + (small - big) * (r_big / (r_big - r_small));
    let dist_big = (big - isec).hypot();
    let dist_small = (small - isec).hypot();
    // Tangent-line legs of the right triangles at the contact points.
    let tan_big = (dist_big * dist_big - r_big * r_big).max(0.0).sqrt();
    let tan_small = (dist_small * dist_small - r_small * r_small).max(0.0).sqrt();
    let cos_t = tan_big / dist_big;
    let sin_t = r_big / dist_big;

    // Unit vector from the intersection toward the big center, rotated by
    // ±the tangent angle.
    let u = (big - isec) / dist_big;
    let dir0 = Vec2::new(u.x * cos_t - u.y * sin_t, u.x * sin_t + u.y * cos_t);
    let dir1 = Vec2::new(u.x * cos_t + u.y * sin_t, -u.x * sin_t + u.y * cos_t);

    [
        isec,
        isec + dir0 * tan_small,
        isec + dir1 * tan_small,
        isec + dir0 * tan_big,
        isec + dir0 * max_ext,
        isec + dir1 * tan_big,
        isec + dir1 * max_ext,
    ]
}

/// Parallel-tangent ("bar") construction for equal radii: the two circle
/// centers offset perpendicular to the center line by the radius, and the
/// same points pushed `max_ext` away from `toward`.
fn extension_bar(from: Point, toward: Point, radius: f64, max_ext: f64) -> [Point; 4] {
    let d = from - toward;
    let out = d / d.hypot();
    let perp = Vec2::new(out.y, -out.x);
    [
        from + perp * radius,
        from + perp * radius + out * max_ext,
        from - perp * radius,
        from - perp * radius + out * max_ext,
    ]
}

/// Distance from `center` to the farthest corner of `rect`.
fn corner_distance(center: Point, rect: Rect) -> f64 {
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
    ];
    corners
        .iter()
        .map(|p| center.distance(*p))
        .fold(0.0, f64::max)
}
