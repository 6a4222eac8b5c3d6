// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures: a recording device, coverage replay, and test
//! functions.

// Not every test binary uses every helper.
#![allow(dead_code)]

use smooth_shade::color::{ClientColor, DeviceColor};
use smooth_shade::device::RasterDevice;
use smooth_shade::function::{Monotonicity, ShadingFunction};
use smooth_shade::kurbo::{BezPath, PathEl, Point, Shape};
use smooth_shade::{Error, Result};

/// One recorded device primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum FillCall {
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: DeviceColor,
    },
    Path {
        path: BezPath,
        color: DeviceColor,
    },
}

impl FillCall {
    /// Whether the call is a path made of straight lines only (the shape
    /// of the stripe quads and the radial extension triangles/bars).
    pub fn is_polygon(&self) -> bool {
        match self {
            Self::Rect { .. } => false,
            Self::Path { path, .. } => !path
                .elements()
                .iter()
                .any(|el| matches!(el, PathEl::CurveTo(..) | PathEl::QuadTo(..))),
        }
    }

    pub fn color(&self) -> &DeviceColor {
        match self {
            Self::Rect { color, .. } | Self::Path { color, .. } => color,
        }
    }
}

/// A device that records every fill primitive it receives.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub calls: Vec<FillCall>,
    /// When set, the fill call with this index fails with a device error.
    pub fail_at: Option<usize>,
}

impl RecordingDevice {
    fn check_injected_failure(&self) -> Result<()> {
        if self.fail_at == Some(self.calls.len()) {
            Err(Error::Device("injected failure".into()))
        } else {
            Ok(())
        }
    }
}

impl RasterDevice for RecordingDevice {
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
        self.check_injected_failure()?;
        self.calls.push(FillCall::Rect {
            x,
            y,
            w,
            h,
            color: *color,
        });
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, color: &DeviceColor) -> Result<()> {
        self.check_injected_failure()?;
        self.calls.push(FillCall::Path {
            path: path.clone(),
            color: *color,
        });
        Ok(())
    }
}

/// Replay recorded primitives into a per-pixel touch-count grid, rect
/// fills exactly and path fills by winding at pixel centers.
pub fn coverage(calls: &[FillCall], width: usize, height: usize) -> Vec<u32> {
    let mut grid = vec![0_u32; width * height];
    for call in calls {
        match call {
            FillCall::Rect { x, y, w, h, .. } => {
                let x0 = (*x).max(0) as usize;
                let y0 = (*y).max(0) as usize;
                let x1 = (x + w).clamp(0, width as i32) as usize;
                let y1 = (y + h).clamp(0, height as i32) as usize;
                for row in y0..y1 {
                    for col in x0..x1 {
                        grid[row * width + col] += 1;
                    }
                }
            }
            FillCall::Path { path, .. } => {
                let bbox = path.bounding_box();
                let x0 = (bbox.x0.floor().max(0.0) as usize).min(width);
                let y0 = (bbox.y0.floor().max(0.0) as usize).min(height);
                let x1 = (bbox.x1.ceil().max(0.0) as usize).min(width);
                let y1 = (bbox.y1.ceil().max(0.0) as usize).min(height);
                for row in y0..y1 {
                    for col in x0..x1 {
                        let center = Point::new(col as f64 + 0.5, row as f64 + 0.5);
                        if path.winding(center) != 0 {
                            grid[row * width + col] += 1;
                        }
                    }
                }
            }
        }
    }
    grid
}

/// A function returning the same color for every input, of any arity.
#[derive(Debug)]
pub struct ConstantFunction {
    pub color: ClientColor,
    pub num_components: usize,
}

impl ShadingFunction for ConstantFunction {
    fn evaluate(&self, _input: &[f64], out: &mut ClientColor) -> Result<()> {
        *out = self.color;
        Ok(())
    }

    fn monotonicity(&self, _t0: f64, _t1: f64) -> Monotonicity {
        Monotonicity::Monotonic
    }
}

/// A bilinear blend of four corner colors over the unit square, for
/// function-based shadings.
#[derive(Debug)]
pub struct BilinearFunction {
    /// Corner colors, row-major: [x0y0, x1y0, x0y1, x1y1].
    pub corners: [ClientColor; 4],
    pub num_components: usize,
}

impl ShadingFunction for BilinearFunction {
    fn evaluate(&self, input: &[f64], out: &mut ClientColor) -> Result<()> {
        let x = input[0].clamp(0.0, 1.0) as f32;
        let y = input[1].clamp(0.0, 1.0) as f32;
        for ci in 0..self.num_components {
            let c = self.corners;
            let bottom = c[0].components[ci] * (1.0 - x) + c[1].components[ci] * x;
            let top = c[2].components[ci] * (1.0 - x) + c[3].components[ci] * x;
            out.components[ci] = bottom * (1.0 - y) + top * y;
        }
        Ok(())
    }
}

/// A gray ramp `t ↦ t` that fails inside `(fail_lo, fail_hi)` and never
/// admits to being monotonic, forcing subdivision.
#[derive(Debug)]
pub struct FailingFunction {
    pub fail_lo: f64,
    pub fail_hi: f64,
}

impl ShadingFunction for FailingFunction {
    fn evaluate(&self, input: &[f64], out: &mut ClientColor) -> Result<()> {
        let t = input[0];
        if t > self.fail_lo && t < self.fail_hi {
            return Err(Error::Function(format!("poisoned input {t}")));
        }
        *out = ClientColor::new(&[t.clamp(0.0, 1.0) as f32]);
        Ok(())
    }
}

/// A gray oscillation with no monotonic stretch at any probed scale.
#[derive(Debug)]
pub struct OscillatingFunction {
    pub cycles: f64,
}

impl ShadingFunction for OscillatingFunction {
    fn evaluate(&self, input: &[f64], out: &mut ClientColor) -> Result<()> {
        let v = 0.5 + 0.5 * (input[0] * self.cycles * core::f64::consts::TAU).sin();
        *out = ClientColor::new(&[v as f32]);
        Ok(())
    }

    fn monotonicity(&self, _t0: f64, _t1: f64) -> Monotonicity {
        Monotonicity::NotMonotonic
    }
}

pub fn gray(v: f32) -> ClientColor {
    ClientColor::new(&[v])
}

pub fn rgb(r: f32, g: f32, b: f32) -> ClientColor {
    ClientColor::new(&[r, g, b])
}
