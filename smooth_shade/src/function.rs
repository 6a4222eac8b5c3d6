// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The color-producing function a shading is defined by, plus the two
//! standard interpolation function types.

use crate::color::ClientColor;
use crate::{Error, Result};
use core::fmt::Debug;

/// Result of probing a function for monotonicity over an interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Monotonicity {
    /// Every component varies monotonically over the interval.
    Monotonic,
    /// Some component is known to change direction over the interval.
    NotMonotonic,
    /// Monotonicity could not be decided cheaply.
    Unknown,
}

/// A color-producing function over a 1-D or 2-D parameter domain.
pub trait ShadingFunction: Debug {
    /// Evaluate the function, writing one value per color component.
    ///
    /// `input` has one entry for axial and radial shadings and two for
    /// function-based shadings. Fails with [`Error::Function`] when the
    /// input lies outside the function's domain.
    fn evaluate(&self, input: &[f64], out: &mut ClientColor) -> Result<()>;

    /// Probe whether the function is monotonic over `[t0, t1]`.
    ///
    /// Inputs are in the function's own domain space. Both
    /// [`Monotonicity::Unknown`] and [`Monotonicity::NotMonotonic`] force
    /// the axial/radial engines to keep subdividing, so a conservative
    /// answer is always safe.
    fn monotonicity(&self, _t0: f64, _t1: f64) -> Monotonicity {
        Monotonicity::Unknown
    }
}

/// Clamp `input` into `domain`, tolerating a sliver of floating-point
/// drift at the edges.
fn clamp_to_domain(input: f64, domain: [f64; 2]) -> Result<f64> {
    let (lo, hi) = if domain[0] <= domain[1] {
        (domain[0], domain[1])
    } else {
        (domain[1], domain[0])
    };
    let slack = 1e-6 * (hi - lo).max(1.0);
    if input < lo - slack || input > hi + slack {
        return Err(Error::Function(format!(
            "input {input} outside domain [{lo}, {hi}]"
        )));
    }
    Ok(input.clamp(lo, hi))
}

/// Interpolates between two colors as `c0 + t'^n · (c1 − c0)`, with `t'`
/// the input normalized over the domain.
///
/// With `n = 1` this is a plain linear blend, the most common shading
/// function by far.
#[derive(Clone, Debug)]
pub struct ExponentialFunction {
    domain: [f64; 2],
    c0: ClientColor,
    c1: ClientColor,
    n: f64,
    num_components: usize,
}

impl ExponentialFunction {
    /// Create an exponential interpolation function.
    pub fn new(
        domain: [f64; 2],
        c0: ClientColor,
        c1: ClientColor,
        n: f64,
        num_components: usize,
    ) -> Self {
        Self {
            domain,
            c0,
            c1,
            n,
            num_components,
        }
    }
}

impl ShadingFunction for ExponentialFunction {
    fn evaluate(&self, input: &[f64], out: &mut ClientColor) -> Result<()> {
        let &[t] = input else {
            return Err(Error::Function("expected a single input".into()));
        };
        let t = clamp_to_domain(t, self.domain)?;
        let span = self.domain[1] - self.domain[0];
        let tn = if span == 0.0 {
            0.0
        } else {
            ((t - self.domain[0]) / span).powf(self.n)
        };
        for ci in 0..self.num_components {
            let c0 = f64::from(self.c0.components[ci]);
            let c1 = f64::from(self.c1.components[ci]);
            out.components[ci] = (c0 + tn * (c1 - c0)) as f32;
        }
        Ok(())
    }

    fn monotonicity(&self, _t0: f64, _t1: f64) -> Monotonicity {
        // t'^n is monotonic for positive n, so every component moves in one
        // direction over any subinterval.
        if self.n > 0.0 {
            Monotonicity::Monotonic
        } else {
            Monotonicity::Unknown
        }
    }
}

/// Stitches `k` subfunctions over a partitioned domain.
///
/// `bounds` holds the `k − 1` ascending split points; segment `i` covers
/// `[bounds[i-1], bounds[i])` (with the domain edges at the outside) and
/// maps its inputs linearly onto `encode[i]` before delegating to
/// `functions[i]`.
#[derive(Debug)]
pub struct StitchingFunction {
    domain: [f64; 2],
    functions: Vec<Box<dyn ShadingFunction>>,
    bounds: Vec<f64>,
    encode: Vec<[f64; 2]>,
}

impl StitchingFunction {
    /// Create a stitching function.
    ///
    /// # Panics
    ///
    /// Panics unless `bounds.len() == functions.len() - 1` and
    /// `encode.len() == functions.len()`.
    pub fn new(
        domain: [f64; 2],
        functions: Vec<Box<dyn ShadingFunction>>,
        bounds: Vec<f64>,
        encode: Vec<[f64; 2]>,
    ) -> Self {
        assert_eq!(bounds.len() + 1, functions.len());
        assert_eq!(encode.len(), functions.len());
        Self {
            domain,
            functions,
            bounds,
            encode,
        }
    }

    /// Index of the segment containing `t`.
    fn segment(&self, t: f64) -> usize {
        self.bounds.iter().take_while(|b| t >= **b).count()
    }

    /// Map `t` into the encode range of segment `k`.
    fn encode_input(&self, k: usize, t: f64) -> f64 {
        let lo = if k == 0 { self.domain[0] } else { self.bounds[k - 1] };
        let hi = if k == self.bounds.len() {
            self.domain[1]
        } else {
            self.bounds[k]
        };
        let e = self.encode[k];
        let span = hi - lo;
        if span == 0.0 {
            e[0]
        } else {
            e[0] + (t - lo) / span * (e[1] - e[0])
        }
    }
}

impl ShadingFunction for StitchingFunction {
    fn evaluate(&self, input: &[f64], out: &mut ClientColor) -> Result<()> {
        let &[t] = input else {
            return Err(Error::Function("expected a single input".into()));
        };
        let t = clamp_to_domain(t, self.domain)?;
        let k = self.segment(t);
        self.functions[k].evaluate(&[self.encode_input(k, t)], out)
    }

    fn monotonicity(&self, t0: f64, t1: f64) -> Monotonicity {
        let (a, b) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        let k = self.segment(a);
        if k != self.segment(b) {
            // The interval straddles a bound; the stitched pieces may pull
            // in different directions.
            return Monotonicity::Unknown;
        }
        // A linear re-encode (even a reversed one) preserves monotonicity.
        self.functions[k].monotonicity(self.encode_input(k, a), self.encode_input(k, b))
    }
}
