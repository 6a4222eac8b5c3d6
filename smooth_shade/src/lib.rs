// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An adaptive-subdivision fill engine for smooth shadings.
//!
//! A smooth shading paints a color gradient defined by a *function* over a
//! 1-D or 2-D parameter domain. This crate renders the three non-mesh
//! shading geometries onto a raster clip rectangle:
//!
//! - **Function-based** ([`ShadingKind::FunctionBased`]): the color varies
//!   over a 2-D parameter rectangle mapped into user space by a matrix.
//!   Rendered by adaptive quadrant subdivision.
//! - **Axial** ([`ShadingKind::Axial`]): the color varies along a line
//!   between two points. Rendered as stripes perpendicular to the axis.
//! - **Radial** ([`ShadingKind::Radial`]): the color varies between two
//!   circles whose center and radius interpolate linearly. Rendered as
//!   concentric annuli, with analytic cone/bar geometry for the extension
//!   regions past either end.
//!
//! Subdivision stops once the colors across a region agree to within a
//! per-component tolerance derived from the device's color precision, so a
//! shading is painted with the smallest number of constant-color fills
//! that is visually indistinguishable from the exact gradient.
//!
//! The engine drives its collaborators through traits: a
//! [`ShadingFunction`](function::ShadingFunction) produces colors, a
//! [`ColorSpace`](color_space::ColorSpace) maps them to device colors, and
//! a [`RasterDevice`](device::RasterDevice) consumes rectangle and path
//! fills. A [`Pixmap`](pixmap::Pixmap) reference device is included.
//!
//! # Features
//!
//! - `png`: allow dumping a [`Pixmap`](pixmap::Pixmap) as a PNG.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![forbid(unsafe_code)]

mod axial;
mod fill;
mod function_based;
mod radial;

pub mod color;
pub mod color_space;
pub mod device;
pub mod function;
pub mod pixmap;
pub mod shading;

pub use peniko;
pub use peniko::kurbo;

pub use fill::{fill_shading, FillParams};
pub use shading::{Shading, ShadingKind};

use thiserror::Error;

/// Errors surfaced by a fill call.
///
/// Painting is incremental: when a collaborator fails mid-fill, the error
/// aborts the remaining subdivision and regions painted so far stay
/// painted. There is no rollback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The shading function rejected its input.
    #[error("shading function evaluation failed: {0}")]
    Function(String),
    /// The color space could not map a client color to a device color.
    #[error("color remap failed: {0}")]
    ColorRemap(String),
    /// The device rejected a fill primitive.
    #[error("device fill failed: {0}")]
    Device(String),
}

/// Specialized `Result` type for shading fills.
pub type Result<T> = core::result::Result<T, Error>;
