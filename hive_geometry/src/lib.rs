// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hive Geometry: the math behind sharing one rendering surface between many
//! DOM regions.
//!
//! This crate is pure and headless. It provides:
//! - [`CanvasSize`], [`TrackRect`], and [`Position`]: the surface rectangle, a
//!   tracked node's viewport-space rectangle, and that rectangle expressed in
//!   surface-local, bottom-left-origin coordinates.
//! - [`to_local_position`]: the rectangle-to-scissor transform.
//! - [`is_offscreen`]: padded culling against an extended viewport window.
//! - [`fit_plane_to_frustum`] and [`Camera`]: frustum-fit plane sizing,
//!   per-region reprojection, and NDC-to-ray unprojection for hit testing.
//!
//! ## Example
//!
//! ```rust
//! use hive_geometry::{CanvasSize, DEFAULT_PADDING, TrackRect, is_offscreen, to_local_position};
//!
//! let canvas = CanvasSize::new(0.0, 0.0, 800.0, 600.0);
//! let rect = TrackRect::from_edges(100.0, 50.0, 300.0, 250.0);
//!
//! let position = to_local_position(&canvas, &rect);
//! assert_eq!(position.bottom, 350.0);
//! assert!(!is_offscreen(&position, &canvas, 0.0, 600.0, DEFAULT_PADDING));
//! ```
//!
//! Frustum fitting only makes sense for perspective projections:
//!
//! ```rust
//! use hive_geometry::{GeometryError, Orthographic, Perspective, Projection, fit_plane_to_frustum};
//!
//! let persp = Projection::Perspective(Perspective { fov: 90.0, ..Perspective::default() });
//! let plane = fit_plane_to_frustum(&persp, 5.0, 2.0).unwrap();
//! assert!((plane.height - 10.0).abs() < 1e-9);
//!
//! let ortho = Projection::Orthographic(Orthographic::default());
//! assert_eq!(fit_plane_to_frustum(&ortho, 5.0, 2.0), Err(GeometryError::InvalidCameraKind));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod camera;
mod cull;
mod rect;

pub use camera::{
    Camera, GeometryError, Matrix4, Orthographic, Perspective, Projection, Ray, Vec3,
    fit_plane_to_frustum,
};
pub use cull::{DEFAULT_PADDING, ViewportMetrics, is_offscreen, is_offscreen_in};
pub use rect::{CanvasSize, Position, ScissorRect, TrackRect, to_local_position};
