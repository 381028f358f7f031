// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hive Sync: many DOM regions, one rendering surface.
//!
//! A page lays out any number of regions with ordinary document flow. Each
//! one shows its own interactive 3D content, but all of them draw into a
//! single surface that sits in a scroll-locked overlay above the page. This
//! crate keeps the two in step:
//!
//! - [`RegionObserver`] measures a region's node on resize, viewport
//!   intersection, and scroll, and keeps the latest rectangle and offscreen
//!   flag in a shared [`Measurement`].
//! - [`RenderGate`] draws one region per frame inside a [`ScissorScope`],
//!   which restores the surface's scissor test and auto-clear flag on every
//!   exit path.
//! - [`Hive`] owns the [`RegionRegistry`] and runs the gates in ascending
//!   render priority.
//! - [`route_pointer`] and [`ConnectedInput`] map pointer events into the
//!   region under the pointer.
//! - [`ScrollOverlay`] keeps the overlay translated with the page.
//!
//! The host layout layer and the rendering surface are traits
//! ([`LayoutHost`], [`TrackedNode`], [`RenderSurface`], [`OverlayStyle`]).
//! [`HeadlessSurface`] is a recording surface for tests and tools.
//!
//! ## Example
//!
//! ```rust
//! use hive_geometry::{CanvasSize, TrackRect, ViewportMetrics};
//! use hive_sync::{
//!     HeadlessSurface, Hive, HiveConfig, HiveError, LayoutHost, Listener, RegionContent,
//!     RegionOptions, SignalSource, TrackedNode,
//! };
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Node(TrackRect);
//!
//! impl TrackedNode for Node {
//!     fn bounding_rect(&self) -> Option<TrackRect> {
//!         Some(self.0)
//!     }
//!     fn viewport(&self) -> ViewportMetrics {
//!         ViewportMetrics::new(0.0, 0.0, 600.0)
//!     }
//! }
//!
//! // A host that never delivers notifications.
//! struct StaticHost;
//!
//! impl LayoutHost for StaticHost {
//!     type Node = Node;
//!     type Subscription = ();
//!     fn subscribe(&mut self, _: &Node, _: SignalSource, _: Listener) -> Result<(), HiveError> {
//!         Ok(())
//!     }
//! }
//!
//! let canvas = CanvasSize::new(0.0, 0.0, 800.0, 600.0);
//! let mut hive = Hive::new(StaticHost, canvas, HiveConfig::default());
//! let node = Node(TrackRect::from_edges(100.0, 50.0, 300.0, 250.0));
//! hive.register_region(node, RegionContent::Subscene("cube"), RegionOptions::default())
//!     .unwrap();
//!
//! let mut surface = HeadlessSurface::new(canvas);
//! let stats = hive.render_frame(&mut surface);
//! assert_eq!(stats.drawn, 1);
//!
//! // The draw was confined to the region, with the bottom-left origin the
//! // surface expects.
//! let scissor = surface.draws()[0].state.scissor;
//! assert_eq!((scissor.x, scissor.y, scissor.width, scissor.height), (100.0, 350.0, 200.0, 200.0));
//! assert!(!surface.state().scissor_enabled);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod gate;
mod hive;
mod host;
mod input;
mod observer;
mod overlay;
mod registry;
mod surface;

pub use config::HiveConfig;
pub use error::HiveError;
pub use gate::{
    FrameBudget, GateOutcome, RegionContent, RenderGate, ScissorScope, SkipReason, clear_region,
};
pub use hive::{FrameStats, Hive, Region};
pub use host::{LayoutHost, Listener, Signal, SignalSource, TrackedNode};
pub use input::{ConnectedInput, InputConnection, PointerInput, RoutedPointer, route_pointer};
pub use observer::{Measurement, RegionObserver, RegionSnapshot};
pub use overlay::{OverlayStyle, ScrollOverlay, overlay_translation};
pub use registry::{RegionId, RegionOptions, RegionRegistry};
pub use surface::{
    DrawRecord, DrawnScene, HeadlessSurface, InjectedFailure, RenderSurface, SceneTarget,
    SurfaceState,
};
