// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-region rectangle tracking.
//!
//! A [`RegionObserver`] subscribes to resize, intersection, and scroll
//! notifications for one node. Every notification writes into a shared
//! [`Measurement`] that the render pass reads without waiting; the render
//! pass always sees the latest complete snapshot.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Ref, RefCell};
use core::fmt;

use hive_geometry::{
    CanvasSize, Position, TrackRect, ViewportMetrics, is_offscreen_in, to_local_position,
};
use smallvec::SmallVec;

use crate::config::HiveConfig;
use crate::error::HiveError;
use crate::host::{LayoutHost, Listener, Signal, SignalSource, TrackedNode};

/// The latest layout facts for one region.
#[derive(Clone, Debug)]
pub struct Measurement {
    canvas: CanvasSize,
    padding: f64,
    prefilter: bool,
    rect: Option<TrackRect>,
    viewport: ViewportMetrics,
    position: Option<Position>,
    offscreen: bool,
    intersecting: Option<bool>,
    detached: bool,
    revision: u64,
}

/// A consistent view of a region's geometry.
///
/// `position` and `offscreen` are always derived from `rect`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegionSnapshot {
    /// Viewport-space rectangle of the node.
    pub rect: TrackRect,
    /// `rect` in canvas-local coordinates.
    pub position: Position,
    /// Whether the region should be culled this frame.
    pub offscreen: bool,
}

impl Measurement {
    fn new(canvas: CanvasSize, config: &HiveConfig) -> Self {
        Self {
            canvas,
            padding: config.padding(),
            prefilter: config.intersection_prefilter(),
            rect: None,
            viewport: ViewportMetrics::default(),
            position: None,
            offscreen: false,
            intersecting: None,
            detached: false,
            revision: 0,
        }
    }

    /// Records a fresh rectangle taken against `viewport`.
    ///
    /// `None` means the node is no longer mounted. The snapshot is dropped so
    /// nothing draws at the old position, and the measurement reads as
    /// detached until a rectangle is recorded again.
    pub fn record(&mut self, rect: Option<TrackRect>, viewport: ViewportMetrics) {
        let Some(rect) = rect else {
            self.detached = true;
            if self.rect.take().is_some() {
                self.position = None;
                self.offscreen = false;
                self.revision += 1;
            }
            return;
        };
        self.detached = false;
        self.rect = Some(rect);
        self.viewport = viewport;
        self.recompute();
    }

    /// Records a viewport-intersection report.
    pub fn set_intersecting(&mut self, intersecting: bool) {
        self.intersecting = Some(intersecting);
        self.revision += 1;
    }

    fn set_canvas(&mut self, canvas: CanvasSize) {
        if self.canvas != canvas {
            self.canvas = canvas;
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        if let Some(rect) = self.rect {
            let position = to_local_position(&self.canvas, &rect);
            self.offscreen = is_offscreen_in(&position, &self.canvas, &self.viewport, self.padding);
            self.position = Some(position);
            self.revision += 1;
        }
    }

    /// Last measured rectangle.
    #[must_use]
    pub fn rect(&self) -> Option<TrackRect> {
        self.rect
    }

    /// Returns `true` once a notification found the node unmounted.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Last intersection report, if any arrived.
    #[must_use]
    pub fn intersecting(&self) -> Option<bool> {
        self.intersecting
    }

    /// Number of writes so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the region is culled, combining the padded math with the
    /// intersection pre-filter.
    #[must_use]
    pub fn is_offscreen(&self) -> bool {
        if self.prefilter && self.intersecting == Some(true) {
            return false;
        }
        self.offscreen
    }

    /// The current snapshot, or `None` before the first measurement.
    #[must_use]
    pub fn snapshot(&self) -> Option<RegionSnapshot> {
        Some(RegionSnapshot {
            rect: self.rect?,
            position: self.position?,
            offscreen: self.is_offscreen(),
        })
    }
}

/// Tracks one node's rectangle through host subscriptions.
///
/// [`start`](Self::start) always releases the previous subscriptions before
/// creating new ones; [`stop`](Self::stop) releases them all. Dropping the
/// observer releases them as well.
pub struct RegionObserver<N, S> {
    measurement: Rc<RefCell<Measurement>>,
    node: Option<N>,
    subscriptions: SmallVec<[S; 3]>,
}

impl<N: fmt::Debug, S> fmt::Debug for RegionObserver<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionObserver")
            .field("measurement", &self.measurement.borrow())
            .field("node", &self.node)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl<N: TrackedNode, S> RegionObserver<N, S> {
    /// Creates an idle observer.
    #[must_use]
    pub fn new(canvas: CanvasSize, config: &HiveConfig) -> Self {
        Self {
            measurement: Rc::new(RefCell::new(Measurement::new(canvas, config))),
            node: None,
            subscriptions: SmallVec::new(),
        }
    }

    /// Binds to `node`: subscribes to all three sources and measures it
    /// once.
    ///
    /// Any previous subscriptions are released first. On failure nothing
    /// stays subscribed.
    ///
    /// # Errors
    ///
    /// [`HiveError::MissingAnchor`] if the node is not mounted, or whatever
    /// the host reports from [`LayoutHost::subscribe`].
    pub fn start<H>(&mut self, host: &mut H, node: &N) -> Result<(), HiveError>
    where
        H: LayoutHost<Node = N, Subscription = S>,
    {
        self.stop();
        let Some(rect) = node.bounding_rect() else {
            return Err(HiveError::MissingAnchor);
        };

        for source in SignalSource::ALL {
            let listener = listener_for(Rc::downgrade(&self.measurement), node.clone());
            match host.subscribe(node, source, listener) {
                Ok(subscription) => self.subscriptions.push(subscription),
                Err(err) => {
                    self.subscriptions.clear();
                    return Err(err);
                }
            }
        }
        // Measured only once fully subscribed, so a refused start never
        // leaves a drawable snapshot behind.
        self.measurement
            .borrow_mut()
            .record(Some(rect), node.viewport());
        self.node = Some(node.clone());
        Ok(())
    }

    /// Releases all subscriptions. Returns how many were released.
    pub fn stop(&mut self) -> usize {
        let released = self.subscriptions.len();
        self.subscriptions.clear();
        self.node = None;
        released
    }

    /// Returns `true` while subscribed to a node that still measures.
    ///
    /// An observer whose node was found unmounted keeps its subscriptions
    /// until the next [`start`](Self::start) or [`stop`](Self::stop) but no
    /// longer counts as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.node.is_some() && !self.measurement.borrow().is_detached()
    }

    /// Number of subscriptions currently held.
    #[must_use]
    pub fn held(&self) -> usize {
        self.subscriptions.len()
    }

    /// Node currently observed.
    #[must_use]
    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    /// Recomputes the snapshot against a resized surface.
    pub fn set_canvas(&mut self, canvas: CanvasSize) {
        self.measurement.borrow_mut().set_canvas(canvas);
    }

    /// The latest snapshot, or `None` before the first measurement.
    #[must_use]
    pub fn snapshot(&self) -> Option<RegionSnapshot> {
        self.measurement.borrow().snapshot()
    }

    /// Read access to the shared measurement.
    #[must_use]
    pub fn measurement(&self) -> Ref<'_, Measurement> {
        self.measurement.borrow()
    }
}

impl<N, S> Drop for RegionObserver<N, S> {
    fn drop(&mut self) {
        if !self.subscriptions.is_empty() {
            log::debug!(
                "region observer dropped while running; releasing {} subscription(s)",
                self.subscriptions.len()
            );
        }
    }
}

fn listener_for<N: TrackedNode>(measurement: Weak<RefCell<Measurement>>, node: N) -> Listener {
    Box::new(move |signal| {
        // A listener that outlives its observer has nothing left to update.
        let Some(measurement) = measurement.upgrade() else {
            return;
        };
        let mut measurement = measurement.borrow_mut();
        measurement.record(node.bounding_rect(), node.viewport());
        if let Signal::Intersection { intersecting } = signal {
            measurement.set_intersecting(intersecting);
        }
    })
}
