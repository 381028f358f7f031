// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine tying observers, gates, and the registry together.

use core::fmt;

use hive_geometry::{Camera, CanvasSize};

use crate::config::HiveConfig;
use crate::error::HiveError;
use crate::gate::{GateOutcome, RegionContent, RenderGate};
use crate::host::{LayoutHost, TrackedNode};
use crate::input::{ConnectedInput, InputConnection, PointerInput, RoutedPointer, route_pointer};
use crate::observer::{RegionObserver, RegionSnapshot};
use crate::registry::{RegionId, RegionOptions, RegionRegistry};
use crate::surface::RenderSurface;

/// Per-frame counts returned by [`Hive::render_frame`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Regions drawn.
    pub drawn: usize,
    /// Regions skipped without touching the surface.
    pub skipped: usize,
    /// Regions whose draw returned an error.
    pub failed: usize,
}

/// One registered region.
pub struct Region<N, S, Sc> {
    anchor: N,
    observer: RegionObserver<N, S>,
    gate: RenderGate<Sc>,
    failed_retries: u32,
}

impl<N: fmt::Debug, S, Sc: fmt::Debug> fmt::Debug for Region<N, S, Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("anchor", &self.anchor)
            .field("observer", &self.observer)
            .field("gate", &self.gate)
            .field("failed_retries", &self.failed_retries)
            .finish()
    }
}

impl<N, S, Sc> Region<N, S, Sc> {
    /// The tracked node.
    pub fn anchor(&self) -> &N {
        &self.anchor
    }

    /// The region's draw gate.
    pub fn gate(&self) -> &RenderGate<Sc> {
        &self.gate
    }

    /// What the region draws.
    pub fn content(&self) -> &RegionContent<Sc> {
        self.gate.content()
    }

    /// Frames counted so far.
    pub fn frame_count(&self) -> u32 {
        self.gate.frame_count()
    }

    /// Consecutive retries the host refused. Reset once tracking starts.
    pub fn failed_retries(&self) -> u32 {
        self.failed_retries
    }
}

impl<N: TrackedNode, S, Sc> Region<N, S, Sc> {
    /// Latest geometry, or `None` before the first measurement.
    pub fn snapshot(&self) -> Option<RegionSnapshot> {
        self.observer.snapshot()
    }

    /// Returns `true` while the anchor is subscribed. A region that is not
    /// running is retried at the start of every frame.
    pub fn is_tracking(&self) -> bool {
        self.observer.is_running()
    }

    /// Host subscriptions currently held for the anchor.
    pub fn subscriptions(&self) -> usize {
        self.observer.held()
    }
}

type RegionOf<H, Sc> =
    Region<<H as LayoutHost>::Node, <H as LayoutHost>::Subscription, Sc>;

/// Synchronizes many DOM regions with one shared render surface.
///
/// Each frame, [`render_frame`](Self::render_frame) visits the regions in
/// ascending render priority and draws each one restricted to its latest
/// measured rectangle.
pub struct Hive<H: LayoutHost, Sc> {
    host: H,
    config: HiveConfig,
    canvas: CanvasSize,
    regions: RegionRegistry<RegionOf<H, Sc>>,
    input: ConnectedInput<H::Node>,
}

impl<H, Sc> fmt::Debug for Hive<H, Sc>
where
    H: LayoutHost + fmt::Debug,
    Sc: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hive")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("canvas", &self.canvas)
            .field("regions", &self.regions)
            .field("input", &self.input)
            .finish()
    }
}

impl<H: LayoutHost, Sc> Hive<H, Sc> {
    /// Creates an engine for a surface occupying `canvas`.
    pub fn new(host: H, canvas: CanvasSize, config: HiveConfig) -> Self {
        Self {
            host,
            config,
            canvas,
            regions: RegionRegistry::new(),
            input: ConnectedInput::new(None),
        }
    }

    /// Engine settings.
    pub fn config(&self) -> &HiveConfig {
        &self.config
    }

    /// The layout host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The layout host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current surface rectangle.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// The registered regions.
    pub fn regions(&self) -> &RegionRegistry<RegionOf<H, Sc>> {
        &self.regions
    }

    /// One region.
    pub fn region(&self, id: RegionId) -> Option<&RegionOf<H, Sc>> {
        self.regions.get(id)
    }

    /// Registers a region tracking `anchor`.
    ///
    /// The anchor is measured and subscribed immediately. An anchor that is
    /// not mounted yet leaves the region pending; it is retried every frame.
    ///
    /// # Errors
    ///
    /// Whatever the host reports other than a missing anchor. Nothing is
    /// registered in that case.
    pub fn register_region(
        &mut self,
        anchor: H::Node,
        content: RegionContent<Sc>,
        options: RegionOptions,
    ) -> Result<RegionId, HiveError> {
        let mut observer = RegionObserver::new(self.canvas, &self.config);
        match observer.start(&mut self.host, &anchor) {
            Ok(()) => {}
            Err(HiveError::MissingAnchor) => {
                log::warn!("anchor {anchor:?} is not mounted; region will retry each frame");
            }
            Err(err) => return Err(err),
        }
        let mut gate = RenderGate::new(content, &options);
        gate.start();

        let id = self.regions.register(
            Region {
                anchor,
                observer,
                gate,
                failed_retries: 0,
            },
            &options,
        );
        log::debug!(
            "registered region {id:?} at priority {}",
            options.render_priority
        );
        Ok(id)
    }

    /// Unregisters a region and tears down its observers.
    ///
    /// Returns `Ok(false)` for an id that is not registered, so calling this
    /// twice is harmless.
    ///
    /// # Errors
    ///
    /// [`HiveError::ObserverLeak`] if the host still holds subscriptions for
    /// the anchor beyond those other live regions account for. The region is
    /// unregistered regardless.
    pub fn unregister_region(&mut self, id: RegionId) -> Result<bool, HiveError> {
        let Some(mut region) = self.regions.unregister(id) else {
            return Ok(false);
        };
        region.gate.stop();
        let released = region.observer.stop();
        log::debug!("unregistered region {id:?}; released {released} subscription(s)");

        let anchor = region.anchor;
        drop(region.observer);

        let expected: usize = self
            .regions
            .iter()
            .filter(|(_, other)| other.anchor == anchor)
            .map(|(_, other)| other.observer.held())
            .sum();
        let live = self.host.live_subscriptions(&anchor);
        if live > expected {
            let leaked = live - expected;
            log::error!("region {id:?} leaked {leaked} subscription(s) on {anchor:?}");
            return Err(HiveError::ObserverLeak {
                region: id,
                live: leaked,
            });
        }
        Ok(true)
    }

    /// Moves a region to a new anchor.
    ///
    /// The old anchor's subscriptions are all released before the new
    /// anchor is subscribed. Returns `Ok(false)` for an unknown id.
    ///
    /// # Errors
    ///
    /// Whatever the host reports other than a missing anchor; the region is
    /// left pending in that case.
    pub fn set_anchor(&mut self, id: RegionId, anchor: H::Node) -> Result<bool, HiveError> {
        let Some(region) = self.regions.get_mut(id) else {
            return Ok(false);
        };
        region.observer.stop();
        log::debug!("region {id:?} anchor {:?} -> {anchor:?}", region.anchor);
        // The old anchor's geometry must not be drawn at the new one.
        region.observer = RegionObserver::new(self.canvas, &self.config);
        region.anchor = anchor;
        region.failed_retries = 0;
        match region.observer.start(&mut self.host, &region.anchor) {
            Ok(()) => Ok(true),
            Err(HiveError::MissingAnchor) => {
                log::warn!("anchor {:?} is not mounted; region {id:?} will retry", region.anchor);
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Shows or hides a region. Returns `false` for an unknown id.
    pub fn set_visible(&mut self, id: RegionId, visible: bool) -> bool {
        match self.regions.get_mut(id) {
            Some(region) => {
                region.gate.set_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Updates the surface rectangle and recomputes every region against it.
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        if self.canvas == canvas {
            return;
        }
        self.canvas = canvas;
        self.regions
            .for_each_mut(|_, region| region.observer.set_canvas(canvas));
    }

    /// Tries to subscribe regions whose anchor was not mounted, or was
    /// found unmounted since the last frame.
    ///
    /// A lost anchor's subscriptions are released before the retry. Returns
    /// how many regions started tracking.
    pub fn retry_pending(&mut self) -> usize {
        let host = &mut self.host;
        let mut started = 0;
        self.regions.for_each_mut(|id, region| {
            if region.observer.is_running() {
                return;
            }
            if region.observer.held() > 0 {
                log::debug!("region {id:?} lost anchor {:?}", region.anchor);
            }
            match region.observer.start(host, &region.anchor) {
                Ok(()) => {
                    log::debug!("region {id:?} started tracking {:?}", region.anchor);
                    region.failed_retries = 0;
                    started += 1;
                }
                Err(HiveError::MissingAnchor) => {}
                Err(err) => {
                    if region.failed_retries == 0 {
                        log::warn!("region {id:?} could not subscribe: {err}");
                    } else {
                        log::trace!("region {id:?} could not subscribe: {err}");
                    }
                    region.failed_retries = region.failed_retries.saturating_add(1);
                }
            }
        });
        started
    }

    /// Runs one animation frame against `surface`.
    ///
    /// Syncs the canvas rectangle from the surface, retries pending
    /// regions, then runs every region's gate in render order. A failed
    /// draw is logged and counted; later regions still draw on restored
    /// state.
    pub fn render_frame<S>(&mut self, surface: &mut S) -> FrameStats
    where
        S: RenderSurface<Scene = Sc> + ?Sized,
    {
        self.set_canvas_size(surface.canvas_size());
        self.retry_pending();

        let mut stats = FrameStats::default();
        self.regions.for_each_mut(|id, region| {
            let snapshot = region.observer.snapshot();
            match region.gate.render(surface, snapshot.as_ref()) {
                Ok(GateOutcome::Drawn) => stats.drawn += 1,
                Ok(GateOutcome::Skipped(reason)) => {
                    log::trace!("region {id:?} skipped: {reason:?}");
                    stats.skipped += 1;
                }
                Err(err) => {
                    log::warn!("region {id:?} failed to draw: {err:?}");
                    stats.failed += 1;
                }
            }
        });
        stats
    }

    /// Remaps a pointer event into the region anchored at its target.
    ///
    /// When several regions share the target, the one drawn last wins.
    /// Returns `None` if no measured region is anchored there.
    pub fn route_pointer(
        &self,
        pointer: &PointerInput<H::Node>,
        camera: &Camera,
    ) -> Option<RoutedPointer> {
        let (id, snapshot) = self
            .regions
            .iter()
            .filter(|(_, region)| region.anchor == pointer.target)
            .filter_map(|(id, region)| Some((id, region.observer.snapshot()?)))
            .last()?;
        route_pointer(id, &snapshot.rect, pointer.client, camera)
    }

    /// The surface's active input target.
    pub fn connected_input(&self) -> &ConnectedInput<H::Node> {
        &self.input
    }

    /// Redirects the active input target to a region's anchor until the
    /// returned guard is dropped. Returns `None` for an unknown id.
    pub fn connect_input(&self, id: RegionId) -> Option<InputConnection<H::Node>> {
        let region = self.regions.get(id)?;
        Some(self.input.connect(region.anchor.clone()))
    }
}
