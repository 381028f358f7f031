// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory layout host and nodes shared by the integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the fakes."
)]

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use hive_geometry::{Camera, CanvasSize, ScissorRect, TrackRect, ViewportMetrics};
use hive_sync::{
    HeadlessSurface, HiveError, LayoutHost, Listener, RenderSurface, SceneTarget, Signal,
    SignalSource, TrackedNode,
};
use peniko::Color;

pub(crate) const CANVAS: CanvasSize = CanvasSize::new(0.0, 0.0, 800.0, 600.0);

/// The browser window every fake node lives in.
#[derive(Clone, Debug, Default)]
pub(crate) struct Window(Rc<Cell<ViewportMetrics>>);

impl Window {
    pub(crate) fn new(inner_height: f64) -> Self {
        Self(Rc::new(Cell::new(ViewportMetrics::new(0.0, 0.0, inner_height))))
    }

    pub(crate) fn scroll_to(&self, scroll_x: f64, scroll_y: f64) {
        let mut metrics = self.0.get();
        metrics.scroll_x = scroll_x;
        metrics.scroll_y = scroll_y;
        self.0.set(metrics);
    }

    pub(crate) fn metrics(&self) -> ViewportMetrics {
        self.0.get()
    }

    pub(crate) fn node(&self, name: &'static str, rect: TrackRect) -> FakeNode {
        FakeNode(Rc::new(NodeInner {
            name,
            rect: Cell::new(Some(rect)),
            window: self.clone(),
        }))
    }

    pub(crate) fn detached_node(&self, name: &'static str) -> FakeNode {
        let node = self.node(name, TrackRect::default());
        node.detach();
        node
    }
}

struct NodeInner {
    name: &'static str,
    rect: Cell<Option<TrackRect>>,
    window: Window,
}

/// A node compared by identity, like a DOM element handle.
#[derive(Clone)]
pub(crate) struct FakeNode(Rc<NodeInner>);

impl FakeNode {
    pub(crate) fn name(&self) -> &'static str {
        self.0.name
    }

    /// Moves the node in viewport coordinates.
    pub(crate) fn set_rect(&self, rect: TrackRect) {
        self.0.rect.set(Some(rect));
    }

    pub(crate) fn detach(&self) {
        self.0.rect.set(None);
    }
}

impl PartialEq for FakeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FakeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FakeNode").field(&self.0.name).finish()
    }
}

impl TrackedNode for FakeNode {
    fn bounding_rect(&self) -> Option<TrackRect> {
        self.0.rect.get()
    }

    fn viewport(&self) -> ViewportMetrics {
        self.0.window.metrics()
    }
}

/// Subscription lifecycle events, in the order the host saw them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum HostEvent {
    Subscribed(&'static str, SignalSource),
    Released(&'static str, SignalSource),
}

struct LiveSubscription {
    id: u64,
    node: FakeNode,
    source: SignalSource,
    listener: Rc<RefCell<Listener>>,
}

#[derive(Default)]
struct Ledger {
    next_id: u64,
    live: Vec<LiveSubscription>,
    events: Vec<HostEvent>,
    refuse: Option<SignalSource>,
    leak_on_release: bool,
}

/// A layout host that keeps its subscriptions in memory and lets tests fire
/// notifications by hand.
#[derive(Clone, Default)]
pub(crate) struct FakeHost {
    ledger: Rc<RefCell<Ledger>>,
}

impl fmt::Debug for FakeHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.ledger.borrow();
        f.debug_struct("FakeHost")
            .field("ledger.live", &ledger.live.len())
            .field("ledger.events", &ledger.events)
            .finish()
    }
}

impl FakeHost {
    pub(crate) fn events(&self) -> Vec<HostEvent> {
        self.ledger.borrow().events.clone()
    }

    pub(crate) fn clear_events(&self) {
        self.ledger.borrow_mut().events.clear();
    }

    pub(crate) fn released(&self) -> usize {
        self.ledger
            .borrow()
            .events
            .iter()
            .filter(|event| matches!(event, HostEvent::Released(..)))
            .count()
    }

    pub(crate) fn live_total(&self) -> usize {
        self.ledger.borrow().live.len()
    }

    /// Refuses every later subscription to `source`.
    pub(crate) fn refuse(&self, source: Option<SignalSource>) {
        self.ledger.borrow_mut().refuse = source;
    }

    /// Makes dropped subscriptions stay live, as a buggy host would.
    pub(crate) fn leak_on_release(&self, leak: bool) {
        self.ledger.borrow_mut().leak_on_release = leak;
    }

    /// Delivers `signal` to every live listener on `node` for the matching
    /// source. Returns how many listeners ran.
    pub(crate) fn fire(&self, node: &FakeNode, signal: Signal) -> usize {
        let source = match signal {
            Signal::Resize => SignalSource::Resize,
            Signal::Intersection { .. } => SignalSource::Intersection,
            Signal::Scroll => SignalSource::Scroll,
        };
        let listeners: Vec<_> = self
            .ledger
            .borrow()
            .live
            .iter()
            .filter(|sub| sub.source == source && sub.node == *node)
            .map(|sub| Rc::clone(&sub.listener))
            .collect();
        for listener in &listeners {
            let mut listener = listener.borrow_mut();
            (*listener)(signal);
        }
        listeners.len()
    }

    /// Delivers a scroll to every live scroll listener.
    pub(crate) fn scroll(&self) -> usize {
        let listeners: Vec<_> = self
            .ledger
            .borrow()
            .live
            .iter()
            .filter(|sub| sub.source == SignalSource::Scroll)
            .map(|sub| Rc::clone(&sub.listener))
            .collect();
        for listener in &listeners {
            let mut listener = listener.borrow_mut();
            (*listener)(Signal::Scroll);
        }
        listeners.len()
    }
}

/// Releases its ledger entry when dropped.
pub(crate) struct FakeSubscription {
    id: u64,
    ledger: Rc<RefCell<Ledger>>,
}

impl fmt::Debug for FakeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeSubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Drop for FakeSubscription {
    fn drop(&mut self) {
        let mut ledger = self.ledger.borrow_mut();
        let Some(at) = ledger.live.iter().position(|sub| sub.id == self.id) else {
            return;
        };
        let (name, source) = (ledger.live[at].node.name(), ledger.live[at].source);
        if !ledger.leak_on_release {
            ledger.live.remove(at);
        }
        ledger.events.push(HostEvent::Released(name, source));
    }
}

impl LayoutHost for FakeHost {
    type Node = FakeNode;
    type Subscription = FakeSubscription;

    fn subscribe(
        &mut self,
        node: &FakeNode,
        source: SignalSource,
        listener: Listener,
    ) -> Result<FakeSubscription, HiveError> {
        if node.bounding_rect().is_none() {
            return Err(HiveError::MissingAnchor);
        }
        let mut ledger = self.ledger.borrow_mut();
        if ledger.refuse == Some(source) {
            return Err(HiveError::SubscriptionFailed { signal: source });
        }
        let id = ledger.next_id;
        ledger.next_id += 1;
        ledger.live.push(LiveSubscription {
            id,
            node: node.clone(),
            source,
            listener: Rc::new(RefCell::new(listener)),
        });
        ledger.events.push(HostEvent::Subscribed(node.name(), source));
        Ok(FakeSubscription {
            id,
            ledger: Rc::clone(&self.ledger),
        })
    }

    fn live_subscriptions(&self, node: &FakeNode) -> usize {
        self.ledger
            .borrow()
            .live
            .iter()
            .filter(|sub| sub.node == *node)
            .count()
    }
}

/// A surface that panics while drawing one chosen scene.
#[derive(Debug)]
pub(crate) struct PanickingSurface {
    pub(crate) inner: HeadlessSurface<&'static str>,
    pub(crate) panic_on: &'static str,
}

impl RenderSurface for PanickingSurface {
    type Scene = &'static str;
    type Error = hive_sync::InjectedFailure;

    fn canvas_size(&self) -> CanvasSize {
        self.inner.canvas_size()
    }

    fn auto_clear(&self) -> bool {
        self.inner.auto_clear()
    }

    fn set_auto_clear(&mut self, enabled: bool) {
        self.inner.set_auto_clear(enabled);
    }

    fn set_viewport(&mut self, rect: ScissorRect) {
        self.inner.set_viewport(rect);
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.inner.set_scissor(rect);
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.inner.set_scissor_test(enabled);
    }

    fn clear_color(&self) -> Color {
        self.inner.clear_color()
    }

    fn set_clear_color(&mut self, color: Color) {
        self.inner.set_clear_color(color);
    }

    fn clear(&mut self, color: bool, depth: bool) {
        self.inner.clear(color, depth);
    }

    fn camera_mut(&mut self) -> &mut Camera {
        self.inner.camera_mut()
    }

    fn render(&mut self, target: SceneTarget<'_, &'static str>) -> Result<(), Self::Error> {
        if let SceneTarget::Subscene(scene) = target {
            assert_ne!(*scene, self.panic_on, "scene {scene} blew up");
        }
        self.inner.render(target)
    }
}

/// The reference rectangle: 200x200 at (100, 50).
pub(crate) fn reference_rect() -> TrackRect {
    TrackRect::from_edges(100.0, 50.0, 300.0, 250.0)
}
