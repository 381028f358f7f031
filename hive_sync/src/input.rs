// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer remapping into region-local space, and the shared active input
//! target.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hive_geometry::{Camera, Ray, TrackRect};
use kurbo::{Point, Size};

use crate::registry::RegionId;

/// A pointer event as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInput<N> {
    /// The node the event was dispatched to.
    pub target: N,
    /// Pointer position in viewport (client) coordinates.
    pub client: Point,
}

/// A pointer event remapped into one region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoutedPointer {
    /// The region that received the event.
    pub region: RegionId,
    /// Pointer position in normalized device coordinates of the region.
    pub ndc: Point,
    /// World-space ray through the pointer, for hit testing.
    pub ray: Ray,
}

/// Remaps `client` into `rect` and casts a ray through `camera`.
///
/// The camera is refit to the region's size first, so the ray matches what
/// the region drew. Returns `None` for a degenerate rectangle.
#[must_use]
pub fn route_pointer(
    region: RegionId,
    rect: &TrackRect,
    client: Point,
    camera: &Camera,
) -> Option<RoutedPointer> {
    let ndc = rect.to_ndc(client)?;
    let mut camera = camera.clone();
    camera.fit_to_region(Size::new(rect.width, rect.height));
    Some(RoutedPointer {
        region,
        ndc,
        ray: camera.ray_from_ndc(ndc),
    })
}

#[derive(Debug)]
struct InputTarget<N> {
    fallback: Option<N>,
    stack: Vec<(u64, N)>,
    next_token: u64,
}

/// The surface's active input target.
///
/// Regions that receive input [`connect`](Self::connect) their anchor; the
/// most recent live connection wins. Dropping an [`InputConnection`]
/// removes exactly that connection, so releases may happen in any order.
pub struct ConnectedInput<N> {
    inner: Rc<RefCell<InputTarget<N>>>,
}

impl<N: fmt::Debug> fmt::Debug for ConnectedInput<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectedInput")
            .field("inner", &self.inner.borrow())
            .finish()
    }
}

impl<N> Clone for ConnectedInput<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<N: Clone> ConnectedInput<N> {
    /// Creates a target that falls back to `fallback` when nothing is
    /// connected.
    #[must_use]
    pub fn new(fallback: Option<N>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(InputTarget {
                fallback,
                stack: Vec::new(),
                next_token: 0,
            })),
        }
    }

    /// Replaces the fallback target.
    pub fn set_fallback(&self, fallback: Option<N>) {
        self.inner.borrow_mut().fallback = fallback;
    }

    /// The node currently receiving input.
    #[must_use]
    pub fn current(&self) -> Option<N> {
        let inner = self.inner.borrow();
        inner
            .stack
            .last()
            .map(|(_, node)| node.clone())
            .or_else(|| inner.fallback.clone())
    }

    /// Number of live connections.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.borrow().stack.len()
    }

    /// Redirects input to `node` until the returned guard is dropped.
    #[must_use = "dropping the connection restores the previous target immediately"]
    pub fn connect(&self, node: N) -> InputConnection<N> {
        let mut inner = self.inner.borrow_mut();
        let token = inner.next_token;
        inner.next_token += 1;
        inner.stack.push((token, node));
        InputConnection {
            inner: Rc::clone(&self.inner),
            token,
        }
    }
}

/// A live redirection of the active input target.
pub struct InputConnection<N> {
    inner: Rc<RefCell<InputTarget<N>>>,
    token: u64,
}

impl<N> fmt::Debug for InputConnection<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputConnection")
            .field("inner", &"ConnectedInput")
            .field("token", &self.token)
            .finish()
    }
}

impl<N> Drop for InputConnection<N> {
    fn drop(&mut self) {
        let token = self.token;
        self.inner
            .borrow_mut()
            .stack
            .retain(|(other, _)| *other != token);
    }
}
