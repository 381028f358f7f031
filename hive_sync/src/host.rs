// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts with the host layout layer (the DOM, in a browser).

use alloc::boxed::Box;
use core::fmt::Debug;

use hive_geometry::{TrackRect, ViewportMetrics};

use crate::error::HiveError;

/// A handle to a node whose on-screen rectangle is tracked.
///
/// Handles are weak in the sense that matters here: holding one never keeps
/// the node mounted. A node that has been detached measures as `None`.
pub trait TrackedNode: Clone + PartialEq + Debug + 'static {
    /// Current bounding rectangle in viewport coordinates, or `None` if the
    /// node is not mounted.
    fn bounding_rect(&self) -> Option<TrackRect>;

    /// Scroll position and height of the viewport the node lives in.
    fn viewport(&self) -> ViewportMetrics;
}

/// The three measurement sources a region observer subscribes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignalSource {
    /// The node's box metrics changed.
    Resize,
    /// The node's intersection with the viewport changed (threshold 0).
    Intersection,
    /// The document scrolled (passive listener).
    Scroll,
}

impl SignalSource {
    /// All sources, in subscription order.
    pub const ALL: [Self; 3] = [Self::Resize, Self::Intersection, Self::Scroll];
}

/// A notification delivered to a subscription's listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    /// The node was resized or reflowed.
    Resize,
    /// The node's viewport intersection changed.
    Intersection {
        /// Whether any part of the node overlaps the viewport.
        intersecting: bool,
    },
    /// The document scrolled.
    Scroll,
}

/// Callback a host invokes for each [`Signal`].
pub type Listener = Box<dyn FnMut(Signal)>;

/// Host-side subscription management.
///
/// Subscriptions are RAII handles: dropping one must release the underlying
/// observer or event listener.
pub trait LayoutHost {
    /// Node handle type.
    type Node: TrackedNode;
    /// Live subscription handle; dropping it unsubscribes.
    type Subscription;

    /// Subscribes `listener` to `source` for `node`.
    ///
    /// # Errors
    ///
    /// [`HiveError::MissingAnchor`] if the node is not mounted, or
    /// [`HiveError::SubscriptionFailed`] if the host refused the subscription.
    fn subscribe(
        &mut self,
        node: &Self::Node,
        source: SignalSource,
        listener: Listener,
    ) -> Result<Self::Subscription, HiveError>;

    /// Number of live subscriptions the host holds on behalf of `node`.
    ///
    /// Used to detect leaked observers after teardown. Hosts that cannot
    /// audit their subscriptions report `0`.
    fn live_subscriptions(&self, node: &Self::Node) -> usize {
        let _ = node;
        0
    }
}
