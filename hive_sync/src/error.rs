// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hive_geometry::GeometryError;

use crate::host::SignalSource;
use crate::registry::RegionId;

/// Errors reported by the synchronization engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HiveError {
    /// A camera operation was requested against the wrong projection kind.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// The tracked node is not mounted yet. Transient: observers retry and
    /// gates skip until a measurement succeeds.
    #[error("tracked node is not mounted")]
    MissingAnchor,
    /// The host refused a subscription.
    #[error("host refused the {signal:?} subscription")]
    SubscriptionFailed {
        /// Source that could not be subscribed.
        signal: SignalSource,
    },
    /// A region was torn down while the host still held subscriptions for
    /// its node.
    #[error("region {region:?} left {live} live subscription(s) after teardown")]
    ObserverLeak {
        /// The region that was unregistered.
        region: RegionId,
        /// Subscriptions the host still reports.
        live: usize,
    },
}
