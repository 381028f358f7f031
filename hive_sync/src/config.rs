// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hive_geometry::DEFAULT_PADDING;

/// Engine-wide settings.
///
/// ```rust
/// use hive_sync::HiveConfig;
///
/// let config = HiveConfig::default().with_padding(0.5);
/// assert_eq!(config.padding(), 0.5);
///
/// // Negative or non-finite padding falls back to sane values.
/// assert_eq!(HiveConfig::default().with_padding(-1.0).padding(), 0.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HiveConfig {
    padding: f64,
    intersection_prefilter: bool,
}

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            intersection_prefilter: true,
        }
    }
}

impl HiveConfig {
    /// Vertical padding factor for the offscreen window and the overlay.
    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Sets the padding factor.
    ///
    /// Negative values clamp to `0`; NaN and infinities reset to
    /// [`DEFAULT_PADDING`].
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = if padding.is_finite() {
            padding.max(0.0)
        } else {
            DEFAULT_PADDING
        };
        self
    }

    /// Whether a positive viewport-intersection report forces a region
    /// onscreen regardless of the padded math.
    #[must_use]
    pub fn intersection_prefilter(&self) -> bool {
        self.intersection_prefilter
    }

    /// Enables or disables the intersection pre-filter.
    #[must_use]
    pub fn with_intersection_prefilter(mut self, enabled: bool) -> Self {
        self.intersection_prefilter = enabled;
        self
    }
}
