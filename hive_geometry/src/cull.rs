// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Padded offscreen culling.
//!
//! Regions are tested against a window that extends well past the visible
//! viewport, so a region about to scroll into view is already rendering by
//! the time it appears.

use crate::rect::{CanvasSize, Position};

/// Default vertical padding factor, as a fraction of the viewport height.
pub const DEFAULT_PADDING: f64 = 0.25;

/// Scroll position and size of the browser viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    /// Horizontal document scroll.
    pub scroll_x: f64,
    /// Vertical document scroll.
    pub scroll_y: f64,
    /// Height of the visible viewport.
    pub inner_height: f64,
}

impl ViewportMetrics {
    /// Creates viewport metrics.
    #[must_use]
    pub const fn new(scroll_x: f64, scroll_y: f64, inner_height: f64) -> Self {
        Self {
            scroll_x,
            scroll_y,
            inner_height,
        }
    }

    /// Document-space origin of the padded window: `scroll_y - inner_height * padding`.
    #[must_use]
    pub fn scroll_offset(&self, padding: f64) -> f64 {
        self.scroll_y - self.inner_height * padding
    }

    /// Height of the padded window: `inner_height * (1 + 2 * padding)`.
    #[must_use]
    pub fn extended_height(&self, padding: f64) -> f64 {
        self.inner_height * (1.0 + padding * 2.0)
    }

    /// Document-space vertical range a region must overlap to be rendered.
    ///
    /// Returns `(lower, upper)`.
    #[must_use]
    pub fn render_window(&self, padding: f64) -> (f64, f64) {
        let offset = self.scroll_offset(padding);
        let extended = self.extended_height(padding);
        (offset - extended * 0.5, offset + extended * 1.5)
    }
}

/// Returns `true` when a region should be skipped for being far offscreen.
///
/// The region's vertical extent is moved into document space by adding
/// `scroll_y` and compared against
/// [`ViewportMetrics::render_window`]. Horizontally the region must overlap
/// the canvas. Both windows are open: a region that only touches a bound is
/// offscreen.
#[must_use]
pub fn is_offscreen(
    position: &Position,
    canvas: &CanvasSize,
    scroll_y: f64,
    viewport_height: f64,
    padding: f64,
) -> bool {
    let metrics = ViewportMetrics::new(0.0, scroll_y, viewport_height);
    let (lower, upper) = metrics.render_window(padding);

    let element_top = position.top + scroll_y;
    let element_bottom = position.top + position.height + scroll_y;
    let vertically_out = element_bottom <= lower || element_top >= upper;

    // `left` is already canvas-local; `right` is raw viewport space.
    let local_right = position.right - canvas.left;
    let horizontally_out = local_right <= 0.0 || position.left >= canvas.width;

    vertically_out || horizontally_out
}

/// [`is_offscreen`] with the scroll state taken from `metrics`.
#[must_use]
pub fn is_offscreen_in(
    position: &Position,
    canvas: &CanvasSize,
    metrics: &ViewportMetrics,
    padding: f64,
) -> bool {
    is_offscreen(
        position,
        canvas,
        metrics.scroll_y,
        metrics.inner_height,
        padding,
    )
}
