// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle types shared by the surface and the tracked regions.

use kurbo::{Point, Rect, Size};

/// Rectangle of the shared rendering surface in document coordinates.
///
/// Produced by the host surface each time its size changes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CanvasSize {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl CanvasSize {
    /// Creates a canvas rectangle from its origin and extent.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge (`top + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Extent as a [`Size`].
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Bounding rectangle of a tracked node in viewport coordinates.
///
/// This mirrors what a DOM `getBoundingClientRect()` call reports. The
/// redundant `width`/`height` fields are kept so a host can pass the browser's
/// values through untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TrackRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Width (`right - left`).
    pub width: f64,
    /// Height (`bottom - top`).
    pub height: f64,
}

impl TrackRect {
    /// Creates a rectangle from its edges, deriving `width` and `height`.
    #[must_use]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Returns `true` if the rectangle covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Maps a client-space point into normalized device coordinates of this
    /// rectangle.
    ///
    /// The left/right edges map to `-1`/`1` and the top/bottom edges map to
    /// `1`/`-1`. Returns `None` for an empty rectangle.
    #[must_use]
    pub fn to_ndc(&self, client: Point) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        let x = client.x - self.left;
        let y = client.y - self.top;
        Some(Point::new(
            x / self.width * 2.0 - 1.0,
            -(y / self.height) * 2.0 + 1.0,
        ))
    }
}

impl From<Rect> for TrackRect {
    fn from(rect: Rect) -> Self {
        Self::from_edges(rect.x0, rect.y0, rect.x1, rect.y1)
    }
}

impl From<TrackRect> for Rect {
    fn from(rect: TrackRect) -> Self {
        Self::new(rect.left, rect.top, rect.right, rect.bottom)
    }
}

/// A [`TrackRect`] expressed relative to a [`CanvasSize`].
///
/// `left` and `bottom` are canvas-local with a bottom-left origin, which is
/// what viewport and scissor calls expect. `top` and `right` keep the raw
/// viewport-space values of the source rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Position {
    /// Width of the region.
    pub width: f64,
    /// Height of the region.
    pub height: f64,
    /// Distance from the canvas's left edge.
    pub left: f64,
    /// Viewport-space top edge of the source rectangle.
    pub top: f64,
    /// Distance from the canvas's bottom edge.
    pub bottom: f64,
    /// Viewport-space right edge of the source rectangle.
    pub right: f64,
}

impl Position {
    /// The viewport/scissor rectangle for this position.
    #[must_use]
    pub fn scissor_rect(&self) -> ScissorRect {
        ScissorRect {
            x: self.left,
            y: self.bottom,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns `true` if the region covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Region extent as a [`Size`].
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Rebuilds the viewport-space rectangle this position was derived from.
    #[must_use]
    pub fn to_track_rect(&self, canvas: &CanvasSize) -> TrackRect {
        TrackRect {
            left: self.left + canvas.left,
            top: self.top,
            right: self.right,
            bottom: canvas.bottom() - self.bottom,
            width: self.width,
            height: self.height,
        }
    }
}

/// Viewport or scissor rectangle with a bottom-left origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScissorRect {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Transforms a viewport-space rectangle into canvas-local coordinates.
///
/// `left = rect.left - canvas.left` and
/// `bottom = (canvas.top + canvas.height) - rect.bottom`.
#[must_use]
pub fn to_local_position(canvas: &CanvasSize, rect: &TrackRect) -> Position {
    Position {
        width: rect.width,
        height: rect.height,
        left: rect.left - canvas.left,
        top: rect.top,
        bottom: canvas.bottom() - rect.bottom,
        right: rect.right,
    }
}
