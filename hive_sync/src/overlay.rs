// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The oversized, scroll-locked overlay the surface is mounted into.
//!
//! The overlay is taller than the viewport by the padding factor on both
//! sides, so regions just outside the visible area are already rendered when
//! they scroll in. It is moved with a compositor transform on every scroll
//! rather than relaid out.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};

use hive_geometry::ViewportMetrics;
use kurbo::Vec2;

use crate::config::HiveConfig;

/// CSS property writes on the overlay element.
pub trait OverlayStyle {
    /// Sets one inline style property.
    fn set_property(&mut self, name: &str, value: &str);
}

/// A plain property map, for headless use.
impl OverlayStyle for BTreeMap<String, String> {
    fn set_property(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

/// Translation of the overlay for the given window metrics.
///
/// `x` follows the horizontal scroll; `y` is the scroll position minus the
/// top padding.
#[must_use]
pub fn overlay_translation(metrics: &ViewportMetrics, padding: f64) -> Vec2 {
    Vec2::new(metrics.scroll_x, metrics.scroll_offset(padding))
}

/// One overlay element kept in lockstep with page scroll.
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// use hive_geometry::ViewportMetrics;
/// use hive_sync::{HiveConfig, ScrollOverlay};
///
/// let mut overlay = ScrollOverlay::new(BTreeMap::new(), &HiveConfig::default());
/// overlay.mount();
/// overlay.on_scroll(&ViewportMetrics::new(0.0, 1000.0, 600.0));
///
/// let style = overlay.element();
/// assert_eq!(style["height"], "calc(100lvh * 1.5)");
/// assert_eq!(style["transform"], "translate3d(0px, 850px, 0)");
/// ```
#[derive(Clone, Debug)]
pub struct ScrollOverlay<E> {
    element: E,
    padding: f64,
    translation: Option<Vec2>,
}

impl<E: OverlayStyle> ScrollOverlay<E> {
    /// Wraps `element`. Nothing is written until [`mount`](Self::mount).
    #[must_use]
    pub fn new(element: E, config: &HiveConfig) -> Self {
        Self {
            element,
            padding: config.padding(),
            translation: None,
        }
    }

    /// Applies the static overlay styles.
    pub fn mount(&mut self) {
        let height = format!("calc(100lvh * {})", 1.0 + 2.0 * self.padding);
        let el = &mut self.element;
        el.set_property("position", "absolute");
        el.set_property("top", "0");
        el.set_property("left", "0");
        el.set_property("z-index", "1");
        el.set_property("overflow", "hidden");
        el.set_property("will-change", "transform");
        el.set_property("pointer-events", "none");
        el.set_property("width", "100%");
        el.set_property("height", &height);
        self.translation = None;
    }

    /// Re-translates the overlay for a scroll event.
    ///
    /// Returns `true` if the transform was written; an unchanged translation
    /// is not written again.
    pub fn on_scroll(&mut self, metrics: &ViewportMetrics) -> bool {
        let translation = overlay_translation(metrics, self.padding);
        if self.translation == Some(translation) {
            return false;
        }
        self.element.set_property(
            "transform",
            &format!("translate3d({}px, {}px, 0)", translation.x, translation.y),
        );
        self.translation = Some(translation);
        true
    }

    /// The last written translation.
    #[must_use]
    pub fn translation(&self) -> Option<Vec2> {
        self.translation
    }

    /// The overlay element.
    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Unwraps the overlay element.
    #[must_use]
    pub fn into_inner(self) -> E {
        self.element
    }
}
