// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame, per-region scissored drawing.
//!
//! A [`RenderGate`] decides whether its region draws this frame. When it
//! does, it enters a [`ScissorScope`] that restricts the shared surface to
//! the region's rectangle; leaving the scope, by any path, puts the scissor
//! test and auto-clear flag back the way the next region expects them.

use core::fmt;
use core::ops::{Deref, DerefMut};

use hive_geometry::Position;

use crate::observer::RegionSnapshot;
use crate::registry::RegionOptions;
use crate::surface::{RenderSurface, SceneTarget};

/// How many frames a region is expected to render.
///
/// The counter is informational: it never gates drawing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FrameBudget {
    /// Keep counting for as long as the region lives.
    #[default]
    Unbounded,
    /// Stop counting once the count passes this many frames.
    Frames(u32),
}

impl FrameBudget {
    /// Whether a frame at `frame_count` is still counted.
    #[must_use]
    pub fn counts(self, frame_count: u32) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Frames(budget) => frame_count <= budget,
        }
    }
}

/// What a region draws.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegionContent<Sc> {
    /// The region declares no private scene and draws the surface's main
    /// scene.
    MainScene,
    /// The region draws its own scene in isolation.
    Subscene(Sc),
}

impl<Sc> RegionContent<Sc> {
    /// The scene the surface should draw for this content.
    #[must_use]
    pub fn target(&self) -> SceneTarget<'_, Sc> {
        match self {
            Self::MainScene => SceneTarget::Main,
            Self::Subscene(scene) => SceneTarget::Subscene(scene),
        }
    }
}

/// Why a gate did not draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The gate is stopped.
    Stopped,
    /// The region has never been measured.
    Unmeasured,
    /// The author hid the region.
    Hidden,
    /// The region is outside the padded window.
    Offscreen,
    /// The region has no area.
    Empty,
}

/// Result of one gate invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateOutcome {
    /// The region was drawn.
    Drawn,
    /// Nothing was touched.
    Skipped(SkipReason),
}

/// Scoped scissor state on a shared surface.
///
/// Entering snapshots `auto_clear`, then sets viewport and scissor to the
/// region, enables the scissor test, and disables auto clear. Dropping the
/// scope disables the scissor test and restores `auto_clear`, including
/// when the draw returns an error or panics.
pub struct ScissorScope<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
    prior_auto_clear: bool,
}

impl<S: RenderSurface + ?Sized> fmt::Debug for ScissorScope<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScissorScope")
            .field("surface", &"RenderSurface")
            .field("prior_auto_clear", &self.prior_auto_clear)
            .finish()
    }
}

impl<'a, S: RenderSurface + ?Sized> ScissorScope<'a, S> {
    /// Restricts `surface` to `position` until the scope is dropped.
    pub fn enter(surface: &'a mut S, position: &Position) -> Self {
        let prior_auto_clear = surface.auto_clear();
        surface.set_auto_clear(false);
        let rect = position.scissor_rect();
        surface.set_viewport(rect);
        surface.set_scissor(rect);
        surface.set_scissor_test(true);
        Self {
            surface,
            prior_auto_clear,
        }
    }

    /// The `auto_clear` value that will be restored.
    #[must_use]
    pub fn prior_auto_clear(&self) -> bool {
        self.prior_auto_clear
    }
}

impl<S: RenderSurface + ?Sized> Deref for ScissorScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> DerefMut for ScissorScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> Drop for ScissorScope<'_, S> {
    fn drop(&mut self) {
        self.surface.set_scissor_test(false);
        self.surface.set_auto_clear(self.prior_auto_clear);
    }
}

/// Re-applies the clear colour and clears colour and depth.
///
/// Inside a [`ScissorScope`] this only touches the region's pixels.
pub fn clear_region<S: RenderSurface + ?Sized>(surface: &mut S) {
    let color = surface.clear_color();
    surface.set_clear_color(color);
    surface.clear(true, true);
}

/// Per-region draw decision and execution.
#[derive(Clone, Debug)]
pub struct RenderGate<Sc> {
    content: RegionContent<Sc>,
    visible: bool,
    clear: bool,
    frame_budget: FrameBudget,
    frame_count: u32,
    running: bool,
}

impl<Sc> RenderGate<Sc> {
    /// Creates a stopped gate.
    #[must_use]
    pub fn new(content: RegionContent<Sc>, options: &RegionOptions) -> Self {
        Self {
            content,
            visible: options.visible,
            clear: options.clear,
            frame_budget: options.frame_budget,
            frame_count: 0,
            running: false,
        }
    }

    /// Starts taking part in frames.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops taking part in frames. The frame count is kept.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns `true` between [`start`](Self::start) and [`stop`](Self::stop).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Author-controlled visibility.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the region.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Frames counted so far.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// The configured budget.
    #[must_use]
    pub fn frame_budget(&self) -> FrameBudget {
        self.frame_budget
    }

    /// What the region draws.
    #[must_use]
    pub fn content(&self) -> &RegionContent<Sc> {
        &self.content
    }

    /// Runs one frame for this region.
    ///
    /// Skips without touching `surface` when stopped, unmeasured, hidden,
    /// offscreen, or empty. Otherwise refits the surface camera to the
    /// region, draws inside a [`ScissorScope`], and restores the shared
    /// state before returning.
    ///
    /// # Errors
    ///
    /// The surface's draw error. Surface state is restored either way.
    pub fn render<S>(
        &mut self,
        surface: &mut S,
        snapshot: Option<&RegionSnapshot>,
    ) -> Result<GateOutcome, S::Error>
    where
        S: RenderSurface<Scene = Sc> + ?Sized,
    {
        if !self.running {
            return Ok(GateOutcome::Skipped(SkipReason::Stopped));
        }
        if self.frame_budget.counts(self.frame_count) {
            self.frame_count = self.frame_count.saturating_add(1);
        }

        let Some(snapshot) = snapshot else {
            return Ok(GateOutcome::Skipped(SkipReason::Unmeasured));
        };
        if !self.visible {
            return Ok(GateOutcome::Skipped(SkipReason::Hidden));
        }
        if snapshot.offscreen {
            return Ok(GateOutcome::Skipped(SkipReason::Offscreen));
        }
        let position = &snapshot.position;
        if position.is_empty() {
            return Ok(GateOutcome::Skipped(SkipReason::Empty));
        }

        surface.camera_mut().fit_to_region(position.size());
        let mut scope = ScissorScope::enter(surface, position);
        if self.clear {
            clear_region(&mut *scope);
        }
        scope.render(self.content.target())?;
        Ok(GateOutcome::Drawn)
    }
}
