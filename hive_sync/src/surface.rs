// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared rendering surface contract and a headless reference surface.

use alloc::vec::Vec;
use core::fmt::Debug;

use hive_geometry::{Camera, CanvasSize, ScissorRect};
use peniko::Color;

/// What a region draws: its private subscene, or the surface's main scene.
#[derive(Debug)]
pub enum SceneTarget<'a, Sc> {
    /// The surface's main scene.
    Main,
    /// A region's private scene graph.
    Subscene(&'a Sc),
}

impl<Sc> Clone for SceneTarget<'_, Sc> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Sc> Copy for SceneTarget<'_, Sc> {}

/// Host rendering surface shared by every region.
///
/// The mutable state (viewport, scissor, auto clear, clear colour) is one
/// object for all regions; the engine restores what it changes before
/// moving on to the next region.
pub trait RenderSurface {
    /// Scene graph type drawn by [`render`](Self::render).
    type Scene;
    /// Draw failure.
    type Error: Debug;

    /// Rectangle of the surface in document coordinates.
    fn canvas_size(&self) -> CanvasSize;

    /// Whether the surface clears itself before each draw.
    fn auto_clear(&self) -> bool;
    /// Sets [`auto_clear`](Self::auto_clear).
    fn set_auto_clear(&mut self, enabled: bool);

    /// Sets the viewport rectangle.
    fn set_viewport(&mut self, rect: ScissorRect);
    /// Sets the scissor rectangle.
    fn set_scissor(&mut self, rect: ScissorRect);
    /// Enables or disables the scissor test.
    fn set_scissor_test(&mut self, enabled: bool);

    /// Current clear colour.
    fn clear_color(&self) -> Color;
    /// Sets the clear colour.
    fn set_clear_color(&mut self, color: Color);
    /// Clears the colour and/or depth buffers, honouring the scissor test.
    fn clear(&mut self, color: bool, depth: bool);

    /// The camera used for drawing.
    fn camera_mut(&mut self) -> &mut Camera;

    /// Draws `target` with the surface camera.
    ///
    /// # Errors
    ///
    /// Whatever the host reports for a failed draw.
    fn render(&mut self, target: SceneTarget<'_, Self::Scene>) -> Result<(), Self::Error>;
}

/// Plain record of the mutable surface state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceState {
    /// Viewport rectangle.
    pub viewport: ScissorRect,
    /// Scissor rectangle.
    pub scissor: ScissorRect,
    /// Whether the scissor test is enabled.
    pub scissor_enabled: bool,
    /// Whether the surface clears before drawing.
    pub auto_clear: bool,
    /// Clear colour.
    pub clear_color: Color,
}

impl SurfaceState {
    /// Default state for a surface of `canvas`: full-canvas viewport and
    /// scissor, scissor test off, auto clear on.
    #[must_use]
    pub fn for_canvas(canvas: &CanvasSize) -> Self {
        let full = ScissorRect {
            x: 0.0,
            y: 0.0,
            width: canvas.width,
            height: canvas.height,
        };
        Self {
            viewport: full,
            scissor: full,
            scissor_enabled: false,
            auto_clear: true,
            clear_color: Color::TRANSPARENT,
        }
    }
}

/// Which scene a recorded draw used.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawnScene<Id> {
    /// The main scene.
    Main,
    /// A subscene, identified by the caller's scene value.
    Subscene(Id),
}

/// One draw call recorded by [`HeadlessSurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord<Id> {
    /// Which scene was drawn.
    pub scene: DrawnScene<Id>,
    /// Surface state at the time of the draw.
    pub state: SurfaceState,
    /// Camera at the time of the draw.
    pub camera: Camera,
}

/// Draw failure injected into a [`HeadlessSurface`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("injected draw failure")]
pub struct InjectedFailure;

/// A surface that records draw calls instead of rasterizing.
///
/// Useful as a reference for host implementations and for testing
/// consumers. Scenes are identified by value: any `Clone` type works.
#[derive(Clone, Debug)]
pub struct HeadlessSurface<Sc> {
    canvas: CanvasSize,
    state: SurfaceState,
    camera: Camera,
    draws: Vec<DrawRecord<Sc>>,
    clears: Vec<SurfaceState>,
    fail_next: bool,
}

impl<Sc: Clone> HeadlessSurface<Sc> {
    /// Creates a surface for `canvas` with a default camera.
    #[must_use]
    pub fn new(canvas: CanvasSize) -> Self {
        Self::with_camera(canvas, Camera::default())
    }

    /// Creates a surface for `canvas` drawing through `camera`.
    #[must_use]
    pub fn with_camera(canvas: CanvasSize, camera: Camera) -> Self {
        Self {
            canvas,
            state: SurfaceState::for_canvas(&canvas),
            camera,
            draws: Vec::new(),
            clears: Vec::new(),
            fail_next: false,
        }
    }

    /// Current surface state.
    #[must_use]
    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    /// Resizes the surface.
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// Camera used for drawing.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Draws recorded so far.
    #[must_use]
    pub fn draws(&self) -> &[DrawRecord<Sc>] {
        &self.draws
    }

    /// Surface state at each explicit clear.
    #[must_use]
    pub fn clears(&self) -> &[SurfaceState] {
        &self.clears
    }

    /// Forgets recorded draws and clears.
    pub fn reset_records(&mut self) {
        self.draws.clear();
        self.clears.clear();
    }

    /// Makes the next [`render`](RenderSurface::render) call fail.
    pub fn fail_next_draw(&mut self) {
        self.fail_next = true;
    }
}

impl<Sc: Clone> RenderSurface for HeadlessSurface<Sc> {
    type Scene = Sc;
    type Error = InjectedFailure;

    fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    fn auto_clear(&self) -> bool {
        self.state.auto_clear
    }

    fn set_auto_clear(&mut self, enabled: bool) {
        self.state.auto_clear = enabled;
    }

    fn set_viewport(&mut self, rect: ScissorRect) {
        self.state.viewport = rect;
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.state.scissor = rect;
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.state.scissor_enabled = enabled;
    }

    fn clear_color(&self) -> Color {
        self.state.clear_color
    }

    fn set_clear_color(&mut self, color: Color) {
        self.state.clear_color = color;
    }

    fn clear(&mut self, _color: bool, _depth: bool) {
        self.clears.push(self.state);
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    fn render(&mut self, target: SceneTarget<'_, Sc>) -> Result<(), InjectedFailure> {
        if core::mem::take(&mut self.fail_next) {
            return Err(InjectedFailure);
        }
        let scene = match target {
            SceneTarget::Main => DrawnScene::Main,
            SceneTarget::Subscene(scene) => DrawnScene::Subscene(scene.clone()),
        };
        self.draws.push(DrawRecord {
            scene,
            state: self.state,
            camera: self.camera.clone(),
        });
        Ok(())
    }
}
