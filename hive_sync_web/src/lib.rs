// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser host for Hive.
//!
//! On `wasm32` this crate provides:
//! - [`WebNode`] and [`WebLayoutHost`]: region anchors measured with
//!   `getBoundingClientRect`, tracked by a `ResizeObserver`, an
//!   `IntersectionObserver`, and a passive window `scroll` listener.
//! - [`OverlayElement`] and [`follow_scroll`]: the scroll-locked overlay.
//! - [`pointer_input`]: DOM pointer events for region routing.
//! - [`FrameLoop`]: a `requestAnimationFrame` loop to drive the render pass.
//!
//! The rendering surface itself is left to the embedding application, which
//! implements [`hive_sync::RenderSurface`] over its WebGL or WebGPU context.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn host() -> Option<hive_sync_web::WebLayoutHost> {
//!     Some(hive_sync_web::WebLayoutHost::new(web_sys::window()?))
//! }
//! ```
//!
//! On other targets the crate is empty.

#![no_std]

extern crate alloc;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod listener;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod pointer;
#[cfg(target_arch = "wasm32")]
mod raf;

#[cfg(target_arch = "wasm32")]
pub use host::{WebLayoutHost, WebNode, WebSubscription, window_metrics};
#[cfg(target_arch = "wasm32")]
pub use listener::PassiveListener;
#[cfg(target_arch = "wasm32")]
pub use overlay::{OverlayElement, ScrollBinding, follow_scroll};
#[cfg(target_arch = "wasm32")]
pub use pointer::pointer_input;
#[cfg(target_arch = "wasm32")]
pub use raf::FrameLoop;
