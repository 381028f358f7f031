// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay element and its scroll wiring.

use alloc::rc::Rc;
use core::cell::RefCell;

use hive_sync::{OverlayStyle, ScrollOverlay};
use wasm_bindgen::JsValue;
use web_sys::{HtmlElement, Window};

use crate::host::window_metrics;
use crate::listener::PassiveListener;

/// The `<div>` the rendering surface is mounted into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayElement(pub HtmlElement);

impl OverlayStyle for OverlayElement {
    fn set_property(&mut self, name: &str, value: &str) {
        let _ = self.0.style().set_property(name, value);
    }
}

/// Keeps a mounted overlay translated with the page until dropped.
#[derive(Debug)]
pub struct ScrollBinding {
    _listener: PassiveListener,
}

/// Mounts `overlay`, positions it for the current scroll, and re-translates
/// it on every window scroll.
///
/// # Errors
///
/// The exception thrown by `addEventListener`.
pub fn follow_scroll(
    overlay: &Rc<RefCell<ScrollOverlay<OverlayElement>>>,
    window: &Window,
) -> Result<ScrollBinding, JsValue> {
    {
        let mut overlay = overlay.borrow_mut();
        overlay.mount();
        overlay.on_scroll(&window_metrics(window));
    }

    let overlay = Rc::clone(overlay);
    let scrolled = window.clone();
    let listener = PassiveListener::new(window, "scroll", move || {
        overlay.borrow_mut().on_scroll(&window_metrics(&scrolled));
    })?;
    Ok(ScrollBinding {
        _listener: listener,
    })
}
