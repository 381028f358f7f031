// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Passive DOM event listeners that unregister on drop.

use alloc::boxed::Box;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{AddEventListenerOptions, EventTarget};

/// A `{ passive: true }` listener for one event type.
pub struct PassiveListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl core::fmt::Debug for PassiveListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PassiveListener")
            .field("target", &"EventTarget")
            .field("event", &self.event)
            .field("closure", &"Closure")
            .finish()
    }
}

impl PassiveListener {
    /// Adds `callback` as a passive listener for `event` on `target`.
    ///
    /// # Errors
    ///
    /// The exception thrown by `addEventListener`.
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        callback: impl FnMut() + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);

        // Built by hand so the binding works across web-sys versions.
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"passive".into(), &JsValue::TRUE)?;
        let options: AddEventListenerOptions = options.unchecked_into();

        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for PassiveListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}
