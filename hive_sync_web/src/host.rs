// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`LayoutHost`] over the DOM.
//!
//! Each region anchor gets a `ResizeObserver`, an `IntersectionObserver`
//! with the default threshold of `0`, and a passive `scroll` listener on the
//! window. Each of the three is held by a [`WebSubscription`]; dropping it
//! disconnects the observer or removes the listener.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use hive_geometry::{TrackRect, ViewportMetrics};
use hive_sync::{HiveError, LayoutHost, Listener, Signal, SignalSource, TrackedNode};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, ResizeObserver, Window};

use crate::listener::PassiveListener;

/// Scroll position and height of `window`.
///
/// Properties the browser refuses to report read as `0`.
#[must_use]
pub fn window_metrics(window: &Window) -> ViewportMetrics {
    ViewportMetrics::new(
        window.scroll_x().unwrap_or(0.0),
        window.scroll_y().unwrap_or(0.0),
        window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0),
    )
}

/// A DOM element used as a region anchor.
///
/// Holding a `WebNode` does not keep the element in the document; once it is
/// detached it measures as `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebNode(pub Element);

impl WebNode {
    /// The wrapped element.
    #[must_use]
    pub fn element(&self) -> &Element {
        &self.0
    }
}

impl From<Element> for WebNode {
    fn from(element: Element) -> Self {
        Self(element)
    }
}

impl TrackedNode for WebNode {
    fn bounding_rect(&self) -> Option<TrackRect> {
        if !self.0.is_connected() {
            return None;
        }
        let rect = self.0.get_bounding_client_rect();
        Some(TrackRect {
            left: rect.left(),
            top: rect.top(),
            right: rect.right(),
            bottom: rect.bottom(),
            width: rect.width(),
            height: rect.height(),
        })
    }

    fn viewport(&self) -> ViewportMetrics {
        web_sys::window()
            .map(|window| window_metrics(&window))
            .unwrap_or_default()
    }
}

enum Binding {
    Resize {
        observer: ResizeObserver,
        _closure: Closure<dyn FnMut()>,
    },
    Intersection {
        observer: IntersectionObserver,
        _closure: Closure<dyn FnMut(js_sys::Array)>,
    },
    Scroll(PassiveListener),
}

/// One live observer or listener for one anchor.
pub struct WebSubscription {
    binding: Binding,
    id: u64,
    ledger: Rc<RefCell<Vec<(u64, WebNode)>>>,
}

impl core::fmt::Debug for WebSubscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let binding = match self.binding {
            Binding::Resize { .. } => "ResizeObserver",
            Binding::Intersection { .. } => "IntersectionObserver",
            Binding::Scroll(_) => "scroll",
        };
        f.debug_struct("WebSubscription")
            .field("binding", &binding)
            .field("id", &self.id)
            .field("ledger", &"WebLayoutHost")
            .finish()
    }
}

impl Drop for WebSubscription {
    fn drop(&mut self) {
        match &self.binding {
            Binding::Resize { observer, .. } => observer.disconnect(),
            Binding::Intersection { observer, .. } => observer.disconnect(),
            // The listener removes itself when dropped.
            Binding::Scroll(_) => {}
        }
        let id = self.id;
        self.ledger.borrow_mut().retain(|(other, _)| *other != id);
    }
}

/// Browser layout host.
pub struct WebLayoutHost {
    window: Window,
    next_id: u64,
    ledger: Rc<RefCell<Vec<(u64, WebNode)>>>,
}

impl core::fmt::Debug for WebLayoutHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebLayoutHost")
            .field("window", &"Window")
            .field("next_id", &self.next_id)
            .field("ledger", &self.ledger.borrow().len())
            .finish()
    }
}

impl WebLayoutHost {
    /// Creates a host for nodes living in `window`.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_id: 0,
            ledger: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The window scroll listeners attach to.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    fn bind(
        &self,
        node: &WebNode,
        source: SignalSource,
        mut listener: Listener,
    ) -> Result<Binding, JsValue> {
        match source {
            SignalSource::Resize => {
                let closure =
                    Closure::wrap(Box::new(move || listener(Signal::Resize)) as Box<dyn FnMut()>);
                let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())?;
                observer.observe(&node.0);
                Ok(Binding::Resize {
                    observer,
                    _closure: closure,
                })
            }
            SignalSource::Intersection => {
                let closure = Closure::wrap(Box::new(move |entries: js_sys::Array| {
                    // Entries arrive oldest first; only the latest state matters.
                    let latest = entries
                        .iter()
                        .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                        .last();
                    if let Some(entry) = latest {
                        listener(Signal::Intersection {
                            intersecting: entry.is_intersecting(),
                        });
                    }
                })
                    as Box<dyn FnMut(js_sys::Array)>);
                let observer = IntersectionObserver::new(closure.as_ref().unchecked_ref())?;
                observer.observe(&node.0);
                Ok(Binding::Intersection {
                    observer,
                    _closure: closure,
                })
            }
            SignalSource::Scroll => {
                let scroll =
                    PassiveListener::new(&self.window, "scroll", move || listener(Signal::Scroll))?;
                Ok(Binding::Scroll(scroll))
            }
        }
    }
}

impl LayoutHost for WebLayoutHost {
    type Node = WebNode;
    type Subscription = WebSubscription;

    fn subscribe(
        &mut self,
        node: &WebNode,
        source: SignalSource,
        listener: Listener,
    ) -> Result<WebSubscription, HiveError> {
        if !node.0.is_connected() {
            return Err(HiveError::MissingAnchor);
        }
        let binding = self.bind(node, source, listener).map_err(|err| {
            log::warn!("could not subscribe {source:?} on {:?}: {err:?}", node.0);
            HiveError::SubscriptionFailed { signal: source }
        })?;

        let id = self.next_id;
        self.next_id += 1;
        self.ledger.borrow_mut().push((id, node.clone()));
        Ok(WebSubscription {
            binding,
            id,
            ledger: Rc::clone(&self.ledger),
        })
    }

    fn live_subscriptions(&self, node: &WebNode) -> usize {
        self.ledger
            .borrow()
            .iter()
            .filter(|(_, other)| other == node)
            .count()
    }
}
