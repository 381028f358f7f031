// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hive_sync::PointerInput;
use kurbo::Point;
use wasm_bindgen::JsCast as _;
use web_sys::{Element, MouseEvent};

use crate::host::WebNode;

/// Converts a DOM mouse or pointer event for [`Hive::route_pointer`].
///
/// Returns `None` when the event has no element target.
///
/// [`Hive::route_pointer`]: hive_sync::Hive::route_pointer
#[must_use]
pub fn pointer_input(event: &MouseEvent) -> Option<PointerInput<WebNode>> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    Some(PointerInput {
        target: WebNode(target),
        client: Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
    })
}
