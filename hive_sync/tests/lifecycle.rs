// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region registration, teardown, anchor changes, and input routing.

mod common;

use common::{CANVAS, FakeHost, HostEvent, Window, reference_rect};
use hive_geometry::Camera;
use hive_sync::{
    HeadlessSurface, Hive, HiveConfig, HiveError, PointerInput, RegionContent, RegionOptions,
    Signal, SignalSource,
};
use kurbo::Point;

fn hive() -> Hive<FakeHost, &'static str> {
    Hive::new(FakeHost::default(), CANVAS, HiveConfig::default())
}

#[test]
fn registration_subscribes_all_three_sources() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let id = hive
        .register_region(
            window.node("a", reference_rect()),
            RegionContent::Subscene("a"),
            RegionOptions::default(),
        )
        .unwrap();

    assert_eq!(
        hive.host().events(),
        [
            HostEvent::Subscribed("a", SignalSource::Resize),
            HostEvent::Subscribed("a", SignalSource::Intersection),
            HostEvent::Subscribed("a", SignalSource::Scroll),
        ]
    );
    let region = hive.region(id).unwrap();
    assert!(region.is_tracking());
    assert_eq!(region.subscriptions(), 3);
    assert!(region.snapshot().is_some());
}

#[test]
fn unregister_twice_tears_down_once() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let id = hive
        .register_region(
            window.node("a", reference_rect()),
            RegionContent::Subscene("a"),
            RegionOptions::default(),
        )
        .unwrap();

    assert_eq!(hive.unregister_region(id), Ok(true));
    assert_eq!(hive.host().released(), 3);
    assert_eq!(hive.host().live_total(), 0);

    assert_eq!(hive.unregister_region(id), Ok(false));
    assert_eq!(hive.host().released(), 3);
    assert!(hive.regions().is_empty());
}

#[test]
fn unregistered_region_is_excluded_from_frames() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let host = hive.host().clone();
    let node = window.node("a", reference_rect());
    let id = hive
        .register_region(node.clone(), RegionContent::Subscene("a"), RegionOptions::default())
        .unwrap();
    hive.unregister_region(id).unwrap();

    // No listener survives to update a dead region.
    assert_eq!(host.scroll(), 0);

    let mut surface = HeadlessSurface::new(CANVAS);
    let stats = hive.render_frame(&mut surface);
    assert_eq!(stats.drawn + stats.skipped + stats.failed, 0);
}

#[test]
fn shared_anchor_is_not_reported_as_leak() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let node = window.node("shared", reference_rect());
    let a = hive
        .register_region(node.clone(), RegionContent::Subscene("a"), RegionOptions::default())
        .unwrap();
    hive.register_region(node, RegionContent::Subscene("b"), RegionOptions::default())
        .unwrap();

    assert_eq!(hive.unregister_region(a), Ok(true));
    assert_eq!(hive.host().live_total(), 3);
}

#[test]
fn host_that_keeps_subscriptions_is_reported() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let id = hive
        .register_region(
            window.node("a", reference_rect()),
            RegionContent::Subscene("a"),
            RegionOptions::default(),
        )
        .unwrap();

    hive.host().leak_on_release(true);
    assert_eq!(
        hive.unregister_region(id),
        Err(HiveError::ObserverLeak {
            region: id,
            live: 3
        })
    );
    // The region is gone regardless.
    assert!(!hive.regions().is_alive(id));
}

#[test]
fn anchor_change_releases_old_before_subscribing_new() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let id = hive
        .register_region(
            window.node("old", reference_rect()),
            RegionContent::Subscene("a"),
            RegionOptions::default(),
        )
        .unwrap();
    hive.host().clear_events();

    let new = window.node("new", reference_rect());
    assert_eq!(hive.set_anchor(id, new.clone()), Ok(true));

    let events = hive.host().events();
    assert_eq!(events.len(), 6);
    assert!(
        events[..3]
            .iter()
            .all(|event| matches!(event, HostEvent::Released("old", _)))
    );
    assert!(
        events[3..]
            .iter()
            .all(|event| matches!(event, HostEvent::Subscribed("new", _)))
    );
    assert_eq!(hive.region(id).unwrap().anchor(), &new);
}

#[test]
fn missing_anchor_is_retried_each_frame() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let node = window.detached_node("late");
    let id = hive
        .register_region(node.clone(), RegionContent::Subscene("late"), RegionOptions::default())
        .unwrap();
    assert!(!hive.region(id).unwrap().is_tracking());

    let mut surface = HeadlessSurface::new(CANVAS);
    let stats = hive.render_frame(&mut surface);
    assert_eq!((stats.drawn, stats.skipped), (0, 1));

    node.set_rect(reference_rect());
    let stats = hive.render_frame(&mut surface);
    assert_eq!(stats.drawn, 1);
    assert!(hive.region(id).unwrap().is_tracking());
}

#[test]
fn anchor_change_to_unmounted_node_stops_drawing() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let id = hive
        .register_region(
            window.node("old", reference_rect()),
            RegionContent::Subscene("a"),
            RegionOptions::default(),
        )
        .unwrap();

    assert_eq!(hive.set_anchor(id, window.detached_node("new")), Ok(true));
    let mut surface = HeadlessSurface::new(CANVAS);
    assert_eq!(hive.render_frame(&mut surface).drawn, 0);
    assert_eq!(hive.host().live_total(), 0);
}

#[test]
fn refused_subscription_registers_nothing() {
    let window = Window::new(600.0);
    let mut hive = hive();
    hive.host().refuse(Some(SignalSource::Scroll));

    let result = hive.register_region(
        window.node("a", reference_rect()),
        RegionContent::Subscene("a"),
        RegionOptions::default(),
    );
    assert_eq!(
        result,
        Err(HiveError::SubscriptionFailed {
            signal: SignalSource::Scroll
        })
    );
    assert!(hive.regions().is_empty());
    // The partial subscriptions were rolled back.
    assert_eq!(hive.host().live_total(), 0);
}

#[test]
fn pointer_on_anchor_routes_to_region() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let node = window.node("a", reference_rect());
    let id = hive
        .register_region(node.clone(), RegionContent::Subscene("a"), RegionOptions::default())
        .unwrap();

    let routed = hive
        .route_pointer(
            &PointerInput {
                target: node,
                client: Point::new(300.0, 250.0),
            },
            &Camera::default(),
        )
        .unwrap();
    assert_eq!(routed.region, id);
    assert_eq!(routed.ndc, Point::new(1.0, -1.0));
}

#[test]
fn pointer_elsewhere_is_not_routed() {
    let window = Window::new(600.0);
    let mut hive = hive();
    hive.register_region(
        window.node("a", reference_rect()),
        RegionContent::Subscene("a"),
        RegionOptions::default(),
    )
    .unwrap();

    let other = window.node("page", reference_rect());
    let pointer = PointerInput {
        target: other,
        client: Point::new(150.0, 100.0),
    };
    assert!(hive.route_pointer(&pointer, &Camera::default()).is_none());
}

#[test]
fn connected_input_follows_region_and_restores() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let page = window.node("page", reference_rect());
    let node = window.node("a", reference_rect());
    let id = hive
        .register_region(node.clone(), RegionContent::Subscene("a"), RegionOptions::default())
        .unwrap();
    hive.connected_input().set_fallback(Some(page.clone()));

    let connection = hive.connect_input(id).unwrap();
    assert_eq!(hive.connected_input().current(), Some(node));
    drop(connection);
    assert_eq!(hive.connected_input().current(), Some(page));
}

#[test]
fn outlet_relays_regions_authored_outside_the_surface() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let portal = hive
        .register_region(
            window.node("portal", reference_rect()),
            RegionContent::Subscene("portal"),
            RegionOptions::default(),
        )
        .unwrap();
    hive.register_region(
        window.node("inline", reference_rect()),
        RegionContent::MainScene,
        RegionOptions {
            hosted_in_surface: true,
            ..RegionOptions::default()
        },
    )
    .unwrap();

    let relayed: Vec<_> = hive.regions().outlet().map(|(id, _)| id).collect();
    assert_eq!(relayed, [portal]);
}

#[test]
fn detached_anchor_stops_drawing_and_is_retried() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let node = window.node("a", reference_rect());
    let id = hive
        .register_region(node.clone(), RegionContent::Subscene("a"), RegionOptions::default())
        .unwrap();

    node.detach();
    assert_eq!(hive.host().fire(&node, Signal::Resize), 1);
    assert!(hive.region(id).unwrap().snapshot().is_none());
    assert!(!hive.region(id).unwrap().is_tracking());

    let mut surface = HeadlessSurface::new(CANVAS);
    let stats = hive.render_frame(&mut surface);
    assert_eq!((stats.drawn, stats.skipped), (0, 1));
    // The retry released the lost anchor's subscriptions.
    assert_eq!(hive.host().live_total(), 0);

    node.set_rect(reference_rect());
    assert_eq!(hive.render_frame(&mut surface).drawn, 1);
    assert!(hive.region(id).unwrap().is_tracking());
    assert_eq!(hive.host().live_total(), 3);
}

#[test]
fn refused_retries_are_counted_until_tracking_starts() {
    let window = Window::new(600.0);
    let mut hive = hive();
    let node = window.detached_node("late");
    let id = hive
        .register_region(node.clone(), RegionContent::Subscene("late"), RegionOptions::default())
        .unwrap();

    node.set_rect(reference_rect());
    hive.host().refuse(Some(SignalSource::Resize));
    let mut surface = HeadlessSurface::new(CANVAS);
    for _ in 0..3 {
        assert_eq!(hive.render_frame(&mut surface).drawn, 0);
    }
    assert_eq!(hive.region(id).unwrap().failed_retries(), 3);
    assert_eq!(hive.host().live_total(), 0);

    hive.host().refuse(None);
    assert_eq!(hive.render_frame(&mut surface).drawn, 1);
    assert_eq!(hive.region(id).unwrap().failed_retries(), 0);
}
