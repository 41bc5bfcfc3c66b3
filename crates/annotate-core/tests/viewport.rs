// File: crates/annotate-core/tests/viewport.rs
// Purpose: Validate viewport mapping, indeterminate coordinates and change notification lifetimes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use annotate_core::{ChartViewport, CoordinateBridge, DomainPoint, Pixel, ViewportChange, ViewportNotifier};

fn fitted() -> ChartViewport {
    let mut vp = ChartViewport::new(800.0, 400.0);
    vp.fit(1_000.0, 2_000.0, 10.0, 20.0);
    vp
}

#[test]
fn fit_maps_time_range_across_width() {
    let vp = fitted();
    assert!((vp.time_to_x(1_000.0).unwrap() - 0.0).abs() < 1e-3);
    assert!((vp.time_to_x(2_000.0).unwrap() - 800.0).abs() < 1e-3);
    // higher prices are closer to the top
    assert!(vp.price_to_y(19.0).unwrap() < vp.price_to_y(11.0).unwrap());
}

#[test]
fn round_trip_through_pixels() {
    let vp = fitted();
    let d = DomainPoint::new(1_500.0, 15.0);
    let px = vp.to_pixel(d).unwrap();
    let back = vp.to_domain(px).unwrap();
    assert!((back.time - d.time).abs() < 1e-3);
    assert!((back.price - d.price).abs() < 1e-3);
}

#[test]
fn times_outside_bounds_are_indeterminate() {
    let vp = fitted();
    assert!(vp.time_to_x(999.0).is_none());
    assert!(vp.time_to_x(2_001.0).is_none());
    assert!(vp.time_to_x(f64::NAN).is_none());
    assert!(vp.to_pixel(DomainPoint::new(5_000.0, 15.0)).is_none());
    // pixel left of the data range
    let mut panned = fitted();
    panned.pan_by_pixels(200.0, 0.0);
    assert!(panned.x_to_time(10.0).is_none());
    assert!(panned.x_to_time(f32::NAN).is_none());
}

#[test]
fn unbounded_time_always_resolves() {
    let mut vp = fitted();
    vp.set_time_bounds(None);
    assert!(vp.time_to_x(-1.0e6).is_some());
}

#[test]
fn log_prices_reject_non_positive() {
    let mut vp = ChartViewport::new(800.0, 400.0).with_log_prices();
    vp.fit(0.0, 10.0, 1.0, 1_000.0);
    assert!(vp.value_scale().log);
    assert!(vp.price_to_y(0.0).is_none());
    assert!(vp.price_to_y(-5.0).is_none());
    let y10 = vp.price_to_y(10.0).unwrap();
    let y100 = vp.price_to_y(100.0).unwrap();
    let y1000 = vp.price_to_y(1000.0).unwrap();
    // equal ratios are equal pixel steps
    assert!(((y10 - y100) - (y100 - y1000)).abs() < 1e-2);
}

#[test]
fn zoom_keeps_cursor_anchor() {
    let mut vp = fitted();
    let cursor = Pixel::new(300.0, 200.0);
    let before = vp.to_domain(cursor).unwrap();
    vp.zoom_at(cursor, 2.0);
    let after = vp.to_domain(cursor).unwrap();
    assert!((before.time - after.time).abs() < 1e-6);
    assert!((before.price - after.price).abs() < 1e-6);
    assert!(vp.time_scale().px_per_unit > 0.8 * 1.9);
}

#[test]
fn resize_keeps_visible_span() {
    let mut vp = fitted();
    vp.resize(400.0, 200.0);
    assert_eq!(vp.width(), 400.0);
    assert!((vp.time_to_x(2_000.0).unwrap() - 400.0).abs() < 1e-3);
}

#[test]
fn mutations_notify_subscribers() {
    let mut vp = fitted();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = vp.notifier().subscribe(move |c| sink.borrow_mut().push(c));

    vp.pan_by_pixels(5.0, 0.0);
    vp.zoom_at(Pixel::new(10.0, 10.0), 1.5);
    vp.resize(640.0, 480.0);
    vp.resize(640.0, 480.0);
    vp.fit(0.0, 1.0, 0.0, 1.0);

    assert_eq!(
        *seen.borrow(),
        vec![ViewportChange::Pan, ViewportChange::Zoom, ViewportChange::Resize, ViewportChange::Fit]
    );
}

#[test]
fn dropping_subscription_stops_delivery() {
    let notifier = ViewportNotifier::new();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let sub = notifier.subscribe(move |_| h.set(h.get() + 1));
    assert!(sub.is_active());
    assert_eq!(notifier.emit(ViewportChange::Pan), 1);

    drop(sub);
    assert_eq!(notifier.subscriber_count(), 0);
    assert_eq!(notifier.emit(ViewportChange::Pan), 0);
    assert_eq!(hits.get(), 1);
}

#[test]
fn explicit_unsubscribe_and_notifier_drop() {
    let notifier = ViewportNotifier::new();
    let a = notifier.subscribe(|_| {});
    let b = notifier.subscribe(|_| {});
    assert_eq!(notifier.subscriber_count(), 2);
    a.unsubscribe();
    assert_eq!(notifier.subscriber_count(), 1);

    drop(notifier);
    assert!(!b.is_active());
    // dropping after the notifier is gone is harmless
    drop(b);
}

#[test]
fn subscriber_released_during_emit_is_skipped() {
    let notifier = ViewportNotifier::new();
    let second_hits = Rc::new(Cell::new(0));
    let slot: Rc<RefCell<Option<annotate_core::Subscription>>> = Rc::new(RefCell::new(None));

    let release = Rc::clone(&slot);
    let _first = notifier.subscribe(move |_| {
        release.borrow_mut().take();
    });
    let hits = Rc::clone(&second_hits);
    *slot.borrow_mut() = Some(notifier.subscribe(move |_| hits.set(hits.get() + 1)));

    assert_eq!(notifier.emit(ViewportChange::Zoom), 1);
    assert_eq!(second_hits.get(), 0);
    assert_eq!(notifier.subscriber_count(), 1);
}

#[test]
fn clones_share_subscribers() {
    let notifier = ViewportNotifier::new();
    let other = notifier.clone();
    let _s = other.subscribe(|_| {});
    assert_eq!(notifier.subscriber_count(), 1);
}
