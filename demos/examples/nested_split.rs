// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A three-pane layout with a stacked inner split, driven by scripted pointer input.
//!
//! This example shows how to:
//! - build a root split and split one of its nests again,
//! - feed layout rectangles and pointer events through the headless document,
//! - observe split events and complete animated resizes.
//!
//! Run:
//! - `cargo run -p zooy_demos --example nested_split`
//! - `RUST_LOG=zooy_split=trace cargo run -p zooy_demos --example nested_split` for the
//!   library's own tracing.

use kurbo::{Point, Rect};
use tracing::info;
use zooy_component::{Component, Runtime};
use zooy_dom::{Dom, DomEvent, DomTarget, EventKind};
use zooy_split::{Nest, Orientation, Split, split_event};

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("nested_split=info,zooy_split=debug")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Give every nest a rectangle, the way a browser's layout pass would.
fn lay_out(dom: &Dom, split: &Split, width: f64, height: f64) {
    let a = split.nest("A").map_or(0.0, |n| n.current_size);
    let c = split.nest("C").map_or(0.0, |n| n.current_size);
    let b = (width - a - c).max(0.0);
    for (name, x0, w) in [("A", 0.0, a), ("B", a, b), ("C", a + b, c)] {
        if let Some(nest) = split.nest(name) {
            dom.set_rect(nest.element, Rect::new(x0, 0.0, x0 + w, height));
        }
    }
}

fn drag(dom: &Dom, handle: zooy_dom::ElementId, from: f64, to: f64) {
    dom.dispatch(
        DomTarget::Element(handle),
        DomEvent::mouse(EventKind::MouseDown, Point::new(from, 10.0)),
    );
    dom.dispatch(
        DomTarget::Document,
        DomEvent::mouse(EventKind::MouseMove, Point::new(to, 10.0)),
    );
    dom.dispatch(
        DomTarget::Document,
        DomEvent::mouse(EventKind::MouseUp, Point::new(to, 10.0)),
    );
}

fn report(split: &Split) {
    for name in split.nest_names() {
        if let Some(nest) = split.nest(&name) {
            info!(nest = %nest.name, size = nest.current_size, state = ?nest.state, "nest");
        }
    }
}

fn main() {
    init_logging();

    let rt = Runtime::new();
    let dom = rt.dom().clone();
    let split = Split::new(&rt);
    split.component().render(None).expect("fresh split renders");

    split
        .add_split(None, Orientation::EW, 200.0, 240.0, &["pane"])
        .expect("root is not split yet");
    split
        .add_split(Some("C"), Orientation::NS, 120.0, 80.0, &["inspector"])
        .expect("C is a leaf nest");
    lay_out(&dom, &split, 1000.0, 600.0);

    let observer = Component::new(&rt);
    observer.listen(&split, split_event::SPLIT, |ev| {
        let nest = ev.data().downcast::<Nest>().map(|n| n.name.as_str()).unwrap_or("?");
        info!(event = ev.data().value(), nest, "split event");
    });

    info!("initial layout");
    report(&split);

    // Drag the A divider far to the right: clamped to A + B.
    let divider = split.nest("A").and_then(|n| n.divider).expect("A has a divider");
    drag(&dom, divider, 200.0, 5000.0);
    info!(size = split.nest("A").map(|n| n.current_size), "after an oversized drag");

    // Back to something sensible, then collapse and restore it.
    drag(&dom, divider, 760.0, 300.0);
    lay_out(&dom, &split, 1000.0, 600.0);
    split.toggle("A").expect("A exists");
    dom.finish_transitions();
    split.toggle("A").expect("A exists");
    dom.finish_transitions();
    info!("after toggling A twice");
    report(&split);

    // Lock everything shut, then reopen after the open delay.
    split.close_and_lock_all();
    dom.finish_transitions();
    info!("all leaves closed and locked");
    report(&split);

    split.open_and_unlock_all();
    dom.advance(split.config().open_delay_ms);
    dom.finish_transitions();
    info!("all leaves reopened");
    report(&split);

    split.dispose();
    info!(timers = dom.pending_timers(), "disposed");
}
