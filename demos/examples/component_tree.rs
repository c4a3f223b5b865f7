// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component lifecycle walkthrough: deferred rendering, READY ordering, a draggable child
//! and teardown.
//!
//! Run:
//! - `cargo run -p zooy_demos --example component_tree`

use kurbo::Point;
use tracing::info;
use zooy_component::{Component, Runtime};
use zooy_dom::{DomEvent, DomTarget, EventKind};
use zooy_drag::{Axis, DragInfo, Dragger, drag_event};
use zooy_events::{event_type, values};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let rt = Runtime::new();
    let dom = rt.dom().clone();
    let app = Component::new(&rt);
    let toolbar = Component::new(&rt);
    let handle = Dragger::new(&rt, Axis::Free);
    app.add_child("toolbar", toolbar.clone());
    toolbar.add_child("handle", handle.component().clone());

    let observer = Component::new(&rt);
    for (name, node) in [("app", &app), ("toolbar", &toolbar), ("handle", handle.component())] {
        observer.listen(node, event_type::COMP, move |ev| {
            if ev.data().value() == values::READY {
                info!(component = name, "ready");
            }
        });
    }
    observer.listen(&handle, drag_event::MOVE, |ev| {
        if let Some(info) = ev.data().downcast::<DragInfo>() {
            info!(
                x = info.client.x,
                y = info.client.y,
                dx = info.delta.x,
                dy = info.delta.y,
                "drag"
            );
        }
    });

    // Children rendered first wait for the app.
    handle.component().render(None).expect("fresh component");
    toolbar.render(None).expect("fresh component");
    info!(in_document = toolbar.is_in_document(), "toolbar rendered before app");
    app.render(None).expect("fresh component");

    let el = handle.component().element().expect("rendered");
    dom.dispatch(
        DomTarget::Element(el),
        DomEvent::mouse(EventKind::MouseDown, Point::new(5.0, 5.0)),
    );
    for step in 1..=3 {
        let p = Point::new(5.0 + 10.0 * f64::from(step), 5.0 + 4.0 * f64::from(step));
        dom.dispatch(DomTarget::Document, DomEvent::mouse(EventKind::MouseMove, p));
    }
    dom.dispatch(DomTarget::Document, DomEvent::mouse(EventKind::MouseUp, Point::new(35.0, 17.0)));
    info!(left = ?dom.style(el, "left"), top = ?dom.style(el, "top"), "handle moved");

    app.dispose();
    info!(
        clean = rt.registry().is_clean(handle.component().id()),
        alive = dom.is_alive(el),
        "disposed"
    );
}
