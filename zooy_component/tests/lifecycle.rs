// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-level lifecycle behavior: ordering of READY events, deferred entry, and
//! mount/unmount symmetry of the listener registry and the document.

use std::cell::RefCell;
use std::rc::Rc;

use zooy_component::{Component, Runtime};
use zooy_dom::{EventKind, ListenOptions};
use zooy_events::{event_type, values};

type Log = Rc<RefCell<Vec<String>>>;

/// Record READY events of `node` under `name` into `log`, observed by `observer`.
fn log_ready(observer: &Component, node: &Component, name: &'static str, log: &Log) {
    let log = log.clone();
    observer.listen(node, event_type::COMP, move |ev| {
        if ev.data().value() == values::READY {
            log.borrow_mut().push(name.to_owned());
        }
    });
}

/// root → {left → {leaf}, right}
fn three_levels(rt: &Runtime) -> (Component, Component, Component, Component) {
    let root = Component::new(rt);
    let left = Component::new(rt);
    let right = Component::new(rt);
    let leaf = Component::new(rt);
    root.add_child("left", left.clone());
    root.add_child("right", right.clone());
    left.add_child("leaf", leaf.clone());
    (root, left, right, leaf)
}

#[test]
fn children_ready_before_parent() {
    let rt = Runtime::new();
    let (root, left, right, leaf) = three_levels(&rt);
    for node in [&root, &left, &right, &leaf] {
        node.create_dom();
    }

    let observer = Component::new(&rt);
    let log = Log::default();
    log_ready(&observer, &root, "root", &log);
    log_ready(&observer, &left, "left", &log);
    log_ready(&observer, &right, "right", &log);
    log_ready(&observer, &leaf, "leaf", &log);

    root.enter_document();

    assert_eq!(*log.borrow(), ["leaf", "left", "right", "root"]);
    assert!([&root, &left, &right, &leaf].iter().all(|c| c.is_in_document()));
}

#[test]
fn render_defers_until_parent_enters() {
    let rt = Runtime::new();
    let (root, left, _right, leaf) = three_levels(&rt);
    let observer = Component::new(&rt);
    let log = Log::default();
    log_ready(&observer, &leaf, "leaf", &log);
    log_ready(&observer, &left, "left", &log);

    // Rendered bottom-up: nothing enters while the chain above is detached.
    leaf.render(None).unwrap();
    left.render(None).unwrap();
    assert!(!leaf.is_in_document());
    assert!(!left.is_in_document());
    assert!(log.borrow().is_empty());

    root.render(None).unwrap();
    assert_eq!(*log.borrow(), ["leaf", "left"]);
    assert!(leaf.is_in_document());
}

#[test]
fn children_without_dom_do_not_enter() {
    let rt = Runtime::new();
    let (root, left, right, leaf) = three_levels(&rt);
    left.create_dom();
    root.render(None).unwrap();
    assert!(left.is_in_document());
    assert!(!right.is_in_document());
    // leaf has no element, so it stays out even though its parent entered.
    assert!(!leaf.is_in_document());
}

#[test]
fn reentering_refires_ready() {
    let rt = Runtime::new();
    let c = Component::new(&rt);
    let observer = Component::new(&rt);
    let log = Log::default();
    log_ready(&observer, &c, "c", &log);
    c.render(None).unwrap();
    c.enter_document();
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn exit_drops_listeners_both_ways() {
    let rt = Runtime::new();
    let (root, left, right, leaf) = three_levels(&rt);
    root.render(None).unwrap();
    left.render(None).unwrap();
    right.render(None).unwrap();
    leaf.render(None).unwrap();

    root.listen(&leaf, "custom", |_| {});
    leaf.listen(&right, "custom", |_| {});
    right.listen(&root, "custom", |_| {});
    assert!(rt.registry().is_observed_by(leaf.id(), root.id()));

    left.exit_document();
    assert!(!left.is_in_document());
    assert!(!leaf.is_in_document());
    // leaf's relationships are gone in both directions.
    assert!(rt.registry().is_clean(leaf.id()));
    assert!(!rt.registry().is_observed_by(right.id(), leaf.id()));
    // Unrelated relationships survive.
    assert!(rt.registry().is_observed_by(root.id(), right.id()));
}

#[test]
fn render_then_dispose_leaves_nothing_behind() {
    let rt = Runtime::new();
    let dom = rt.dom().clone();
    let (root, left, right, leaf) = three_levels(&rt);
    let nodes = [root.clone(), left.clone(), right.clone(), leaf.clone()];

    root.render(None).unwrap();
    for node in &nodes[1..] {
        node.render(root.element()).unwrap();
    }
    // A web of cross-listeners, including DOM listeners.
    for a in &nodes {
        for b in &nodes {
            a.listen(b, event_type::COMP, |_| {});
        }
        let el = a.element().unwrap();
        a.listen_dom(el, EventKind::Click, ListenOptions::default(), |_| {});
    }
    let elements: Vec<_> = nodes.iter().map(|n| n.element().unwrap()).collect();

    root.dispose();

    for (node, el) in nodes.iter().zip(&elements) {
        assert!(node.is_disposed());
        assert!(rt.registry().is_clean(node.id()));
        assert!(node.element().is_none());
        assert!(!dom.is_connected(*el));
        assert!(!dom.is_alive(*el));
    }
    assert!(dom.children_of(dom.body()).is_empty());
    assert!(root.child_keys().is_empty());
}

#[test]
fn disposing_a_child_unlinks_it_from_the_parent() {
    let rt = Runtime::new();
    let (root, left, _right, leaf) = three_levels(&rt);
    root.render(None).unwrap();
    left.dispose();
    assert_eq!(root.child_keys(), ["right"]);
    assert!(leaf.is_disposed());
    assert!(left.parent().is_none());
}

#[test]
fn model_is_cleared_on_dispose() {
    let rt = Runtime::new();
    let c = Component::new(&rt);
    c.set_model(Rc::new(7_u8));
    assert_eq!(c.model().and_then(|m| m.downcast_ref::<u8>().copied()), Some(7));
    c.dispose();
    assert!(c.model().is_none());
}

#[test]
fn adopting_under_a_detached_parent_exits_the_child() {
    let rt = Runtime::new();
    let parent = Component::new(&rt);
    let child = Component::new(&rt);
    let grandchild = Component::new(&rt);
    child.add_child("g", grandchild.clone());
    child.render(None).unwrap();
    grandchild.render(None).unwrap();
    assert!(grandchild.is_in_document());

    parent.add_child("c", child.clone());
    assert!(!parent.is_in_document());
    assert!(!child.is_in_document());
    assert!(!grandchild.is_in_document());

    // Entering the new parent brings the subtree back.
    parent.render(None).unwrap();
    assert!(child.is_in_document());
    assert!(grandchild.is_in_document());
}

#[test]
fn adopting_under_an_entered_parent_keeps_the_child_in() {
    let rt = Runtime::new();
    let parent = Component::new(&rt);
    let child = Component::new(&rt);
    parent.render(None).unwrap();
    child.render(None).unwrap();
    parent.add_child("c", child.clone());
    assert!(child.is_in_document());
}

#[test]
fn disposing_drops_other_observers_of_its_elements() {
    let rt = Runtime::new();
    let owner = Component::new(&rt);
    let watcher = Component::new(&rt);
    owner.render(None).unwrap();
    watcher.render(None).unwrap();
    let el = owner.element().unwrap();
    watcher.listen_dom(el, EventKind::Click, ListenOptions::default(), |_| {});
    assert!(!rt.registry().is_clean(watcher.id()));

    owner.dispose();
    assert!(rt.registry().is_clean(watcher.id()));
    assert!(watcher.is_in_document());
}
