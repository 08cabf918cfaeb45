//! Hub dispatch semantics
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sysload::feed::{Feed, Hub};
use sysload::types::RawRecord;

#[test]
fn off_with_unknown_id_is_noop() {
    let hub = Rc::new(Hub::new());
    let id = hub.on_batch(Box::new(|_| {}));
    hub.off(id);
    hub.off(id);
    assert_eq!(hub.batch_listeners(), 0);
}

#[test]
fn handler_added_during_dispatch_waits_for_next_emit() {
    let hub = Rc::new(Hub::new());
    let calls = Rc::new(Cell::new(0));
    let added = Rc::new(Cell::new(false));

    let (hub_in, calls_in, added_in) = (Rc::clone(&hub), Rc::clone(&calls), Rc::clone(&added));
    hub.on_batch(Box::new(move |_| {
        if !added_in.replace(true) {
            let c = Rc::clone(&calls_in);
            hub_in.on_batch(Box::new(move |_| c.set(c.get() + 1)));
        }
    }));

    hub.emit_batch(&[]);
    assert_eq!(calls.get(), 0);
    hub.emit_batch(&[]);
    assert_eq!(calls.get(), 1);
}

#[test]
fn self_removal_during_dispatch() {
    let hub = Rc::new(Hub::new());
    let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
    let id_cell = Rc::new(Cell::new(None));

    let (hub_in, seen_in, id_in) = (Rc::clone(&hub), Rc::clone(&seen), Rc::clone(&id_cell));
    let id = hub.on_batch(Box::new(move |b: &[RawRecord]| {
        seen_in.borrow_mut().push(b.len());
        if let Some(id) = id_in.get() {
            hub_in.off(id);
        }
    }));
    id_cell.set(Some(id));

    hub.emit_batch(&[RawRecord::new("cpu", 1)]);
    hub.emit_batch(&[RawRecord::new("cpu", 2)]);
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(hub.batch_listeners(), 0);
}

#[test]
fn connect_and_batch_listeners_are_separate() {
    let hub = Hub::new();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    hub.on_connect(Box::new(move || h.set(h.get() + 1)));
    hub.emit_batch(&[]);
    assert_eq!(hits.get(), 0);
    hub.emit_connect();
    assert_eq!(hits.get(), 1);
}
