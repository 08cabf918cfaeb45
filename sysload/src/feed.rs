//! Feed abstraction: the event surface the stream controller attaches to.
//!
//! Everything here is single-threaded. Handlers are registered with `&self`
//! and may re-enter the feed (subscribe or unsubscribe) while being called.

use std::cell::{Cell, RefCell};

use crate::types::RawRecord;

pub type BatchHandler = Box<dyn FnMut(&[RawRecord])>;
pub type ConnectHandler = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait Feed {
    /// Attach a handler for `perfData` batches.
    fn on_batch(&self, handler: BatchHandler) -> SubscriptionId;
    /// Attach a handler for transport connection events.
    fn on_connect(&self, handler: ConnectHandler) -> SubscriptionId;
    /// Detach a handler. Unknown ids are ignored.
    fn off(&self, id: SubscriptionId);
}

// `None` while the handler is being called
struct Slot<H> {
    id: SubscriptionId,
    handler: Option<H>,
}

/// In-process event emitter. Used directly as the fake feed in tests and as
/// the dispatch half of the WebSocket feed.
#[derive(Default)]
pub struct Hub {
    next_id: Cell<u64>,
    batch: RefCell<Vec<Slot<BatchHandler>>>,
    connect: RefCell<Vec<Slot<ConnectHandler>>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&self) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        SubscriptionId(id)
    }

    pub fn emit_batch(&self, batch: &[RawRecord]) {
        dispatch(&self.batch, |h| h(batch));
    }

    pub fn emit_connect(&self) {
        dispatch(&self.connect, |h| h());
    }

    pub fn batch_listeners(&self) -> usize {
        self.batch.borrow().len()
    }

    pub fn connect_listeners(&self) -> usize {
        self.connect.borrow().len()
    }
}

fn dispatch<H>(slots: &RefCell<Vec<Slot<H>>>, mut call: impl FnMut(&mut H)) {
    // Only handlers attached before the emit are called
    let ids: Vec<SubscriptionId> = slots.borrow().iter().map(|s| s.id).collect();
    for id in ids {
        let taken = slots
            .borrow_mut()
            .iter_mut()
            .find(|s| s.id == id)
            .and_then(|s| s.handler.take());
        let Some(mut h) = taken else { continue };
        call(&mut h);
        // Put it back unless it was detached during the call
        if let Some(slot) = slots.borrow_mut().iter_mut().find(|s| s.id == id) {
            slot.handler = Some(h);
        }
    }
}

impl Feed for Hub {
    fn on_batch(&self, handler: BatchHandler) -> SubscriptionId {
        let id = self.alloc_id();
        self.batch.borrow_mut().push(Slot {
            id,
            handler: Some(handler),
        });
        id
    }

    fn on_connect(&self, handler: ConnectHandler) -> SubscriptionId {
        let id = self.alloc_id();
        self.connect.borrow_mut().push(Slot {
            id,
            handler: Some(handler),
        });
        id
    }

    fn off(&self, id: SubscriptionId) {
        self.batch.borrow_mut().retain(|s| s.id != id);
        self.connect.borrow_mut().retain(|s| s.id != id);
    }
}
