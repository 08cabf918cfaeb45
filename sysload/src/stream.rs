//! Start/stop gate between the feed and the windows.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info};

use crate::demux::route;
use crate::feed::{Feed, SubscriptionId};
use crate::history::Windows;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Stopped,
    Active,
}

impl StreamState {
    pub fn label(self) -> &'static str {
        match self {
            StreamState::Active => "live",
            StreamState::Stopped => "paused",
        }
    }

    /// What the toggle control does when pressed in this state.
    pub fn action_hint(self) -> &'static str {
        match self {
            StreamState::Active => "stop",
            StreamState::Stopped => "play",
        }
    }
}

// A live batch attachment. `live` is cleared before `off` so late
// deliveries through a stale handler are dropped.
struct Attachment {
    id: SubscriptionId,
    live: Rc<Cell<bool>>,
}

/// Owns the feed subscription. At most one batch handler is attached at a
/// time; redundant `start`/`stop` calls are no-ops.
pub struct StreamController<F: Feed> {
    feed: Rc<F>,
    windows: Rc<RefCell<Windows>>,
    // Shared so handlers can observe transitions made from inside a dispatch
    state: Rc<Cell<StreamState>>,
    attachment: RefCell<Option<Attachment>>,
    connect_sub: SubscriptionId,
}

impl<F: Feed> StreamController<F> {
    /// Starts `Stopped`. The connect listener is attached here and lives
    /// until the controller is dropped.
    pub fn new(feed: Rc<F>, windows: Rc<RefCell<Windows>>) -> Self {
        let connect_sub = feed.on_connect(Box::new(|| info!("connected to feed")));
        Self {
            feed,
            windows,
            state: Rc::new(Cell::new(StreamState::Stopped)),
            attachment: RefCell::new(None),
            connect_sub,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state.get()
    }

    pub fn is_active(&self) -> bool {
        self.state.get() == StreamState::Active
    }

    pub fn start(&self) {
        if self.state.get() == StreamState::Active {
            return;
        }
        // Claim the transition before attaching so a nested start is a no-op
        self.state.set(StreamState::Active);

        let live = Rc::new(Cell::new(true));
        let gate = Rc::clone(&live);
        let windows = Rc::clone(&self.windows);
        let id = self.feed.on_batch(Box::new(move |batch| {
            if !gate.get() {
                return;
            }
            route(&mut windows.borrow_mut(), batch);
        }));
        *self.attachment.borrow_mut() = Some(Attachment { id, live });
        debug!("stream started");
    }

    pub fn stop(&self) {
        if self.state.get() == StreamState::Stopped {
            return;
        }
        self.state.set(StreamState::Stopped);
        let taken = self.attachment.borrow_mut().take();
        if let Some(att) = taken {
            att.live.set(false);
            self.feed.off(att.id);
        }
        debug!("stream stopped");
    }

    /// Flips the stream and returns the new state.
    pub fn toggle(&self) -> StreamState {
        match self.state.get() {
            StreamState::Active => self.stop(),
            StreamState::Stopped => self.start(),
        }
        self.state.get()
    }
}

impl<F: Feed> Drop for StreamController<F> {
    fn drop(&mut self) {
        self.stop();
        self.feed.off(self.connect_sub);
    }
}
