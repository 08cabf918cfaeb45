//! Shared agent state: sysinfo handle, frame fan-out and client tracking.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use sysinfo::System;
use tokio::sync::{broadcast, Mutex, Notify};

pub type SharedSystem = Arc<Mutex<System>>;

// Frames buffered per client before it starts lagging
const FANOUT_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct AppState {
    pub sys: SharedSystem,

    // Serialized perfData frames, one per sampling tick
    pub frames: broadcast::Sender<String>,

    // Adaptive sampling controls
    pub client_count: Arc<AtomicUsize>,
    pub wake_sampler: Arc<Notify>,
}

impl AppState {
    pub fn new(sys: System) -> Self {
        let (frames, _) = broadcast::channel(FANOUT_CAPACITY);
        Self {
            sys: Arc::new(Mutex::new(sys)),
            frames,
            client_count: Arc::new(AtomicUsize::new(0)),
            wake_sampler: Arc::new(Notify::new()),
        }
    }
}
