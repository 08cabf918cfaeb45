//! Background sampler: periodically collects CPU/RAM load and broadcasts a
//! perfData frame to every connected client. Idles while nobody listens.

use std::sync::atomic::Ordering;

use crate::metrics::{collect_load, perf_batch};
use crate::state::AppState;
use crate::types::Frame;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

pub fn spawn_sampler(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            // Created before the check so a wake between the two is not lost
            let woken = state.wake_sampler.notified();
            if state.client_count.load(Ordering::Relaxed) == 0 {
                debug!("no clients, sampler idle");
                woken.await;
                continue;
            }

            let load = {
                let mut sys = state.sys.lock().await;
                collect_load(&mut sys)
            };
            let frame = Frame::PerfData {
                data: perf_batch(load),
            };
            match serde_json::to_string(&frame) {
                // Err only means no receivers right now
                Ok(js) => {
                    let _ = state.frames.send(js);
                }
                Err(e) => warn!("serialize perfData: {e}"),
            }
            sleep(period).await;
        }
    })
}
