use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use sysload::history::Windows;
use sysload::stream::StreamController;
use sysload::ws::WsFeed;

// Integration probe: only runs when SYSLOAD_WS is set to an agent WebSocket URL.
// Example: SYSLOAD_WS=ws://127.0.0.1:3000/ws cargo test -p sysload --test ws_probe -- --nocapture
#[tokio::test]
async fn probe_live_agent() {
    let url = match std::env::var("SYSLOAD_WS") {
        Ok(v) if !v.is_empty() => v,
        _ => {
            eprintln!("skipping ws_probe: set SYSLOAD_WS=ws://host:port/ws to run this integration test");
            return;
        }
    };

    let feed = WsFeed::spawn(&url).expect("valid url");
    let windows = Rc::new(RefCell::new(Windows::new(10)));
    let ctl = StreamController::new(Rc::clone(&feed), Rc::clone(&windows));
    ctl.start();

    let deadline = Instant::now() + Duration::from_secs(10);
    while windows.borrow().cpu.is_empty() && Instant::now() < deadline {
        feed.pump();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    let w = windows.borrow();
    assert!(!w.cpu.is_empty(), "expected a cpu sample within timeout");
    assert!(!w.ram.is_empty(), "expected a ram sample within timeout");
}
