//! WebSocket feed against a local axum server
use std::cell::{Cell, RefCell};
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};

use axum::{
    extract::ws::{Message, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use sysload::feed::Feed;
use sysload::history::Windows;
use sysload::stream::StreamController;
use sysload::types::RawRecord;
use sysload::ws::{parse_frame, validate_url, FeedEvent, WsFeed};

const FRAMES: [&str; 3] = [
    r#"{"event":"perfData","data":[{"_field":"cpu","_value":55},{"_field":"ram","_value":61}]}"#,
    r#"{"event":"somethingElse","data":1}"#,
    r#"{"event":"perfData","data":[]}"#,
];

async fn serve_frames() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(
        "/ws",
        get(|ws: WebSocketUpgrade| async move {
            ws.on_upgrade(|mut socket| async move {
                for f in FRAMES {
                    if socket.send(Message::Text(f.to_string())).await.is_err() {
                        return;
                    }
                }
                // Hold the connection open until the client goes away
                while let Some(Ok(_)) = socket.recv().await {}
            })
            .into_response()
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn pump_until(feed: &WsFeed, want: usize) -> usize {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut seen = 0;
    while seen < want && Instant::now() < deadline {
        seen += feed.pump();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    seen
}

#[test]
fn parse_frame_variants() {
    assert_eq!(
        parse_frame(FRAMES[0]),
        Some(FeedEvent::Batch(vec![
            RawRecord::new("cpu", 55),
            RawRecord::new("ram", 61)
        ]))
    );
    assert_eq!(parse_frame(FRAMES[1]), None);
    assert_eq!(parse_frame(FRAMES[2]), Some(FeedEvent::Batch(vec![])));
    assert_eq!(parse_frame("not json"), None);
    assert_eq!(parse_frame(r#"{"event":"connect"}"#), None);
}

#[test]
fn bad_entries_are_skipped_without_losing_the_batch() {
    let frame = r#"{"event":"perfData","data":[
        {"_field":"cpu","_value":55},
        {"_field":7,"_value":1},
        {"_value":3},
        null,
        "ram",
        {"_field":"ram","_value":61}
    ]}"#;
    assert_eq!(
        parse_frame(frame),
        Some(FeedEvent::Batch(vec![
            RawRecord::new("cpu", 55),
            RawRecord::new("ram", 61)
        ]))
    );
}

#[test]
fn url_must_be_websocket() {
    assert!(validate_url("ws://127.0.0.1:3000/ws").is_ok());
    assert!(validate_url("wss://example.com/ws").is_ok());
    assert!(validate_url("http://example.com/ws").is_err());
    assert!(validate_url("::nope").is_err());
}

#[tokio::test]
async fn active_stream_receives_batches() {
    let addr = serve_frames().await;
    let feed = WsFeed::spawn(&format!("ws://{addr}/ws")).unwrap();
    let windows = Rc::new(RefCell::new(Windows::new(10)));
    let ctl = StreamController::new(Rc::clone(&feed), Rc::clone(&windows));
    ctl.start();

    // connect + two perfData frames
    assert_eq!(pump_until(&feed, 3).await, 3);
    let w = windows.borrow();
    assert_eq!(w.cpu.snapshot(), vec![55.0]);
    assert_eq!(w.ram.snapshot(), vec![61.0]);
}

#[tokio::test]
async fn batches_while_stopped_are_discarded() {
    let addr = serve_frames().await;
    let feed = WsFeed::spawn(&format!("ws://{addr}/ws")).unwrap();
    let windows = Rc::new(RefCell::new(Windows::new(10)));
    let ctl = StreamController::new(Rc::clone(&feed), Rc::clone(&windows));

    let connects = Rc::new(Cell::new(0));
    let c = Rc::clone(&connects);
    feed.on_connect(Box::new(move || c.set(c.get() + 1)));

    assert_eq!(pump_until(&feed, 3).await, 3);
    assert_eq!(connects.get(), 1);

    // Nothing was queued for later
    ctl.start();
    feed.pump();
    assert!(windows.borrow().cpu.is_empty());
    assert!(windows.borrow().ram.is_empty());
}
