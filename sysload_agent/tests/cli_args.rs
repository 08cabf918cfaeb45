//! Black-box tests for sysload_agent: flags and the perfData stream
use std::process::{Child, Command};
use std::time::Duration;

use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

struct Agent(Child);

impl Drop for Agent {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn spawn_agent(args: &[&str]) -> Agent {
    let child = Command::new(env!("CARGO_BIN_EXE_sysload_agent"))
        .args(args)
        .spawn()
        .expect("spawn agent");
    Agent(child)
}

#[test]
fn test_port_short_and_long_accepted() {
    // Use unlikely ports to avoid conflicts; the process must still be alive after binding.
    for args in [&["--port", "9555"][..], &["-p", "9556"][..], &["--port=9557"][..]] {
        let mut agent = spawn_agent(args);
        std::thread::sleep(Duration::from_millis(150));
        assert!(
            agent.0.try_wait().expect("poll agent").is_none(),
            "agent exited early with {args:?}"
        );
    }
}

#[tokio::test]
async fn test_streams_perf_data_batches() {
    let _agent = spawn_agent(&["--port", "9558", "--interval-ms", "100"]);

    let mut ws = None;
    for _ in 0..50 {
        if let Ok((s, _)) = connect_async("ws://127.0.0.1:9558/ws").await {
            ws = Some(s);
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let mut ws = ws.expect("connect to agent");

    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("frame within timeout")
        .expect("stream open")
        .expect("ws ok");
    let Message::Text(text) = msg else {
        panic!("expected text frame, got {msg:?}");
    };
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["event"], "perfData");
    let data = v["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["_field"], "cpu");
    assert_eq!(data[1]["_field"], "ram");
    for rec in data {
        let pct = rec["_value"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&pct), "{rec}");
    }
}
