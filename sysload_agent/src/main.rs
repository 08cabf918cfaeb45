//! sysload_agent: samples host CPU/RAM load and streams it to WebSocket clients.

mod metrics;
mod sampler;
mod state;
mod types;
mod ws;

use anyhow::Context;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::metrics::new_system;
use crate::sampler::spawn_sampler;
use crate::state::AppState;
use crate::ws::ws_handler;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(Debug, PartialEq)]
struct AgentArgs {
    port: u16,
    interval: Duration,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I, env_port: Option<String>) -> AgentArgs {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut long: Option<String> = None;
    let mut short: Option<String> = None;
    let mut interval: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--port" => long = it.next(),
            "-p" => short = it.next(),
            "--interval-ms" => interval = it.next(),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    long = Some(v.to_string());
                }
            }
            _ if a.starts_with("--interval-ms=") => {
                if let Some((_, v)) = a.split_once('=') {
                    interval = Some(v.to_string());
                }
            }
            _ => {}
        }
    }
    let port = long
        .or(short)
        .or(env_port)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let interval_ms = interval
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_INTERVAL_MS);
    AgentArgs {
        port,
        interval: Duration::from_millis(interval_ms),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args(std::env::args(), std::env::var("SYSLOAD_AGENT_PORT").ok());

    let state = AppState::new(new_system());
    let _sampler = spawn_sampler(state.clone(), args.interval);

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(
        "agent streaming perfData at ws://{addr}/ws every {:?}",
        args.interval
    );
    axum::serve(listener, app).await?;
    Ok(())
}
