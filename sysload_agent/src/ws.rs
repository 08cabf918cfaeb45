//! WebSocket upgrade and per-connection handler. Forwards broadcast frames.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::stream::StreamExt;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::state::AppState;

use std::sync::atomic::Ordering;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    // Subscribe before waking the sampler so the first frame is not missed
    let mut frames = state.frames.subscribe();

    // Bump client count on connect and wake the sampler.
    let n = state.client_count.fetch_add(1, Ordering::Relaxed) + 1;
    state.wake_sampler.notify_waiters();
    info!("client connected ({n} total)");

    // Ensure we decrement on disconnect (drop).
    struct ClientGuard(AppState);
    impl Drop for ClientGuard {
        fn drop(&mut self) {
            let n = self.0.client_count.fetch_sub(1, Ordering::Relaxed) - 1;
            self.0.wake_sampler.notify_waiters();
            info!("client disconnected ({n} left)");
        }
    }
    let _guard = ClientGuard(state.clone());

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(js) => {
                    if socket.send(Message::Text(js)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => debug!("client lagging, skipped {skipped} frames"),
                Err(RecvError::Closed) => break,
            },
            msg = socket.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}
