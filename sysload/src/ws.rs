//! WebSocket feed transport: a background task owns the connection and
//! reconnects on its own; the UI thread drains events through a `Hub`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::feed::{BatchHandler, ConnectHandler, Feed, Hub, SubscriptionId};
use crate::types::{FeedFrame, RawRecord};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const BACKOFF_MIN: Duration = Duration::from_millis(250);
const BACKOFF_MAX: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("invalid feed url {0:?}: {1}")]
    BadUrl(String, url::ParseError),
    #[error("unsupported scheme {0:?}, expected ws or wss")]
    BadScheme(String),
    #[error("websocket: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Connected,
    Batch(Vec<RawRecord>),
}

/// Decodes one text frame. Unknown events and malformed JSON yield `None`.
/// Inside a batch, entries that are not records are skipped one by one.
pub fn parse_frame(text: &str) -> Option<FeedEvent> {
    match serde_json::from_str::<FeedFrame>(text) {
        Ok(FeedFrame::PerfData { data }) => Some(FeedEvent::Batch(
            data.into_iter()
                .filter_map(|v| serde_json::from_value::<RawRecord>(v).ok())
                .collect(),
        )),
        Ok(FeedFrame::Connect) => None,
        Err(e) => {
            debug!("skipping frame: {e}");
            None
        }
    }
}

pub fn validate_url(raw: &str) -> Result<url::Url, FeedError> {
    let u = url::Url::parse(raw).map_err(|e| FeedError::BadUrl(raw.to_string(), e))?;
    match u.scheme() {
        "ws" | "wss" => Ok(u),
        other => Err(FeedError::BadScheme(other.to_string())),
    }
}

// Connect to the feed and return the WS stream
pub async fn connect(url: &str) -> Result<WsStream, FeedError> {
    let (ws, _) = connect_async(url).await?;
    Ok(ws)
}

/// Feed backed by a reconnecting WebSocket connection.
pub struct WsFeed {
    hub: Hub,
    rx: RefCell<mpsc::UnboundedReceiver<FeedEvent>>,
    task: JoinHandle<()>,
}

impl WsFeed {
    /// Spawns the connection task. Must be called inside a tokio runtime.
    pub fn spawn(url: &str) -> Result<Rc<Self>, FeedError> {
        let url = validate_url(url)?.to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_connection(url, tx));
        Ok(Rc::new(Self {
            hub: Hub::new(),
            rx: RefCell::new(rx),
            task,
        }))
    }

    /// Dispatches every queued event, oldest first. Returns how many were
    /// handled. Batches with no listener attached are discarded.
    pub fn pump(&self) -> usize {
        let mut n = 0;
        loop {
            // Release the receiver before dispatching so handlers may re-enter
            let next = self.rx.borrow_mut().try_recv();
            let Ok(ev) = next else { break };
            match ev {
                FeedEvent::Connected => self.hub.emit_connect(),
                FeedEvent::Batch(batch) => self.hub.emit_batch(&batch),
            }
            n += 1;
        }
        n
    }
}

impl Feed for WsFeed {
    fn on_batch(&self, handler: BatchHandler) -> SubscriptionId {
        self.hub.on_batch(handler)
    }

    fn on_connect(&self, handler: ConnectHandler) -> SubscriptionId {
        self.hub.on_connect(handler)
    }

    fn off(&self, id: SubscriptionId) {
        self.hub.off(id)
    }
}

impl Drop for WsFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_connection(url: String, tx: mpsc::UnboundedSender<FeedEvent>) {
    let mut backoff = BACKOFF_MIN;
    loop {
        match connect(&url).await {
            Ok(ws) => {
                backoff = BACKOFF_MIN;
                if tx.send(FeedEvent::Connected).is_err() {
                    return;
                }
                if !read_frames(ws, &tx).await {
                    return;
                }
                debug!("feed connection closed, reconnecting");
            }
            Err(e) => warn!("feed connect to {url} failed: {e}"),
        }
        if tx.is_closed() {
            return;
        }
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(BACKOFF_MAX);
    }
}

// Returns false once the receiving side is gone
async fn read_frames(mut ws: WsStream, tx: &mpsc::UnboundedSender<FeedEvent>) -> bool {
    while let Some(msg) = ws.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Some(ev) = parse_frame(&text) {
                    if tx.send(ev).is_err() {
                        return false;
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("feed read error: {e}");
                break;
            }
        }
    }
    true
}
