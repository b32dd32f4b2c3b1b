//! JSON-RPC connection layer for the Chrome DevTools Protocol.
//!
//! Handles command id generation, request/response correlation over the
//! DevTools WebSocket, and dispatch of protocol events to method-keyed
//! subscribers. Responses carry an `id` field; events carry `method` and no
//! `id` — that distinction drives the read loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::{CdpError, Result};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;
type PendingMap = HashMap<u64, oneshot::Sender<CommandResponse>>;
type SubscriberMap = HashMap<String, Vec<mpsc::UnboundedSender<Value>>>;

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Outgoing DevTools command.
#[derive(Debug, serde::Serialize)]
struct Command {
	id: u64,
	method: String,
	params: Value,
}

/// Correlated response to a command, before protocol-error mapping.
#[derive(Debug, Clone)]
pub(crate) struct CommandResponse {
	pub result: Option<Value>,
	pub error: Option<ResponseError>,
}

/// Error object carried inside a DevTools response.
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct ResponseError {
	pub code: i64,
	pub message: String,
}

/// Shared-state connection to one DevTools target.
///
/// Cloneable via `Arc`; concurrent in-flight commands are correlated through
/// the pending map. The background read loop owns the receiving half of the
/// socket and runs until the browser end closes it.
pub struct Connection {
	next_id: AtomicU64,
	pending: Arc<Mutex<PendingMap>>,
	subscribers: Arc<Mutex<SubscriberMap>>,
	sink: Arc<Mutex<WsSink>>,
	_reader: tokio::task::JoinHandle<()>,
}

impl Connection {
	/// Connects to a DevTools WebSocket endpoint
	/// (`ws://127.0.0.1:{port}/devtools/page/{target}`).
	pub async fn connect(ws_url: &str) -> Result<Self> {
		let (stream, _) =
			tokio_tungstenite::connect_async(ws_url).await.map_err(|e| CdpError::Connect {
				url: ws_url.to_string(),
				reason: e.to_string(),
			})?;
		tracing::debug!(target = "livechat.cdp", url = ws_url, "DevTools connection established");

		let (sink, source) = stream.split();
		let pending: Arc<Mutex<PendingMap>> = Arc::new(Mutex::new(HashMap::new()));
		let subscribers: Arc<Mutex<SubscriberMap>> = Arc::new(Mutex::new(HashMap::new()));

		let reader = tokio::spawn(read_loop(source, Arc::clone(&pending), Arc::clone(&subscribers)));

		Ok(Self {
			next_id: AtomicU64::new(1),
			pending,
			subscribers,
			sink: Arc::new(Mutex::new(sink)),
			_reader: reader,
		})
	}

	/// Sends a command and awaits its correlated response.
	pub async fn send(&self, method: &str, params: Value) -> Result<Value> {
		self.send_with_timeout(method, params, DEFAULT_COMMAND_TIMEOUT).await
	}

	/// Sends a command with an explicit response deadline.
	pub async fn send_with_timeout(&self, method: &str, params: Value, timeout: Duration) -> Result<Value> {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst);
		let command = Command {
			id,
			method: method.to_string(),
			params,
		};
		let payload = serde_json::to_string(&command)?;

		// Register before sending so a fast response cannot race the map insert.
		let (tx, rx) = oneshot::channel();
		self.pending.lock().await.insert(id, tx);

		tracing::trace!(target = "livechat.cdp", id, method, "send command");
		self.sink
			.lock()
			.await
			.send(Message::Text(payload))
			.await
			.map_err(|e| CdpError::Protocol(format!("WebSocket send failed: {e}")))?;

		let response = tokio::time::timeout(timeout, rx)
			.await
			.map_err(|_| CdpError::Timeout {
				method: method.to_string(),
				timeout,
			})?
			.map_err(|_| CdpError::ConnectionClosed)?;

		if let Some(err) = response.error {
			return Err(CdpError::Command {
				method: method.to_string(),
				code: err.code,
				message: err.message,
			});
		}
		Ok(response.result.unwrap_or(Value::Null))
	}

	/// Subscribes to a protocol event by method name.
	///
	/// Event params are delivered in arrival order. The channel closes when
	/// the connection drops, which is the subscriber's disconnect signal.
	pub async fn subscribe(&self, method: &str) -> mpsc::UnboundedReceiver<Value> {
		let (tx, rx) = mpsc::unbounded_channel();
		self.subscribers.lock().await.entry(method.to_string()).or_default().push(tx);
		rx
	}
}

async fn read_loop(mut source: WsSource, pending: Arc<Mutex<PendingMap>>, subscribers: Arc<Mutex<SubscriberMap>>) {
	while let Some(incoming) = source.next().await {
		let message = match incoming {
			Ok(message) => message,
			Err(e) => {
				tracing::warn!(target = "livechat.cdp", error = %e, "WebSocket read error, stopping");
				break;
			}
		};

		let text = match message {
			Message::Text(text) => text,
			Message::Close(_) => {
				tracing::debug!(target = "livechat.cdp", "WebSocket closed by browser");
				break;
			}
			_ => continue,
		};

		let value: Value = match serde_json::from_str(&text) {
			Ok(value) => value,
			Err(e) => {
				tracing::warn!(target = "livechat.cdp", error = %e, "unparseable DevTools frame");
				continue;
			}
		};

		if let Some(response) = parse_response(&value) {
			let id = value["id"].as_u64().unwrap_or_default();
			match pending.lock().await.remove(&id) {
				Some(tx) => {
					let _ = tx.send(response);
				}
				None => tracing::trace!(target = "livechat.cdp", id, "response for unknown command id"),
			}
		} else if let Some((method, params)) = parse_event(&value) {
			let mut subscribers = subscribers.lock().await;
			if let Some(listeners) = subscribers.get_mut(method) {
				// Drop listeners whose receiving side has gone away.
				listeners.retain(|tx| tx.send(params.clone()).is_ok());
			}
		}
	}

	// Fail anything still in flight, then close subscriber channels.
	for (_, tx) in pending.lock().await.drain() {
		let _ = tx.send(CommandResponse {
			result: None,
			error: Some(ResponseError {
				code: -1,
				message: "connection closed".to_string(),
			}),
		});
	}
	subscribers.lock().await.clear();
}

/// Parses a frame as a command response; `None` when the `id` field is absent.
fn parse_response(value: &Value) -> Option<CommandResponse> {
	value.get("id")?.as_u64()?;
	Some(CommandResponse {
		result: value.get("result").cloned(),
		error: value.get("error").and_then(|e| serde_json::from_value(e.clone()).ok()),
	})
}

/// Parses a frame as a protocol event; `None` for responses.
fn parse_event(value: &Value) -> Option<(&str, Value)> {
	if value.get("id").is_some() {
		return None;
	}
	let method = value.get("method")?.as_str()?;
	let params = value.get("params").cloned().unwrap_or(Value::Null);
	Some((method, params))
}
