//! Page-level DevTools operations: navigation, evaluation, console stream.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::connection::Connection;
use crate::error::{CdpError, Result};

const LOAD_EVENT_TIMEOUT: Duration = Duration::from_secs(30);

/// A console API call observed in page context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
	/// Console level (`log`, `warning`, `error`, ...).
	pub level: String,
	/// First string argument of the call.
	pub text: String,
}

/// Stream of console messages for one page.
pub struct ConsoleEvents {
	rx: mpsc::UnboundedReceiver<Value>,
}

impl ConsoleEvents {
	/// Next console message, in page emission order. `None` once the
	/// DevTools connection is gone. Non-string console calls are skipped.
	pub async fn recv(&mut self) -> Option<ConsoleMessage> {
		loop {
			let params = self.rx.recv().await?;
			if let Some(message) = parse_console_event(&params) {
				return Some(message);
			}
		}
	}
}

/// Handle to one page target over an established DevTools connection.
pub struct Page {
	connection: Arc<Connection>,
}

impl Page {
	/// Attaches to a page target and enables the domains this crate uses.
	pub async fn attach(ws_url: &str) -> Result<Self> {
		let connection = Arc::new(Connection::connect(ws_url).await?);
		for domain in ["Page", "Runtime", "Network"] {
			connection.send(&format!("{domain}.enable"), json!({})).await?;
		}
		Ok(Self { connection })
	}

	/// Navigates and waits for the load event.
	///
	/// A missing load event within the deadline is downgraded to a warning:
	/// live-room pages render client-side and callers poll for readiness
	/// anyway. A navigation error from the browser is fatal.
	pub async fn navigate(&self, url: &str) -> Result<()> {
		let mut loaded = self.connection.subscribe("Page.loadEventFired").await;

		let result = self.connection.send("Page.navigate", json!({"url": url})).await?;
		if let Some(error_text) = result.get("errorText").and_then(Value::as_str) {
			if !error_text.is_empty() {
				return Err(CdpError::Protocol(format!("navigation to {url} failed: {error_text}")));
			}
		}

		if tokio::time::timeout(LOAD_EVENT_TIMEOUT, loaded.recv()).await.is_err() {
			tracing::warn!(target = "livechat.cdp", %url, "load event not observed, continuing");
		}
		Ok(())
	}

	/// Evaluates an expression in page context and returns its value.
	pub async fn evaluate(&self, expression: &str) -> Result<Value> {
		let result = self
			.connection
			.send(
				"Runtime.evaluate",
				json!({
					"expression": expression,
					"returnByValue": true,
					"awaitPromise": true,
				}),
			)
			.await?;

		if let Some(details) = result.get("exceptionDetails") {
			let text = details
				.get("exception")
				.and_then(|e| e.get("description"))
				.or_else(|| details.get("text"))
				.and_then(Value::as_str)
				.unwrap_or("unknown exception");
			return Err(CdpError::Evaluate(text.to_string()));
		}

		Ok(result.get("result").and_then(|r| r.get("value")).cloned().unwrap_or(Value::Null))
	}

	/// Evaluates an expression expected to yield a boolean.
	pub async fn evaluate_bool(&self, expression: &str) -> Result<bool> {
		Ok(self.evaluate(expression).await?.as_bool().unwrap_or(false))
	}

	/// Overrides the user agent for subsequent requests.
	pub async fn set_user_agent(&self, user_agent: &str) -> Result<()> {
		self.connection
			.send("Network.setUserAgentOverride", json!({"userAgent": user_agent}))
			.await?;
		Ok(())
	}

	/// Subscribes to the page's console channel.
	///
	/// Subscribe before installing anything that logs; delivery order is the
	/// page's emission order.
	pub async fn console_events(&self) -> ConsoleEvents {
		ConsoleEvents {
			rx: self.connection.subscribe("Runtime.consoleAPICalled").await,
		}
	}
}

/// Maps `Runtime.consoleAPICalled` params onto a [`ConsoleMessage`].
fn parse_console_event(params: &Value) -> Option<ConsoleMessage> {
	let level = params.get("type")?.as_str()?.to_string();
	let text = params
		.get("args")?
		.as_array()?
		.first()?
		.get("value")?
		.as_str()?
		.to_string();
	Some(ConsoleMessage { level, text })
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn console_event_maps_level_and_first_string_arg() {
		let params = json!({
			"type": "log",
			"args": [{"type": "string", "value": "hello"}],
			"executionContextId": 1
		});
		let message = parse_console_event(&params).unwrap();
		assert_eq!(message.level, "log");
		assert_eq!(message.text, "hello");
	}

	#[test]
	fn console_event_without_string_arg_is_skipped() {
		let params = json!({
			"type": "log",
			"args": [{"type": "object", "objectId": "7"}]
		});
		assert!(parse_console_event(&params).is_none());
	}

	#[test]
	fn console_event_with_no_args_is_skipped() {
		let params = json!({"type": "warning", "args": []});
		assert!(parse_console_event(&params).is_none());
	}
}
