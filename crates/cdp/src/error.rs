//! Error taxonomy for browser lifecycle and DevTools protocol traffic.

use std::time::Duration;

pub type Result<T> = std::result::Result<T, CdpError>;

#[derive(Debug, thiserror::Error)]
pub enum CdpError {
	#[error("failed to connect to DevTools WebSocket at {url}: {reason}")]
	Connect { url: String, reason: String },

	#[error("no Chromium-family browser executable found; install Edge/Chrome or pass an explicit path")]
	NoExecutable,

	#[error("browser launch failed: {0}")]
	Launch(String),

	#[error("no page target available on the browser endpoint")]
	NoPageTarget,

	#[error("DevTools command {method} failed (code {code}): {message}")]
	Command {
		method: String,
		code: i64,
		message: String,
	},

	#[error("DevTools command {method} timed out after {timeout:?}")]
	Timeout { method: String, timeout: Duration },

	#[error("JavaScript evaluation threw: {0}")]
	Evaluate(String),

	#[error("protocol error: {0}")]
	Protocol(String),

	#[error("DevTools connection closed")]
	ConnectionClosed,

	#[error(transparent)]
	Http(#[from] reqwest::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
