//! Error surface of the capture tool.

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LiveError>;

#[derive(Debug, thiserror::Error)]
pub enum LiveError {
	#[error(transparent)]
	Cdp(#[from] livechat_cdp::CdpError),

	#[error("navigation to {url} failed")]
	Navigation {
		url: String,
		#[source]
		source: anyhow::Error,
	},

	#[error("login not completed after {rounds} interactive round(s)")]
	LoginTimeout { rounds: u32 },

	#[error("chat container {selector:?} did not appear within {waited:?}")]
	ContainerNotFound { selector: String, waited: Duration },

	#[error("browser disconnected while relaying chat events")]
	Disconnected,

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
